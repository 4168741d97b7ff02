//! CLI integration tests
//!
//! Every URL here is titled without touching the network: unregistered hosts
//! go straight to the guesser and the site shapes used never fetch.
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("mdlink");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// A command whose default rules file location is an empty directory.
fn isolated(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cmd();
    cmd.env("HOME", home.path());
    cmd
}

#[test]
fn test_cli_ip_url_passthrough() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .arg("http://192.168.1.1:8080/")
        .assert()
        .success()
        .stdout("[http://192.168.1.1:8080/](http://192.168.1.1:8080/)\n");
}

#[test]
fn test_cli_guessed_title() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .arg("https://docs.example.com/guide/installation/")
        .assert()
        .success()
        .stdout("[example docs](https://docs.example.com/guide/installation/)\n");
}

#[test]
fn test_cli_redirector() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .arg("https://link.zhihu.com/?target=https%3A//example.org/posts/hello")
        .assert()
        .success()
        .stdout("[example hello](https://example.org/posts/hello)\n");
}

#[test]
fn test_cli_site_titles_without_fetch() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .args([
            "https://github.com/rust-lang/rust",
            "https://en.wikipedia.org/wiki/Rust_(programming_language)",
        ])
        .assert()
        .success()
        .stdout(
            "[rust](https://github.com/rust-lang/rust)\n\
             [Rust (programming language)](https://en.wikipedia.org/wiki/Rust_(programming_language))\n",
        );
}

#[test]
fn test_cli_site_prefix() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .args(["--site", "https://github.com/rust-lang/rust", "https://docs.example.com/guide/installation/"])
        .assert()
        .success()
        .stdout(
            "[Github rust](https://github.com/rust-lang/rust)\n\
             [example docs](https://docs.example.com/guide/installation/)\n",
        );
}

#[test]
fn test_cli_long_flags_use_dashes() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .args(["--user-agent", "mdlink-test", "--max-redirects", "1", "https://example.org/"])
        .assert()
        .success()
        .stdout("[example](https://example.org/)\n");
}

#[test]
fn test_cli_completions_offer_dashed_flags() {
    cmd()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--max-redirects").and(predicate::str::contains("--user-agent")));
}

#[test]
fn test_cli_missing_url() {
    cmd().assert().failure().stderr(predicate::str::contains("URL"));
}

#[test]
fn test_cli_zero_timeout_rejected() {
    cmd().args(["-t", "0", "https://example.org/"]).assert().failure();
}

#[test]
fn test_cli_rules_file() {
    let home = TempDir::new().unwrap();
    let rules = home.path().join("rules.txt");
    std::fs::write(&rules, "content_keyword: wiki\n").unwrap();

    isolated(&home)
        .args(["--rules", rules.to_str().unwrap(), "https://a.example.com/wiki/Page"])
        .assert()
        .success()
        .stdout("[example a Page](https://a.example.com/wiki/Page)\n");
}

#[test]
fn test_cli_default_rules_location() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".config").join("mdlink");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("guess.txt"), "generic_label: docs\n").unwrap();

    isolated(&home)
        .arg("https://docs.example.com/guide/installation/")
        .assert()
        .success()
        .stdout("[example installation](https://docs.example.com/guide/installation/)\n");
}

#[test]
fn test_cli_missing_rules_file() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .args(["--rules", "/nonexistent/guess.txt", "https://example.org/"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rules file"));
}

#[test]
fn test_cli_broken_default_rules_only_warns() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".config").join("mdlink");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("guess.txt"), "not a directive\n").unwrap();

    isolated(&home)
        .arg("https://example.org/")
        .assert()
        .success()
        .stdout("[example](https://example.org/)\n")
        .stderr(predicate::str::contains("Ignoring default rules file"));
}

#[test]
fn test_cli_max_redirects_zero() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .args(["--max-redirects", "0", "https://link.zhihu.com/?target=https%3A//example.org/posts/hello"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[zhihu link]"));
}

#[test]
fn test_cli_verbose() {
    let home = TempDir::new().unwrap();
    isolated(&home)
        .args(["-v", "https://example.org/"])
        .assert()
        .success()
        .stdout("[example](https://example.org/)\n")
        .stderr(predicate::str::contains("mdlink").and(predicate::str::contains("[1/1]")));
}

#[test]
fn test_cli_completions() {
    cmd()
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mdlink"));
}
