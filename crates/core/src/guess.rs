//! URL-structure fallback guesser.
//!
//! When no site handler applies, or a handler fails, the title is guessed
//! from the host labels and path segments alone. The guesser performs no I/O
//! and accepts any input, including strings that are not URLs at all.

use std::borrow::Cow;

use url::{Host, Url};

use crate::link::MarkdownLink;
use crate::rules::GuessRules;

/// Guesses link titles from URL structure.
#[derive(Debug, Clone, Default)]
pub struct Guesser {
    rules: GuessRules,
}

impl Guesser {
    pub fn new(rules: GuessRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &GuessRules {
        &self.rules
    }

    /// Guess a link for `url`. The original URL is kept as the link target.
    pub fn guess(&self, url: &str) -> MarkdownLink {
        MarkdownLink::new(self.guess_title(url), url)
    }

    /// Guess only the title.
    ///
    /// 1. IP hosts and `localhost` use the URL verbatim.
    /// 2. Two-label hosts use the first label; longer hosts use the
    ///    second-to-last label, qualified by the leftmost label unless that
    ///    one is generic (`www`).
    /// 3. The last path segment is appended when the path contains a content
    ///    keyword, the host had two labels, or the leftmost label was generic.
    /// 4. The result is percent-decoded.
    pub fn guess_title(&self, url: &str) -> String {
        let Ok(parsed) = Url::parse(url.trim()) else {
            return url.to_string();
        };

        let host = match parsed.host() {
            Some(Host::Domain(domain)) if !domain.eq_ignore_ascii_case("localhost") => domain,
            _ => return url.to_string(),
        };
        // Punycode labels back to their readable form.
        let (host, _) = idna::domain_to_unicode(host);

        let labels: Vec<&str> = host.split('.').filter(|label| !label.is_empty()).collect();
        let (mut title, mut append_last) = match labels.as_slice() {
            [] => (String::new(), false),
            [only] => (only.to_string(), false),
            [first, _] => (first.to_string(), true),
            [first, .., second_last, _] => {
                if self.rules.is_generic_label(first) {
                    (second_last.to_string(), true)
                } else {
                    (format!("{} {}", second_last, first), false)
                }
            }
        };

        let segments: Vec<&str> = parsed.path().split('/').filter(|s| !s.is_empty()).collect();
        if segments.iter().any(|segment| self.rules.is_content_keyword(segment)) {
            append_last = true;
        }

        if append_last && let Some(last) = segments.last() {
            let last = self.rules.strip_suffix(last);
            if !last.is_empty() && !self.rules.is_low_info(last) {
                title.push(' ');
                title.push_str(last);
            }
        }

        if title.trim().is_empty() {
            return url.to_string();
        }

        let decoded = urlencoding::decode(&title).map(Cow::into_owned);
        decoded.unwrap_or(title)
    }
}

/// Guess a Markdown link for `url` with the built-in rules.
pub fn guess(url: &str) -> String {
    Guesser::default().guess(url).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://192.168.1.1:8080/", "http://192.168.1.1:8080/")]
    #[case("http://localhost:3000/app", "http://localhost:3000/app")]
    #[case("http://[::1]:8080/", "http://[::1]:8080/")]
    #[case("https://example.org/", "example")]
    #[case("https://example.com/guide/setup", "example setup")]
    #[case("https://example.com/docs/index.html", "example")]
    #[case("https://docs.example.com/guide/installation/", "example docs")]
    #[case("https://www.example.com/guide/installation/", "example installation")]
    #[case("https://about.example.com/", "example")]
    #[case("https://me.example.com/introduction", "example")]
    #[case("https://news.example.com/articles/big-story", "example news big-story")]
    #[case("https://blog.example.com/posts/hello-world.html", "example blog hello-world")]
    #[case("https://www.example.com/blog/old-page.htm", "example old-page")]
    #[case("https://example.com/%E7%8E%AF%E5%A2%83", "example 环境")]
    #[case("https://www.例子.中国/posts/测试", "例子 测试")]
    #[case("https://www.xn--fsqu00a.xn--fiqs8s/", "例子")]
    #[case("https://blog.bücher.de/", "bücher blog")]
    #[case("not a url", "not a url")]
    #[case("mailto:someone@example.com", "mailto:someone@example.com")]
    fn test_guess_title(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(Guesser::default().guess_title(url), expected);
    }

    #[test]
    fn test_guess_markdown_shape() {
        assert_eq!(guess("https://example.org/"), "[example](https://example.org/)");
        assert_eq!(
            guess("http://192.168.1.1:8080/"),
            "[http://192.168.1.1:8080/](http://192.168.1.1:8080/)"
        );
    }

    #[test]
    fn test_guess_empty_input() {
        assert_eq!(guess(""), "[unknown]()");
    }

    #[test]
    fn test_guess_is_idempotent() {
        let urls = ["https://www.example.com/posts/a", "", "::::", "https://a.b.c.d.e/f/g"];
        for url in urls {
            assert_eq!(guess(url), guess(url));
        }
    }

    #[test]
    fn test_custom_rules() {
        let rules = GuessRules::parse_str("content_keyword: wiki\ngeneric_label: docs\n").unwrap();
        let guesser = Guesser::new(rules);

        assert_eq!(guesser.guess_title("https://a.example.com/wiki/Page"), "example a Page");
        assert_eq!(guesser.guess_title("https://docs.example.com/guide/installation/"), "example installation");
    }
}
