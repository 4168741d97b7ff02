mod echo;

use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use mdlink_core::{DEFAULT_MAX_REDIRECTS, DEFAULT_TIMEOUT, GuessRules, Resolver, ResolverConfig};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Turn web URLs into titled Markdown links
#[derive(Parser, Debug)]
#[command(name = "mdlink")]
#[command(version)]
#[command(about = "Turn web URLs into titled Markdown links", long_about = None)]
struct Args {
    /// URLs to convert, one link is printed per URL
    #[arg(value_name = "URL", required_unless_present = "completions")]
    urls: Vec<String>,

    /// HTTP timeout in seconds
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT, value_name = "SECS",
          value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Guess rules file (default: ~/.config/mdlink/guess.txt)
    #[arg(long, value_name = "FILE")]
    rules: Option<PathBuf>,

    /// Maximum number of nested redirector links to unwrap
    #[arg(long, default_value_t = DEFAULT_MAX_REDIRECTS, value_name = "N")]
    max_redirects: usize,

    /// Prefix titles with the name of the site that produced them
    #[arg(short, long)]
    site: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::new("mdlink_core=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))
}

/// An explicit `--rules` file must load; a broken default file only warns.
fn load_rules(path: Option<&PathBuf>) -> anyhow::Result<GuessRules> {
    match path {
        Some(path) => {
            GuessRules::load_file(path).with_context(|| format!("Failed to load rules file: {}", path.display()))
        }
        None => Ok(GuessRules::load_default().unwrap_or_else(|e| {
            echo::print_warning(&format!("Ignoring default rules file: {}", e));
            GuessRules::default()
        })),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "mdlink", &mut io::stdout());
        return Ok(());
    }

    init_logging(args.verbose)?;

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    let mut builder = ResolverConfig::builder()
        .timeout(args.timeout)
        .max_redirects(args.max_redirects)
        .rules(load_rules(args.rules.as_ref())?);
    if let Some(user_agent) = &args.user_agent {
        builder = builder.user_agent(user_agent.as_str());
    }

    let resolver = Resolver::new(builder.build()).context("Failed to build HTTP client")?;

    let total = args.urls.len();
    for (index, url) in args.urls.iter().enumerate() {
        if args.verbose {
            echo::print_step(index + 1, total, &format!("Resolving {}", url.bright_white().underline()));
        }

        let started = Instant::now();
        let resolution = resolver.try_resolve(url).await;

        if args.verbose {
            echo::print_resolution(&resolution);
            echo::print_timing("Resolved", started.elapsed());
            eprintln!();
        }

        if args.site {
            println!("{}", resolution.link_with_site());
        } else {
            println!("{}", resolution.link());
        }
    }

    Ok(())
}
