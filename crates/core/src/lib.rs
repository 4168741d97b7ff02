//! Turn URLs into Markdown links with human-readable titles.
//!
//! ```rust
//! use mdlink_core::guess;
//!
//! assert_eq!(guess("https://docs.example.com/guide/installation/"), "[example docs](https://docs.example.com/guide/installation/)");
//! ```
//!
//! Known sites (GitHub, Stack Overflow, YouTube, Zhihu, ...) are titled by a
//! [`Site`] handler that reads the URL and, when needed, one fetched page.
//! Everything else, and every handler failure, goes to the [`Guesser`].

pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod guess;
pub mod link;
pub mod registry;
pub mod resolve;
pub mod rules;
mod sites;

pub use config::{DEFAULT_MAX_REDIRECTS, ResolverConfig, ResolverConfigBuilder};
pub use error::{ErrorKind, MdlinkError, Result};
pub use extract::{FieldExtractor, extract_field, strip_site_suffix};
pub use fetch::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, FetchConfig, Fetcher};
#[cfg(feature = "fetch")]
pub use fetch::{HttpFetcher, fetch_url};
pub use guess::{Guesser, guess};
pub use link::{MarkdownLink, UNKNOWN_TITLE};
pub use registry::{Registration, Registry};
#[cfg(feature = "fetch")]
pub use resolve::resolve;
pub use resolve::{REDIRECTORS, Redirector, Resolution, Resolver};
pub use rules::{GuessRules, RuleDirective};
pub use sites::Site;
