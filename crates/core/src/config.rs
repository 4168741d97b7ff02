//! Resolver configuration.
//!
//! # Example
//!
//! ```rust
//! use mdlink_core::{FetchConfig, ResolverConfig};
//!
//! let config = ResolverConfig::builder()
//!     .fetch(FetchConfig { timeout: 10, ..Default::default() })
//!     .max_redirects(2)
//!     .build();
//!
//! assert_eq!(config.fetch.timeout, 10);
//! ```

use crate::fetch::FetchConfig;
use crate::rules::GuessRules;

/// Redirector links unwrapped before dispatch, at most this many deep.
pub const DEFAULT_MAX_REDIRECTS: usize = 4;

/// Configuration for a [`Resolver`](crate::Resolver).
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// HTTP fetch settings (timeout, User-Agent).
    pub fetch: FetchConfig,

    /// Maximum number of nested redirector links to unwrap (default: 4).
    pub max_redirects: usize,

    /// Word lists for the fallback guesser.
    pub rules: GuessRules,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { fetch: FetchConfig::default(), max_redirects: DEFAULT_MAX_REDIRECTS, rules: GuessRules::default() }
    }
}

impl ResolverConfig {
    /// Creates a new builder for ResolverConfig.
    pub fn builder() -> ResolverConfigBuilder {
        ResolverConfigBuilder::new()
    }
}

/// Builder for ResolverConfig.
pub struct ResolverConfigBuilder {
    config: ResolverConfig,
}

impl ResolverConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ResolverConfig::default() }
    }

    /// Sets the fetch configuration.
    pub fn fetch(mut self, value: FetchConfig) -> Self {
        self.config.fetch = value;
        self
    }

    /// Sets the request timeout in seconds.
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.config.fetch.timeout = seconds;
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.fetch.user_agent = value.into();
        self
    }

    /// Sets the redirector unwrap cap.
    pub fn max_redirects(mut self, value: usize) -> Self {
        self.config.max_redirects = value;
        self
    }

    /// Sets the guesser word lists.
    pub fn rules(mut self, value: GuessRules) -> Self {
        self.config.rules = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> ResolverConfig {
        self.config
    }
}

impl Default for ResolverConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
