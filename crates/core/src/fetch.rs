//! Page fetching.
//!
//! Handlers never talk to the network directly. They go through the
//! [`Fetcher`] trait so the transport policy (timeout, headers) lives in one
//! place and tests can swap in canned pages. [`HttpFetcher`] is the real
//! implementation on top of reqwest.

use async_trait::async_trait;

use crate::Result;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT: u64 = 5;

/// Browser User-Agent sent by default; several sites refuse unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds, applied to every fetch of a resolution.
    pub timeout: u64,
    /// User-Agent header value.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: DEFAULT_TIMEOUT, user_agent: DEFAULT_USER_AGENT.to_string() }
    }
}

/// Retrieves page text by URL.
///
/// Implementations must report non-success statuses and timeouts as errors;
/// callers treat any `Err` as "page unavailable".
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch the body of `url` as text.
    async fn fetch(&self, url: &str) -> Result<String>;
}

#[cfg(feature = "fetch")]
pub use http::{HttpFetcher, fetch_url};

#[cfg(feature = "fetch")]
mod http {
    use std::time::Duration;

    use async_trait::async_trait;
    use reqwest::Client;
    use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE};
    use url::Url;

    use super::{FetchConfig, Fetcher};
    use crate::{MdlinkError, Result};

    /// reqwest-backed [`Fetcher`].
    ///
    /// Sends the configured User-Agent, advertises gzip and decodes it
    /// transparently, follows redirects, and bounds each request by
    /// [`FetchConfig::timeout`].
    #[derive(Debug, Clone)]
    pub struct HttpFetcher {
        client: Client,
        config: FetchConfig,
    }

    impl HttpFetcher {
        /// Build a fetcher with its own connection pool.
        pub fn new(config: FetchConfig) -> Result<Self> {
            let client = Client::builder()
                .timeout(Duration::from_secs(config.timeout))
                .user_agent(config.user_agent.as_str())
                .gzip(true)
                .build()
                .map_err(MdlinkError::HttpError)?;

            Ok(Self { client, config })
        }

        /// The configuration this fetcher was built with.
        pub fn config(&self) -> &FetchConfig {
            &self.config
        }

        fn map_error(&self, err: reqwest::Error) -> MdlinkError {
            if err.is_timeout() {
                MdlinkError::Timeout { timeout: self.config.timeout }
            } else {
                MdlinkError::HttpError(err)
            }
        }
    }

    #[async_trait]
    impl Fetcher for HttpFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            let parsed_url = Url::parse(url).map_err(|e| MdlinkError::InvalidUrl(e.to_string()))?;

            tracing::debug!(url, timeout = self.config.timeout, "fetching page");

            let response = self
                .client
                .get(parsed_url)
                .header(ACCEPT, "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
                .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9,zh-CN;q=0.8")
                .send()
                .await
                .map_err(|e| self.map_error(e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(MdlinkError::Status { url: url.to_string(), status: status.as_u16() });
            }

            let body = response.text().await.map_err(|e| self.map_error(e))?;
            tracing::trace!(url, bytes = body.len(), "page fetched");

            Ok(body)
        }
    }

    /// Fetches a single page with a one-off client.
    pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
        HttpFetcher::new(config.clone())?.fetch(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, 5);
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
    }

    #[cfg(feature = "fetch")]
    #[tokio::test]
    async fn test_fetch_url_invalid() {
        let result = fetch_url("not-a-url", &FetchConfig::default()).await;
        assert!(matches!(result, Err(crate::MdlinkError::InvalidUrl(_))));
    }
}
