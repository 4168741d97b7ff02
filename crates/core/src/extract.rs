//! Field extraction from fetched pages.
//!
//! This is the only place where network I/O meets regex matching. A
//! [`FieldExtractor`] is bound to one target URL and fetches it at most once,
//! however many fields a handler pulls from the page.

use regex::Regex;

use crate::error::{MdlinkError, Result};
use crate::fetch::Fetcher;

/// Fetches one page lazily and pulls fields out of it.
pub struct FieldExtractor<'a> {
    fetcher: &'a dyn Fetcher,
    url: String,
    page: Option<String>,
}

impl<'a> FieldExtractor<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, url: impl Into<String>) -> Self {
        Self { fetcher, url: url.into(), page: None }
    }

    /// The URL this extractor reads from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the page has been fetched yet.
    pub fn is_fetched(&self) -> bool {
        self.page.is_some()
    }

    /// The page body, fetched on first use.
    pub async fn page(&mut self) -> Result<&str> {
        if self.page.is_none() {
            let body = self.fetcher.fetch(&self.url).await?;
            self.page = Some(body);
        }

        Ok(self.page.as_deref().unwrap_or_default())
    }

    /// Search the page with `pattern` and return its first group, trimmed.
    pub async fn extract(&mut self, pattern: &Regex) -> Result<String> {
        let url = self.url.clone();
        let page = self.page().await?;
        extract_field(page, pattern).map_err(|e| match e {
            MdlinkError::ExtractionFailed { pattern, .. } => MdlinkError::ExtractionFailed { url, pattern },
            other => other,
        })
    }

    /// Fetch an auxiliary URL (an API endpoint, say) without caching it.
    pub async fn fetch_other(&self, url: &str) -> Result<String> {
        self.fetcher.fetch(url).await
    }
}

/// Return the first capture group of `pattern` in `text`, trimmed and with
/// HTML character references decoded.
///
/// A missing match, a missing group, or a group that is blank after trimming
/// are all extraction failures.
pub fn extract_field(text: &str, pattern: &Regex) -> Result<String> {
    let failed = || MdlinkError::ExtractionFailed { url: String::new(), pattern: pattern.as_str().to_string() };

    let captured = pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .ok_or_else(failed)?;

    let decoded = html_escape::decode_html_entities(captured);
    let value = decoded.trim();
    if value.is_empty() { Err(failed()) } else { Ok(value.to_string()) }
}

/// Remove the first matching site suffix (`" - 简书"`) from a page title.
pub fn strip_site_suffix<'t>(title: &'t str, suffixes: &[&str]) -> &'t str {
    suffixes
        .iter()
        .find_map(|suffix| title.strip_suffix(suffix))
        .unwrap_or(title)
        .trim()
}
