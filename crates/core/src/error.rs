//! Error types for mdlink operations.
//!
//! This module defines the main error type [`MdlinkError`] which represents
//! everything that can go wrong while resolving a URL into a titled link:
//! transport failures, pages that no longer carry the expected markup,
//! URLs a handler does not understand, and configuration mistakes.
//!
//! Resolution itself never surfaces these to the caller. The
//! [`Resolver`](crate::Resolver) catches them and falls back to a guessed
//! title, but they are kept as values so callers of
//! [`Resolver::try_resolve`](crate::Resolver::try_resolve) can see why a
//! guess was made.
//!
//! # Example
//!
//! ```rust
//! use mdlink_core::{ErrorKind, MdlinkError};
//!
//! let err = MdlinkError::Status { url: "https://example.com".to_string(), status: 404 };
//! assert_eq!(err.kind(), ErrorKind::Transport);
//! ```

use thiserror::Error;

/// Main error type for link resolution.
#[derive(Error, Debug)]
pub enum MdlinkError {
    /// HTTP request errors from reqwest.
    ///
    /// Wraps DNS failures, connection resets, TLS problems and body decoding errors.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The server answered with a non-success status.
    #[error("connect {url} failed: status code [{status}]")]
    Status { url: String, status: u16 },

    /// Invalid URL provided.
    ///
    /// Returned when a URL cannot be parsed into host and path components.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// None of a handler's patterns matched the URL it was dispatched for.
    #[error("{site} has no pattern for {url}")]
    NoMatch { site: &'static str, url: String },

    /// A capture group the matched pattern should have produced is absent.
    #[error("{site} pattern matched without a `{field}` group")]
    MissingField { site: &'static str, field: &'static str },

    /// The fetched page does not contain the expected fragment.
    #[error("pattern `{pattern}` not found in {url}")]
    ExtractionFailed { url: String, pattern: String },

    /// A structured response (for example oEmbed JSON) could not be decoded.
    #[error("Invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    /// Registry or resolver configuration errors.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Guess-rules file errors.
    #[error("Rules error: {0}")]
    RulesError(String),
}

/// Coarse classification of [`MdlinkError`] used for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A handler's patterns did not match.
    NoMatch,
    /// Network failure, timeout, or non-success status.
    Transport,
    /// Expected page fragment or capture group missing.
    Extraction,
    /// The URL could not be decomposed.
    MalformedInput,
    /// Bad registry patterns or rules files.
    Config,
}

impl MdlinkError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            #[cfg(feature = "fetch")]
            MdlinkError::HttpError(_) => ErrorKind::Transport,
            MdlinkError::Timeout { .. } | MdlinkError::Status { .. } => ErrorKind::Transport,
            MdlinkError::InvalidUrl(_) => ErrorKind::MalformedInput,
            MdlinkError::NoMatch { .. } => ErrorKind::NoMatch,
            MdlinkError::MissingField { .. }
            | MdlinkError::ExtractionFailed { .. }
            | MdlinkError::InvalidResponse { .. } => ErrorKind::Extraction,
            MdlinkError::ConfigError(_) | MdlinkError::RulesError(_) => ErrorKind::Config,
        }
    }
}

/// Result type alias for MdlinkError.
pub type Result<T> = std::result::Result<T, MdlinkError>;
