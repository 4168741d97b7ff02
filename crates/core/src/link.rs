use std::fmt;

/// Title used when nothing better can be derived.
pub const UNKNOWN_TITLE: &str = "unknown";

/// A Markdown inline link, rendered as `[title](url)`.
///
/// The title is never empty: constructing a link with a blank title
/// substitutes [`UNKNOWN_TITLE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownLink {
    title: String,
    url: String,
}

impl MarkdownLink {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        let title = title.into();
        let title = if title.trim().is_empty() { UNKNOWN_TITLE.to_string() } else { title };
        Self { title, url: url.into() }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for MarkdownLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]({})", self.title, self.url)
    }
}
