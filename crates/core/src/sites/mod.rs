//! Site handlers.
//!
//! Every supported site is a [`Site`] variant backed by a [`SiteHandler`]
//! implementation. A handler declares the URL shapes it understands as an
//! ordered list of [`UrlPattern`]s, each tagged with a site-specific shape so
//! the handler knows which capture groups to expect. A call runs:
//!
//! 1. **match**: the first pattern that matches yields a [`UrlMatch`];
//! 2. **parse**: the match (plus, when needed, one fetched page) becomes an
//!    immutable fields record;
//! 3. **format**: the fields become a title, or the site's display name when
//!    nothing useful was found.
//!
//! Handlers assume the happy path. Missing captures, failed fetches and
//! changed page markup come back as errors and the
//! [`Resolver`](crate::Resolver) turns them into a guessed link.

mod articles;
mod bilibili;
mod csdn;
mod github;
mod github_pages;
mod stackoverflow;
mod youtube;
mod zhihu;

use std::fmt;

use regex::Regex;

use crate::error::{MdlinkError, Result};
use crate::extract::FieldExtractor;
use crate::fetch::Fetcher;
use crate::link::MarkdownLink;

/// One URL shape a handler understands.
pub(crate) struct UrlPattern<S> {
    regex: Regex,
    shape: S,
}

impl<S: Copy> UrlPattern<S> {
    /// Compile a handler pattern. Patterns are literals covered by the
    /// handler tests, so a bad one is a programming error.
    pub(crate) fn new(pattern: &str, shape: S) -> Self {
        let regex = Regex::new(pattern).unwrap_or_else(|e| panic!("invalid site pattern {pattern}: {e}"));
        Self { regex, shape }
    }

    fn captures(&self, site: &'static str, url: &str) -> Option<UrlMatch<S>> {
        let caps = self.regex.captures(url)?;
        let groups = self
            .regex
            .capture_names()
            .flatten()
            .filter_map(|name| caps.name(name).map(|m| (name.to_string(), m.as_str().to_string())))
            .collect();

        Some(UrlMatch { site, shape: self.shape, groups })
    }
}

/// A matched URL: the pattern's shape plus its named captures.
#[derive(Debug, Clone)]
pub(crate) struct UrlMatch<S> {
    site: &'static str,
    shape: S,
    groups: Vec<(String, String)>,
}

impl<S: Copy> UrlMatch<S> {
    pub(crate) fn shape(&self) -> S {
        self.shape
    }

    /// A capture group, or `None` when it is absent or empty.
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|(group, _)| group == name)
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
    }

    /// A capture group the shape guarantees.
    pub(crate) fn require(&self, name: &'static str) -> Result<&str> {
        self.get(name).ok_or(MdlinkError::MissingField { site: self.site, field: name })
    }
}

/// Percent-decode a path segment. Invalid UTF-8 leaves it untouched.
pub(crate) fn decode_path(segment: &str) -> String {
    urlencoding::decode(segment).map(|s| s.into_owned()).unwrap_or_else(|_| segment.to_string())
}

/// Decode a form-encoded query value (`+` is a space).
pub(crate) fn decode_query(value: &str) -> String {
    decode_path(&value.replace('+', " "))
}

/// Last non-empty `/`-separated segment, percent-decoded.
pub(crate) fn last_segment(path: &str) -> Option<String> {
    path.split('/').rfind(|s| !s.is_empty()).map(decode_path)
}

/// The per-site contract.
pub(crate) trait SiteHandler {
    /// Which URL shape a pattern recognizes.
    type Shape: Copy + fmt::Debug + 'static;
    /// What `parse` extracts.
    type Fields;

    /// Display name, also the title of last resort.
    const NAME: &'static str;

    fn patterns() -> &'static [UrlPattern<Self::Shape>];

    fn matches(url: &str) -> Option<UrlMatch<Self::Shape>> {
        Self::patterns().iter().find_map(|pattern| pattern.captures(Self::NAME, url))
    }

    /// Rewritten target URL, when the matched one carries tracking noise.
    fn canonical_url(_matched: &UrlMatch<Self::Shape>) -> Option<String> {
        None
    }

    async fn parse(matched: &UrlMatch<Self::Shape>, page: &mut FieldExtractor<'_>) -> Result<Self::Fields>;

    fn format(fields: &Self::Fields) -> Option<String>;
}

async fn run<H: SiteHandler>(url: &str, fetcher: &dyn Fetcher) -> Result<MarkdownLink> {
    let matched = H::matches(url).ok_or_else(|| MdlinkError::NoMatch { site: H::NAME, url: url.to_string() })?;
    let target = H::canonical_url(&matched).unwrap_or_else(|| url.to_string());
    tracing::debug!(site = H::NAME, shape = ?matched.shape(), url = %target, "url matched");

    let mut page = FieldExtractor::new(fetcher, target);
    let fields = H::parse(&matched, &mut page).await?;

    let title = H::format(&fields)
        .filter(|title| !title.trim().is_empty())
        .unwrap_or_else(|| H::NAME.to_string());

    Ok(MarkdownLink::new(title, page.url()))
}

/// A supported site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    Github,
    GithubPages,
    RawGithub,
    StackOverflow,
    YouTube,
    Zhihu,
    Bilibili,
    Csdn,
    Cnblogs,
    Jianshu,
    TencentCloud,
    Douban,
    Juejin,
    Wikipedia,
    Weixin,
    GeeksForGeeks,
    SourceForge,
    VsMarketplace,
    InfoQ,
    Cto51,
    Sohu,
}

impl Site {
    pub const ALL: [Site; 21] = [
        Site::Github,
        Site::GithubPages,
        Site::RawGithub,
        Site::StackOverflow,
        Site::YouTube,
        Site::Zhihu,
        Site::Bilibili,
        Site::Csdn,
        Site::Cnblogs,
        Site::Jianshu,
        Site::TencentCloud,
        Site::Douban,
        Site::Juejin,
        Site::Wikipedia,
        Site::Weixin,
        Site::GeeksForGeeks,
        Site::SourceForge,
        Site::VsMarketplace,
        Site::InfoQ,
        Site::Cto51,
        Site::Sohu,
    ];

    /// Display name used when no better title is available.
    pub fn name(self) -> &'static str {
        match self {
            Site::Github => github::Github::NAME,
            Site::GithubPages => github_pages::GithubPages::NAME,
            Site::RawGithub => github::RawGithub::NAME,
            Site::StackOverflow => stackoverflow::StackOverflow::NAME,
            Site::YouTube => youtube::YouTube::NAME,
            Site::Zhihu => zhihu::Zhihu::NAME,
            Site::Bilibili => bilibili::Bilibili::NAME,
            Site::Csdn => csdn::Csdn::NAME,
            Site::Cnblogs => articles::Cnblogs::NAME,
            Site::Jianshu => articles::Jianshu::NAME,
            Site::TencentCloud => articles::TencentCloud::NAME,
            Site::Douban => articles::Douban::NAME,
            Site::Juejin => articles::Juejin::NAME,
            Site::Wikipedia => articles::Wikipedia::NAME,
            Site::Weixin => articles::Weixin::NAME,
            Site::GeeksForGeeks => articles::GeeksForGeeks::NAME,
            Site::SourceForge => articles::SourceForge::NAME,
            Site::VsMarketplace => articles::VsMarketplace::NAME,
            Site::InfoQ => articles::InfoQ::NAME,
            Site::Cto51 => articles::Cto51::NAME,
            Site::Sohu => articles::Sohu::NAME,
        }
    }

    /// Whether one of this site's URL shapes matches `url`.
    pub fn understands(self, url: &str) -> bool {
        match self {
            Site::Github => github::Github::matches(url).is_some(),
            Site::GithubPages => github_pages::GithubPages::matches(url).is_some(),
            Site::RawGithub => github::RawGithub::matches(url).is_some(),
            Site::StackOverflow => stackoverflow::StackOverflow::matches(url).is_some(),
            Site::YouTube => youtube::YouTube::matches(url).is_some(),
            Site::Zhihu => zhihu::Zhihu::matches(url).is_some(),
            Site::Bilibili => bilibili::Bilibili::matches(url).is_some(),
            Site::Csdn => csdn::Csdn::matches(url).is_some(),
            Site::Cnblogs => articles::Cnblogs::matches(url).is_some(),
            Site::Jianshu => articles::Jianshu::matches(url).is_some(),
            Site::TencentCloud => articles::TencentCloud::matches(url).is_some(),
            Site::Douban => articles::Douban::matches(url).is_some(),
            Site::Juejin => articles::Juejin::matches(url).is_some(),
            Site::Wikipedia => articles::Wikipedia::matches(url).is_some(),
            Site::Weixin => articles::Weixin::matches(url).is_some(),
            Site::GeeksForGeeks => articles::GeeksForGeeks::matches(url).is_some(),
            Site::SourceForge => articles::SourceForge::matches(url).is_some(),
            Site::VsMarketplace => articles::VsMarketplace::matches(url).is_some(),
            Site::InfoQ => articles::InfoQ::matches(url).is_some(),
            Site::Cto51 => articles::Cto51::matches(url).is_some(),
            Site::Sohu => articles::Sohu::matches(url).is_some(),
        }
    }

    /// Run this site's handler on `url`.
    pub async fn resolve(self, url: &str, fetcher: &dyn Fetcher) -> Result<MarkdownLink> {
        match self {
            Site::Github => run::<github::Github>(url, fetcher).await,
            Site::GithubPages => run::<github_pages::GithubPages>(url, fetcher).await,
            Site::RawGithub => run::<github::RawGithub>(url, fetcher).await,
            Site::StackOverflow => run::<stackoverflow::StackOverflow>(url, fetcher).await,
            Site::YouTube => run::<youtube::YouTube>(url, fetcher).await,
            Site::Zhihu => run::<zhihu::Zhihu>(url, fetcher).await,
            Site::Bilibili => run::<bilibili::Bilibili>(url, fetcher).await,
            Site::Csdn => run::<csdn::Csdn>(url, fetcher).await,
            Site::Cnblogs => run::<articles::Cnblogs>(url, fetcher).await,
            Site::Jianshu => run::<articles::Jianshu>(url, fetcher).await,
            Site::TencentCloud => run::<articles::TencentCloud>(url, fetcher).await,
            Site::Douban => run::<articles::Douban>(url, fetcher).await,
            Site::Juejin => run::<articles::Juejin>(url, fetcher).await,
            Site::Wikipedia => run::<articles::Wikipedia>(url, fetcher).await,
            Site::Weixin => run::<articles::Weixin>(url, fetcher).await,
            Site::GeeksForGeeks => run::<articles::GeeksForGeeks>(url, fetcher).await,
            Site::SourceForge => run::<articles::SourceForge>(url, fetcher).await,
            Site::VsMarketplace => run::<articles::VsMarketplace>(url, fetcher).await,
            Site::InfoQ => run::<articles::InfoQ>(url, fetcher).await,
            Site::Cto51 => run::<articles::Cto51>(url, fetcher).await,
            Site::Sohu => run::<articles::Sohu>(url, fetcher).await,
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
