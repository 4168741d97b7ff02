//! URL resolution: redirector unwrapping, dispatch and fallback.
//!
//! # Example
//!
//! ```rust,no_run
//! use mdlink_core::{Resolver, ResolverConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> mdlink_core::Result<()> {
//! let resolver = Resolver::new(ResolverConfig::default())?;
//! let link = resolver.resolve("https://github.com/microsoft/vscode").await;
//! assert_eq!(link, "[vscode](https://github.com/microsoft/vscode)");
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use url::Url;

use crate::config::ResolverConfig;
use crate::error::{ErrorKind, MdlinkError};
use crate::fetch::Fetcher;
use crate::guess::Guesser;
use crate::link::MarkdownLink;
use crate::registry::Registry;
use crate::sites::Site;

/// An interstitial "you are leaving this site" link that carries its real
/// destination in a query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirector {
    pub host: &'static str,
    pub param: &'static str,
}

pub const REDIRECTORS: &[Redirector] = &[
    Redirector { host: "link.zhihu.com", param: "target" },
    Redirector { host: "link.juejin.cn", param: "target" },
    Redirector { host: "link.csdn.net", param: "target" },
];

impl Redirector {
    /// The embedded destination of `url`, percent-decoded, if `url` is one
    /// of this redirector's links.
    pub fn target(&self, url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str() != Some(self.host) {
            return None;
        }

        // The target runs to the end of the query, so any `&` it carries stays with it.
        let query = parsed.query()?;
        let prefix = format!("{}=", self.param);
        let start = if query.starts_with(&prefix) {
            prefix.len()
        } else {
            query.find(&format!("&{}", prefix))? + prefix.len() + 1
        };

        let raw = &query[start..];
        let target = urlencoding::decode(raw).map(|s| s.into_owned()).unwrap_or_else(|_| raw.to_string());
        let target = target.trim();
        (!target.is_empty()).then(|| target.to_string())
    }
}

/// How a URL was titled.
#[derive(Debug)]
pub enum Resolution {
    /// A site handler produced the link.
    Site { site: Site, link: MarkdownLink },
    /// The guesser produced the link. `cause` is the handler error, absent
    /// when no registry pattern matched.
    Guessed { link: MarkdownLink, cause: Option<MdlinkError> },
}

impl Resolution {
    pub fn link(&self) -> &MarkdownLink {
        match self {
            Resolution::Site { link, .. } | Resolution::Guessed { link, .. } => link,
        }
    }

    pub fn into_link(self) -> MarkdownLink {
        match self {
            Resolution::Site { link, .. } | Resolution::Guessed { link, .. } => link,
        }
    }

    /// The site that handled the URL, if any.
    pub fn site(&self) -> Option<Site> {
        match self {
            Resolution::Site { site, .. } => Some(*site),
            Resolution::Guessed { .. } => None,
        }
    }

    pub fn is_guessed(&self) -> bool {
        matches!(self, Resolution::Guessed { .. })
    }

    /// The link with the site's display name in front of the title.
    ///
    /// Guessed links and titles that already are the site name are returned
    /// unchanged.
    pub fn link_with_site(&self) -> MarkdownLink {
        match self {
            Resolution::Site { site, link } if link.title() != site.name() => {
                MarkdownLink::new(format!("{} {}", site, link.title()), link.url())
            }
            _ => self.link().clone(),
        }
    }
}

/// Turns URLs into Markdown links.
///
/// A resolver is immutable after construction and can be shared across
/// tasks; each call owns its own handler state.
pub struct Resolver {
    registry: Registry,
    fetcher: Arc<dyn Fetcher>,
    guesser: Guesser,
    max_redirects: usize,
}

impl Resolver {
    /// Build a resolver over the built-in registry and an HTTP fetcher.
    #[cfg(feature = "fetch")]
    pub fn new(config: ResolverConfig) -> crate::Result<Self> {
        let fetcher = crate::fetch::HttpFetcher::new(config.fetch.clone())?;
        Ok(Self::with_fetcher(Arc::new(fetcher), config))
    }

    /// Build a resolver over the built-in registry and any fetcher.
    pub fn with_fetcher(fetcher: Arc<dyn Fetcher>, config: ResolverConfig) -> Self {
        Self {
            registry: Registry::builtin(),
            fetcher,
            guesser: Guesser::new(config.rules),
            max_redirects: config.max_redirects,
        }
    }

    /// Replace the dispatch registry.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn guesser(&self) -> &Guesser {
        &self.guesser
    }

    /// Follow redirector links, at most `max_redirects` deep.
    pub fn unwrap_redirects(&self, url: &str) -> String {
        let mut current = url.to_string();

        for _ in 0..self.max_redirects {
            let Some(target) = REDIRECTORS.iter().find_map(|r| r.target(&current)) else {
                break;
            };
            tracing::debug!(from = %current, to = %target, "unwrapped redirector");
            current = target;
        }

        current
    }

    /// Resolve `url`, reporting whether a site handler or the guesser
    /// produced the link.
    pub async fn try_resolve(&self, url: &str) -> Resolution {
        let url = self.unwrap_redirects(url.trim());

        let Some(site) = self.registry.lookup(&url) else {
            tracing::debug!(url = %url, "no site pattern matched, guessing");
            return Resolution::Guessed { link: self.guesser.guess(&url), cause: None };
        };

        tracing::debug!(site = %site, url = %url, "dispatching");
        match site.resolve(&url, self.fetcher.as_ref()).await {
            Ok(link) => Resolution::Site { site, link },
            Err(err) => {
                let kind = err.kind();
                if kind == ErrorKind::NoMatch {
                    tracing::debug!(site = %site, url = %url, "site has no shape for url, guessing");
                } else {
                    tracing::warn!(site = %site, url = %url, ?kind, error = %err, "site handler failed, guessing");
                }
                Resolution::Guessed { link: self.guesser.guess(&url), cause: Some(err) }
            }
        }
    }

    /// Resolve `url` to a Markdown link. Never fails.
    pub async fn resolve(&self, url: &str) -> String {
        self.try_resolve(url).await.into_link().to_string()
    }
}

/// Resolve one URL with default settings and the given timeout in seconds.
///
/// Falls back to a guessed title when the HTTP client cannot be built.
#[cfg(feature = "fetch")]
pub async fn resolve(url: &str, timeout: u64) -> String {
    let config = ResolverConfig::builder().timeout(timeout).build();
    match Resolver::new(config) {
        Ok(resolver) => resolver.resolve(url).await,
        Err(err) => {
            tracing::warn!(error = %err, "cannot build HTTP client, guessing");
            crate::guess::guess(url.trim())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::testing::PageMap;
    use rstest::rstest;

    fn resolver(pages: PageMap) -> Resolver {
        Resolver::with_fetcher(Arc::new(pages), ResolverConfig::default())
    }

    #[rstest]
    #[case("https://link.zhihu.com/?target=https%3A//example.org/posts/hello", "https://example.org/posts/hello")]
    #[case("https://link.juejin.cn/?target=https%3A%2F%2Fgithub.com%2Frust-lang", "https://github.com/rust-lang")]
    #[case("https://link.csdn.net/?target=https%3A%2F%2Fexample.com", "https://example.com")]
    #[case(
        "https://link.zhihu.com/?target=https%3A//link.zhihu.com/%3Ftarget%3Dhttps%253A//example.org/",
        "https://example.org/"
    )]
    #[case("https://link.zhihu.com/?utm=1", "https://link.zhihu.com/?utm=1")]
    #[case(
        "https://link.zhihu.com/?target=https://example.com/search?a=1&b=2",
        "https://example.com/search?a=1&b=2"
    )]
    #[case(
        "https://link.juejin.cn/?utm_source=x&target=https%3A%2F%2Fexample.com%2F%3Fq%3Drust%26page%3D2",
        "https://example.com/?q=rust&page=2"
    )]
    #[case("https://link.csdn.net/?target=https%3A%2F%2Fexample.com%2Fa#top", "https://example.com/a")]
    #[case("https://example.com/?target=https://github.com/", "https://example.com/?target=https://github.com/")]
    fn test_unwrap_redirects(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(resolver(PageMap::new()).unwrap_redirects(url), expected);
    }

    #[test]
    fn test_unwrap_is_capped() {
        let mut url = "https://example.org/".to_string();
        for _ in 0..6 {
            url = format!("https://link.zhihu.com/?target={}", urlencoding::encode(&url));
        }

        let config = ResolverConfig::builder().max_redirects(2).build();
        let resolver = Resolver::with_fetcher(Arc::new(PageMap::new()), config);
        let unwrapped = resolver.unwrap_redirects(&url);
        assert!(unwrapped.starts_with("https://link.zhihu.com/"));

        let resolver = Resolver::with_fetcher(Arc::new(PageMap::new()), ResolverConfig::default());
        let unwrapped = resolver.unwrap_redirects(&url);
        assert!(unwrapped.starts_with("https://link.zhihu.com/"));
        assert_ne!(unwrapped, url);
    }

    #[tokio::test]
    async fn test_site_resolution() {
        let resolution = resolver(PageMap::new()).try_resolve("https://github.com/microsoft/vscode").await;
        assert_eq!(resolution.site(), Some(Site::Github));
        assert_eq!(resolution.link().to_string(), "[vscode](https://github.com/microsoft/vscode)");
    }

    #[tokio::test]
    async fn test_link_with_site() {
        let resolver = resolver(PageMap::new());

        let repo = resolver.try_resolve("https://github.com/microsoft/vscode").await;
        assert_eq!(repo.link_with_site().to_string(), "[Github vscode](https://github.com/microsoft/vscode)");

        let root = resolver.try_resolve("https://github.com/").await;
        assert_eq!(root.link_with_site().to_string(), "[Github](https://github.com/)");

        let guessed = resolver.try_resolve("https://docs.example.com/guide/").await;
        assert_eq!(guessed.link_with_site(), *guessed.link());
    }

    #[tokio::test]
    async fn test_unregistered_url_is_guessed() {
        let resolution = resolver(PageMap::new()).try_resolve("https://docs.example.com/guide/installation/").await;
        assert!(matches!(resolution, Resolution::Guessed { cause: None, .. }));
        assert_eq!(resolution.link().title(), "example docs");
    }

    #[tokio::test]
    async fn test_fetch_failure_degrades_to_guess() {
        let url = "https://www.zhihu.com/question/446988424";
        let resolution = resolver(PageMap::new()).try_resolve(url).await;

        match resolution {
            Resolution::Guessed { link, cause: Some(cause) } => {
                assert_eq!(cause.kind(), ErrorKind::Transport);
                assert_eq!(link.to_string(), format!("[zhihu 446988424]({})", url));
            }
            other => panic!("expected a guess, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_redirector_resolves_like_target() {
        let resolver = resolver(PageMap::new());
        let direct = resolver.resolve("https://github.com/rust-lang").await;
        let wrapped = resolver
            .resolve("https://link.zhihu.com/?target=https%3A%2F%2Fgithub.com%2Frust-lang")
            .await;
        assert_eq!(direct, wrapped);
        assert_eq!(direct, "[rust-lang](https://github.com/rust-lang)");
    }

    #[tokio::test]
    async fn test_custom_registry_precedence() {
        let mut registry = Registry::new();
        registry.register(r"^https://github\.com/rust-lang", Site::Wikipedia).unwrap();
        let resolver = resolver(PageMap::new()).with_registry(registry);

        let resolution = resolver.try_resolve("https://github.com/rust-lang/rust").await;
        assert!(matches!(
            resolution,
            Resolution::Guessed { cause: Some(MdlinkError::NoMatch { site: "Wikipedia", .. }), .. }
        ));
    }

    #[tokio::test]
    async fn test_resolve_is_total() {
        let resolver = resolver(PageMap::new());
        for url in ["", "   ", "not a url", "http://[::1]:8080/", "https://github.com/a/b/c/d/e/f"] {
            assert!(resolver.resolve(url).await.starts_with('['));
        }
    }

    #[test]
    fn test_resolver_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Resolver>();
    }
}
