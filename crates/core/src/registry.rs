//! Dispatch registry: which site handles which URL.
//!
//! The registry is an ordered list of anchored patterns. Lookup walks it in
//! insertion order and the first match wins, so more specific patterns must
//! be registered before broader ones.

use regex::Regex;

use crate::error::{MdlinkError, Result};
use crate::sites::Site;

/// Built-in dispatch table.
const BUILTIN: &[(&str, Site)] = &[
    (r"^https://github\.com", Site::Github),
    (r"^https://[^/]+\.github\.io", Site::GithubPages),
    (r"^https://stackoverflow\.com", Site::StackOverflow),
    (r"^https://www\.youtube\.com", Site::YouTube),
    (r"^https://youtu\.be/", Site::YouTube),
    (r"^https://zhuanlan\.zhihu\.com", Site::Zhihu),
    (r"^https://www\.zhihu\.com", Site::Zhihu),
    (r"^https://www\.bilibili\.com", Site::Bilibili),
    (r"^https://space\.bilibili\.com/", Site::Bilibili),
    (r"^https://blog\.csdn\.net", Site::Csdn),
    (r"^https?://t\.csdn\.cn/", Site::Csdn),
    (r"^https://raw\.githubusercontent\.com", Site::RawGithub),
    (r"^https://www\.cnblogs\.com", Site::Cnblogs),
    (r"^https://www\.jianshu\.com", Site::Jianshu),
    (r"^https://cloud\.tencent\.com", Site::TencentCloud),
    (r"^https://book\.douban\.com", Site::Douban),
    (r"^https://juejin\.cn", Site::Juejin),
    (r"^https://en\.wikipedia\.org/wiki/", Site::Wikipedia),
    (r"^https://mp\.weixin\.qq\.com/s/", Site::Weixin),
    (r"^https://www\.geeksforgeeks\.org/", Site::GeeksForGeeks),
    (r"^https://sourceforge\.net/projects/", Site::SourceForge),
    (r"^https://marketplace\.visualstudio\.com/items\?itemName=", Site::VsMarketplace),
    (r"^https://xie\.infoq\.cn/", Site::InfoQ),
    (r"^https://www\.51cto\.com/", Site::Cto51),
    (r"^https://www\.sohu\.com/", Site::Sohu),
];

/// One registry entry.
#[derive(Debug, Clone)]
pub struct Registration {
    pattern: Regex,
    site: Site,
}

impl Registration {
    /// Compile an entry. Patterns must be anchored with `^`.
    pub fn new(pattern: &str, site: Site) -> Result<Self> {
        if !pattern.starts_with('^') {
            return Err(MdlinkError::ConfigError(format!("pattern for {} is not anchored: {}", site, pattern)));
        }

        let pattern = Regex::new(pattern)
            .map_err(|e| MdlinkError::ConfigError(format!("invalid pattern for {}: {}", site, e)))?;

        Ok(Self { pattern, site })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn site(&self) -> Site {
        self.site
    }

    pub fn is_match(&self, url: &str) -> bool {
        self.pattern.is_match(url)
    }
}

/// Ordered pattern → site table.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: Vec<Registration>,
}

impl Registry {
    /// An empty registry: every URL falls through to the guesser.
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// The built-in table covering every [`Site`].
    pub fn builtin() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(pattern, site)| {
                Registration::new(pattern, *site).unwrap_or_else(|e| panic!("built-in registry entry: {e}"))
            })
            .collect();

        Self { entries }
    }

    /// Append an entry after every existing one.
    pub fn register(&mut self, pattern: &str, site: Site) -> Result<&mut Self> {
        self.entries.push(Registration::new(pattern, site)?);
        Ok(self)
    }

    /// The first site whose pattern matches `url`.
    pub fn lookup(&self, url: &str) -> Option<Site> {
        self.entries.iter().find(|entry| entry.is_match(url)).map(Registration::site)
    }

    pub fn entries(&self) -> &[Registration] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
