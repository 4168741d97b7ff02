//! Single-page article sites.
//!
//! These sites all follow the same recipe: one or two URL shapes, each titled
//! from a single source (a page heading, the `<title>` tag minus the site
//! suffix, the Open Graph title, or a URL capture). They share one generic
//! handler, [`Article`], parameterised by a small [`ArticleSite`] description.

use std::marker::PhantomData;
use std::sync::LazyLock;

use regex::Regex;

use super::{SiteHandler, UrlMatch, UrlPattern, decode_path};
use crate::error::Result;
use crate::extract::{FieldExtractor, strip_site_suffix};

/// Where an article title comes from.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TitleSource {
    /// First group of a page-specific pattern.
    Heading(&'static LazyLock<Regex>),
    /// The `<title>` element with any of these site suffixes removed.
    TitleTag(&'static [&'static str]),
    /// `<meta property="og:title">`
    OpenGraph,
    /// A URL capture, percent-decoded, `separator` turned into spaces, then
    /// `suffix` appended.
    Slug { group: &'static str, separator: Option<char>, suffix: &'static str },
}

static TITLE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<title[^>]*>(.*?)</title>").unwrap());
static OG_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<meta\s+property="og:title"\s+content="(.*?)""#).unwrap());

/// Static description of one article site.
pub(crate) trait ArticleSite {
    const NAME: &'static str;

    fn patterns() -> &'static [UrlPattern<TitleSource>];

    /// Final touch applied to the title.
    fn decorate(title: String) -> String {
        title
    }
}

pub(crate) struct Article<T>(PhantomData<T>);

impl<T: ArticleSite> SiteHandler for Article<T> {
    type Shape = TitleSource;
    type Fields = String;

    const NAME: &'static str = T::NAME;

    fn patterns() -> &'static [UrlPattern<TitleSource>] {
        T::patterns()
    }

    async fn parse(matched: &UrlMatch<TitleSource>, page: &mut FieldExtractor<'_>) -> Result<String> {
        let title = match matched.shape() {
            TitleSource::Heading(pattern) => page.extract(pattern).await?,
            TitleSource::TitleTag(suffixes) => {
                let title = page.extract(&TITLE_TAG).await?;
                strip_site_suffix(&title, suffixes).to_string()
            }
            TitleSource::OpenGraph => page.extract(&OG_TITLE).await?,
            TitleSource::Slug { group, separator, suffix } => {
                let mut slug = decode_path(matched.require(group)?);
                if let Some(separator) = separator {
                    slug = slug.replace(separator, " ");
                }
                format!("{}{}", slug.trim(), suffix)
            }
        };

        Ok(T::decorate(title))
    }

    fn format(title: &String) -> Option<String> {
        Some(title.clone())
    }
}

macro_rules! article_site {
    ($site:ident, $alias:ident, $name:literal, [$(($pattern:literal, $source:expr)),+ $(,)?]) => {
        pub(crate) struct $site;

        impl ArticleSite for $site {
            const NAME: &'static str = $name;

            fn patterns() -> &'static [UrlPattern<TitleSource>] {
                static PATTERNS: LazyLock<Vec<UrlPattern<TitleSource>>> =
                    LazyLock::new(|| vec![$(UrlPattern::new($pattern, $source)),+]);
                &PATTERNS
            }
        }

        pub(crate) type $alias = Article<$site>;
    };
}

static CNBLOGS_POST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)id="cb_post_title_url"[^>]*>\s*<span[^>]*>(.*?)</span>"#).unwrap());
static DOUBAN_BOOK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<span property="v:itemreviewed">(.*?)</span>"#).unwrap());

article_site!(CnblogsSite, Cnblogs, "博客园", [
    (r"^https://www\.cnblogs\.com/(?P<user>[^/?#]+)/p/(?P<id>[^/?#]+)/?(?:[?#].*)?$", TitleSource::Heading(&CNBLOGS_POST)),
    (
        r"^https://www\.cnblogs\.com/(?P<user>[^/?#]+)/?(?:[?#].*)?$",
        TitleSource::Slug { group: "user", separator: None, suffix: " - 博客园" }
    ),
]);

article_site!(JianshuSite, Jianshu, "简书", [
    (r"^https://www\.jianshu\.com/[pu]/(?P<id>[^/?#]+)/?(?:[?#].*)?$", TitleSource::TitleTag(&[" - 简书"])),
]);

article_site!(TencentCloudSite, TencentCloud, "腾讯云", [
    (
        r"^https://cloud\.tencent\.com/developer/article/(?P<id>\d+)/?(?:[?#].*)?$",
        TitleSource::TitleTag(&["-腾讯云开发者社区-腾讯云"])
    ),
]);

article_site!(JuejinSite, Juejin, "掘金", [
    (r"^https://juejin\.cn/post/(?P<id>\d+)/?(?:[?#].*)?$", TitleSource::TitleTag(&[" - 掘金"])),
]);

article_site!(WikipediaSite, Wikipedia, "Wikipedia", [
    (
        r"^https://en\.wikipedia\.org/wiki/(?P<article>[^?#]+?)/?(?:[?#].*)?$",
        TitleSource::Slug { group: "article", separator: Some('_'), suffix: "" }
    ),
]);

article_site!(WeixinSite, Weixin, "微信公众号", [
    (r"^https://mp\.weixin\.qq\.com/s/(?P<id>[^/?#]+)", TitleSource::OpenGraph),
]);

article_site!(GeeksForGeeksSite, GeeksForGeeks, "GeeksforGeeks", [
    (
        r"^https://www\.geeksforgeeks\.org/(?P<slug>[^/?#]+)/?(?:[?#].*)?$",
        TitleSource::Slug { group: "slug", separator: Some('-'), suffix: "" }
    ),
]);

article_site!(SourceForgeSite, SourceForge, "SourceForge", [
    (
        r"^https://sourceforge\.net/projects/(?P<name>[^/?#]+)",
        TitleSource::Slug { group: "name", separator: None, suffix: "" }
    ),
]);

article_site!(VsMarketplaceSite, VsMarketplace, "Visual Studio Marketplace", [
    (
        r"^https://marketplace\.visualstudio\.com/items\?itemName=(?P<item>[^&#]+)",
        TitleSource::TitleTag(&[" - Visual Studio Marketplace"])
    ),
]);

article_site!(InfoQSite, InfoQ, "InfoQ", [
    (r"^https://xie\.infoq\.cn/article/(?P<id>[^/?#]+)", TitleSource::OpenGraph),
]);

article_site!(Cto51Site, Cto51, "51CTO", [
    (r"^https://www\.51cto\.com/article/(?P<id>\d+)\.html", TitleSource::TitleTag(&["-51CTO.COM"])),
]);

article_site!(SohuSite, Sohu, "搜狐", [
    (r"^https://www\.sohu\.com/a/(?P<id>[^/?#]+)", TitleSource::OpenGraph),
]);

/// Book pages, titled with the book's name in title marks.
pub(crate) struct DoubanSite;

impl ArticleSite for DoubanSite {
    const NAME: &'static str = "豆瓣读书";

    fn patterns() -> &'static [UrlPattern<TitleSource>] {
        static PATTERNS: LazyLock<Vec<UrlPattern<TitleSource>>> = LazyLock::new(|| {
            vec![UrlPattern::new(
                r"^https://book\.douban\.com/subject/(?P<id>\d+)/?(?:[?#].*)?$",
                TitleSource::Heading(&DOUBAN_BOOK),
            )]
        });
        &PATTERNS
    }

    fn decorate(title: String) -> String {
        format!("《{}》", title)
    }
}

pub(crate) type Douban = Article<DoubanSite>;

#[cfg(test)]
mod tests {
    use crate::error::MdlinkError;
    use crate::sites::Site;
    use crate::sites::testing::PageMap;
    use rstest::rstest;

    #[rstest]
    #[case(Site::Wikipedia, "https://en.wikipedia.org/wiki/Rust_(programming_language)", "Rust (programming language)")]
    #[case(Site::Wikipedia, "https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm", "Dijkstra's algorithm")]
    #[case(Site::GeeksForGeeks, "https://www.geeksforgeeks.org/python-list-comprehension/", "python list comprehension")]
    #[case(Site::SourceForge, "https://sourceforge.net/projects/sevenzip/", "sevenzip")]
    #[case(Site::Cnblogs, "https://www.cnblogs.com/lfri", "lfri - 博客园")]
    #[tokio::test]
    async fn test_titles_from_url(#[case] site: Site, #[case] url: &str, #[case] expected: &str) {
        let pages = PageMap::new();
        let link = site.resolve(url, &pages).await.unwrap();
        assert_eq!(link.title(), expected);
        assert!(pages.requested().is_empty());
    }

    #[rstest]
    #[case(
        Site::Cnblogs,
        "https://www.cnblogs.com/lfri/p/12345.html",
        "<h1 class=\"postTitle\">\n  <a id=\"cb_post_title_url\" class=\"postTitle2\" href=\"#\">\n    <span role=\"heading\">Linux 调度器</span>\n  </a>\n</h1>",
        "Linux 调度器"
    )]
    #[case(Site::Jianshu, "https://www.jianshu.com/p/0a1b2c3d", "<title>读书笔记 - 简书</title>", "读书笔记")]
    #[case(
        Site::TencentCloud,
        "https://cloud.tencent.com/developer/article/1946217",
        "<title>eBPF 入门-腾讯云开发者社区-腾讯云</title>",
        "eBPF 入门"
    )]
    #[case(
        Site::Douban,
        "https://book.douban.com/subject/1148282/",
        r#"<span property="v:itemreviewed">深入理解计算机系统</span>"#,
        "《深入理解计算机系统》"
    )]
    #[case(Site::Juejin, "https://juejin.cn/post/7210", "<title>Rust 所有权 - 掘金</title>", "Rust 所有权")]
    #[case(
        Site::Weixin,
        "https://mp.weixin.qq.com/s/AbCdEf",
        r#"<meta property="og:title" content="周末读书 &amp; 随想" />"#,
        "周末读书 & 随想"
    )]
    #[case(
        Site::VsMarketplace,
        "https://marketplace.visualstudio.com/items?itemName=rust-lang.rust-analyzer",
        "<title>rust-analyzer - Visual Studio Marketplace</title>",
        "rust-analyzer"
    )]
    #[case(Site::InfoQ, "https://xie.infoq.cn/article/abc123", r#"<meta property="og:title" content="架构师成长">"#, "架构师成长")]
    #[case(Site::Cto51, "https://www.51cto.com/article/757372.html", "<title>云原生观察-51CTO.COM</title>", "云原生观察")]
    #[case(Site::Sohu, "https://www.sohu.com/a/123_456", r#"<meta property="og:title" content="科技新闻">"#, "科技新闻")]
    #[tokio::test]
    async fn test_fetched_titles(#[case] site: Site, #[case] url: &str, #[case] body: &str, #[case] expected: &str) {
        let pages = PageMap::new().page(url, body);
        let link = site.resolve(url, &pages).await.unwrap();
        assert_eq!(link.title(), expected);
        assert_eq!(pages.requested(), vec![url.to_string()]);
    }

    #[tokio::test]
    async fn test_changed_markup_is_extraction_failure() {
        let url = "https://book.douban.com/subject/1/";
        let pages = PageMap::new().page(url, "<h1>redesigned</h1>");

        let err = Site::Douban.resolve(url, &pages).await.unwrap_err();
        assert!(matches!(err, MdlinkError::ExtractionFailed { .. }));
    }

    #[test]
    fn test_names() {
        assert_eq!(Site::Douban.name(), "豆瓣读书");
        assert_eq!(Site::Cto51.name(), "51CTO");
    }
}
