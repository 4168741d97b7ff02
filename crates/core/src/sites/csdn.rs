use std::sync::LazyLock;

use regex::Regex;

use super::{SiteHandler, UrlMatch, UrlPattern};
use crate::error::Result;
use crate::extract::FieldExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Root,
    Category,
    User,
    Article,
    ShortLink,
}

static PATTERNS: LazyLock<Vec<UrlPattern<Shape>>> = LazyLock::new(|| {
    vec![
        UrlPattern::new(r"^https://blog\.csdn\.net/?$", Shape::Root),
        UrlPattern::new(
            r"^https://blog\.csdn\.net/(?P<user>[^/?#]+)/(?P<category>category_[^/?#]+)\.html(?:[?#].*)?$",
            Shape::Category,
        ),
        UrlPattern::new(r"^https://blog\.csdn\.net/(?P<user>[^/?#]+)/?(?:\?type=[^#]*)?$", Shape::User),
        UrlPattern::new(
            r"^https://blog\.csdn\.net/(?P<user>[^/?#]+)/article/details/(?P<article>\d+)/?(?:[?#].*)?$",
            Shape::Article,
        ),
        UrlPattern::new(r"^https?://t\.csdn\.cn/(?P<short>[^/?#]+)/?$", Shape::ShortLink),
    ]
});

static ARTICLE_KEYWORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<meta name="keywords" content="(.*?)">"#).unwrap());
static COLUMN_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<h3 class="column_title oneline" title=[^>]*>(.*?)</h3>"#).unwrap());
static NICKNAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"data-nickname="(.*?)""#).unwrap());

pub(crate) struct Csdn;

impl SiteHandler for Csdn {
    type Shape = Shape;
    /// Article, column or author name; `None` for the blog root.
    type Fields = Option<String>;

    const NAME: &'static str = "csdn";

    fn patterns() -> &'static [UrlPattern<Shape>] {
        &PATTERNS
    }

    fn canonical_url(matched: &UrlMatch<Shape>) -> Option<String> {
        match matched.shape() {
            Shape::Article => Some(format!(
                "https://blog.csdn.net/{}/article/details/{}",
                matched.get("user")?,
                matched.get("article")?
            )),
            _ => None,
        }
    }

    async fn parse(matched: &UrlMatch<Shape>, page: &mut FieldExtractor<'_>) -> Result<Option<String>> {
        let pattern = match matched.shape() {
            Shape::Root => return Ok(None),
            Shape::Category => &COLUMN_TITLE,
            Shape::User => &NICKNAME,
            Shape::Article | Shape::ShortLink => &ARTICLE_KEYWORDS,
        };

        page.extract(pattern).await.map(Some)
    }

    fn format(name: &Option<String>) -> Option<String> {
        name.clone()
    }
}
