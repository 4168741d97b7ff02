use std::sync::LazyLock;

use regex::Regex;

use super::{SiteHandler, UrlMatch, UrlPattern};
use crate::error::{MdlinkError, Result};
use crate::extract::{FieldExtractor, strip_site_suffix};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Root,
    Item,
    Space,
}

static PATTERNS: LazyLock<Vec<UrlPattern<Shape>>> = LazyLock::new(|| {
    vec![
        UrlPattern::new(r"^https://www\.bilibili\.com/?$", Shape::Root),
        UrlPattern::new(
            r"^https://www\.bilibili\.com/(?P<kind>[^/?#]+)/(?P<id>[^/?#]+)/?(?:[?#].*)?$",
            Shape::Item,
        ),
        UrlPattern::new(r"^https://space\.bilibili\.com/(?P<uid>\d+)/?(?:[?#].*)?$", Shape::Space),
    ]
});

static VIDEO_TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<h1 [^>]*>(.*?)</h1>").unwrap());
static READ_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<title data-vue-meta="true">(.*?)</title>"#).unwrap());
static SPACE_OWNER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<title>(.*?)的个人空间").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BilibiliPage {
    Home,
    Video(String),
    /// Dynamic posts render client side and have no usable title.
    Opus,
    Read(String),
    Space(String),
}

pub(crate) struct Bilibili;

impl SiteHandler for Bilibili {
    type Shape = Shape;
    type Fields = BilibiliPage;

    const NAME: &'static str = "bilibili";

    fn patterns() -> &'static [UrlPattern<Shape>] {
        &PATTERNS
    }

    /// Links shared from the app carry `spm_id_from` and friends.
    fn canonical_url(matched: &UrlMatch<Shape>) -> Option<String> {
        match matched.shape() {
            Shape::Root => None,
            Shape::Item => Some(format!(
                "https://www.bilibili.com/{}/{}",
                matched.get("kind")?,
                matched.get("id")?
            )),
            Shape::Space => Some(format!("https://space.bilibili.com/{}", matched.get("uid")?)),
        }
    }

    async fn parse(matched: &UrlMatch<Shape>, page: &mut FieldExtractor<'_>) -> Result<BilibiliPage> {
        match matched.shape() {
            Shape::Root => Ok(BilibiliPage::Home),
            Shape::Space => Ok(BilibiliPage::Space(page.extract(&SPACE_OWNER).await?)),
            Shape::Item => match matched.require("kind")? {
                "video" => Ok(BilibiliPage::Video(page.extract(&VIDEO_TITLE).await?)),
                "opus" => Ok(BilibiliPage::Opus),
                "read" => {
                    let title = page.extract(&READ_TITLE).await?;
                    Ok(BilibiliPage::Read(strip_site_suffix(&title, &[" - 哔哩哔哩"]).to_string()))
                }
                _ => Err(MdlinkError::NoMatch { site: Self::NAME, url: page.url().to_string() }),
            },
        }
    }

    fn format(fields: &BilibiliPage) -> Option<String> {
        match fields {
            BilibiliPage::Home => None,
            BilibiliPage::Video(title) => Some(title.clone()),
            BilibiliPage::Opus => Some("B站动态".to_string()),
            BilibiliPage::Read(title) => Some(format!("{} 专栏", title)),
            BilibiliPage::Space(name) => Some(format!("{}的个人空间", name)),
        }
    }
}
