//! www.zhihu.com and zhuanlan.zhihu.com

use std::sync::LazyLock;

use regex::Regex;

use super::{SiteHandler, UrlMatch, UrlPattern};
use crate::error::{MdlinkError, Result};
use crate::extract::FieldExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Root,
    Answer,
    ProfileTab,
    Profile,
    Question,
    Collection,
    Column,
    Post,
}

static PATTERNS: LazyLock<Vec<UrlPattern<Shape>>> = LazyLock::new(|| {
    vec![
        UrlPattern::new(r"^https://www\.zhihu\.com/?$", Shape::Root),
        UrlPattern::new(
            r"^https://www\.zhihu\.com/question/(?P<question>\d+)/answer/(?P<id>\d+)/?(?:[?#].*)?$",
            Shape::Answer,
        ),
        UrlPattern::new(
            r"^https://www\.zhihu\.com/people/(?P<id>[^/?#]+)/(?P<tab>[^/?#]+)/?(?:[?#].*)?$",
            Shape::ProfileTab,
        ),
        UrlPattern::new(r"^https://www\.zhihu\.com/people/(?P<id>[^/?#]+)/?(?:[?#].*)?$", Shape::Profile),
        UrlPattern::new(r"^https://www\.zhihu\.com/question/(?P<id>\d+)/?(?:[?#].*)?$", Shape::Question),
        UrlPattern::new(r"^https://www\.zhihu\.com/collection/(?P<id>\d+)/?(?:[?#].*)?$", Shape::Collection),
        UrlPattern::new(r"^https://www\.zhihu\.com/column/(?P<id>[^/?#]+)/?(?:[?#].*)?$", Shape::Column),
        UrlPattern::new(r"^https://zhuanlan\.zhihu\.com/p/(?P<id>\d+)/?(?:[?#].*)?$", Shape::Post),
    ]
});

/// Profile tabs and how their pages are labelled.
const PROFILE_TABS: &[(&str, &str)] = &[
    ("answers", "回答"),
    ("zvideos", "视频"),
    ("asks", "提问"),
    ("posts", "文章"),
    ("columns", "专栏"),
    ("pins", "想法"),
    ("collections", "收藏"),
    ("following", "关注"),
];

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

static QUESTION_TITLE: LazyLock<Regex> = LazyLock::new(|| regex(r#"<h1 class="QuestionHeader-title">(.*?)</h1>"#));
static POST_TITLE: LazyLock<Regex> = LazyLock::new(|| regex(r#"<h1 class="Post-Title">(.*?)</h1>"#));
static PROFILE_NAME: LazyLock<Regex> = LazyLock::new(|| regex(r#"<span class="ProfileHeader-name">(.*?)</span"#));
static COLLECTION_TITLE: LazyLock<Regex> =
    LazyLock::new(|| regex(r#"<div class="CollectionDetailPageHeader-title">(.*?)</div>"#));
static COLUMN_TITLE: LazyLock<Regex> = LazyLock::new(|| regex(r#"<div class="css-zyehvu">(.*?)</div>"#));
// Profile names sometimes carry an inline emotion stylesheet.
static INLINE_STYLE: LazyLock<Regex> = LazyLock::new(|| regex(r"(?s)<style.*>"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ZhihuPage {
    Home,
    Question(String),
    Answer(String),
    Profile { name: String, tab: Option<&'static str> },
    Collection(String),
    Column(String),
    Post(String),
}

pub(crate) struct Zhihu;

impl SiteHandler for Zhihu {
    type Shape = Shape;
    type Fields = ZhihuPage;

    const NAME: &'static str = "知乎";

    fn patterns() -> &'static [UrlPattern<Shape>] {
        &PATTERNS
    }

    async fn parse(matched: &UrlMatch<Shape>, page: &mut FieldExtractor<'_>) -> Result<ZhihuPage> {
        let fields = match matched.shape() {
            Shape::Root => ZhihuPage::Home,
            Shape::Question => ZhihuPage::Question(page.extract(&QUESTION_TITLE).await?),
            Shape::Answer => ZhihuPage::Answer(page.extract(&QUESTION_TITLE).await?),
            Shape::Profile => ZhihuPage::Profile { name: profile_name(page).await?, tab: None },
            Shape::ProfileTab => {
                let tab = matched.require("tab")?;
                let label = PROFILE_TABS
                    .iter()
                    .find(|(key, _)| *key == tab)
                    .map(|(_, label)| *label)
                    .ok_or_else(|| MdlinkError::NoMatch { site: Self::NAME, url: page.url().to_string() })?;
                ZhihuPage::Profile { name: profile_name(page).await?, tab: Some(label) }
            }
            Shape::Collection => ZhihuPage::Collection(page.extract(&COLLECTION_TITLE).await?),
            Shape::Column => ZhihuPage::Column(page.extract(&COLUMN_TITLE).await?),
            Shape::Post => ZhihuPage::Post(page.extract(&POST_TITLE).await?),
        };

        Ok(fields)
    }

    fn format(fields: &ZhihuPage) -> Option<String> {
        match fields {
            ZhihuPage::Home => None,
            ZhihuPage::Question(title) | ZhihuPage::Post(title) => Some(title.clone()),
            ZhihuPage::Answer(question) => Some(format!("{}的回答", question)),
            ZhihuPage::Profile { name, tab: None } => Some(format!("{}的主页", name)),
            ZhihuPage::Profile { name, tab: Some(label) } => Some(format!("{}的{}", name, label)),
            ZhihuPage::Collection(title) => Some(format!("{} 收藏夹", title)),
            ZhihuPage::Column(title) => Some(format!("{} 专栏", title)),
        }
    }
}

async fn profile_name(page: &mut FieldExtractor<'_>) -> Result<String> {
    let raw = page.extract(&PROFILE_NAME).await?;
    Ok(INLINE_STYLE.replace_all(&raw, "").trim().to_string())
}
