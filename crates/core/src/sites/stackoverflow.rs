use std::sync::LazyLock;

use regex::Regex;

use super::{SiteHandler, UrlMatch, UrlPattern, decode_path};
use crate::error::{MdlinkError, Result};
use crate::extract::FieldExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Root,
    Tagged,
    Item,
}

static PATTERNS: LazyLock<Vec<UrlPattern<Shape>>> = LazyLock::new(|| {
    vec![
        UrlPattern::new(r"^https://stackoverflow\.com/?$", Shape::Root),
        UrlPattern::new(
            r"^https://stackoverflow\.com/(?P<kind>[^/?#]+)/tagged/(?P<tag>[^/?#]+)/?(?:[?#].*)?$",
            Shape::Tagged,
        ),
        UrlPattern::new(
            r"^https://stackoverflow\.com/(?P<kind>[^/?#]+)/(?P<id>[^/?#]+)(?:/(?P<slug>[^/?#]+))?/?(?:[?#].*)?$",
            Shape::Item,
        ),
    ]
});

static QUESTION_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<a [^>]*class="question-hyperlink"[^>]*>(.*?)</a>"#).unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Post {
    Home,
    Tag(String),
    Question(String),
    Answer(String),
    User(String),
}

pub(crate) struct StackOverflow;

impl SiteHandler for StackOverflow {
    type Shape = Shape;
    type Fields = Post;

    const NAME: &'static str = "stackoverflow";

    fn patterns() -> &'static [UrlPattern<Shape>] {
        &PATTERNS
    }

    async fn parse(matched: &UrlMatch<Shape>, page: &mut FieldExtractor<'_>) -> Result<Post> {
        match matched.shape() {
            Shape::Root => Ok(Post::Home),
            Shape::Tagged => Ok(Post::Tag(decode_path(matched.require("tag")?))),
            Shape::Item => match matched.require("kind")? {
                "questions" | "q" => {
                    let slug = matched.get("slug").filter(|slug| !slug.chars().all(|c| c.is_ascii_digit()));
                    let title = match slug {
                        Some(slug) => decode_path(slug).replace('-', " "),
                        None => page.extract(&QUESTION_TITLE).await?,
                    };
                    Ok(Post::Question(title))
                }
                "a" => Ok(Post::Answer(page.extract(&QUESTION_TITLE).await?)),
                "users" => Ok(Post::User(decode_path(matched.require("slug")?))),
                _ => Err(MdlinkError::NoMatch { site: Self::NAME, url: page.url().to_string() }),
            },
        }
    }

    fn format(post: &Post) -> Option<String> {
        match post {
            Post::Home => None,
            Post::Tag(tag) => Some(format!("{} tag", tag)),
            Post::Question(title) => Some(format!("{} [question]", title)),
            Post::Answer(title) => Some(format!("{} [answer]", title)),
            Post::User(name) => Some(name.clone()),
        }
    }
}
