//! `{user}.github.io` sites

use std::sync::LazyLock;

use super::{SiteHandler, UrlMatch, UrlPattern, decode_path};
use crate::error::Result;
use crate::extract::FieldExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    UserRoot,
    Nested,
    Repo,
}

static PATTERNS: LazyLock<Vec<UrlPattern<Shape>>> = LazyLock::new(|| {
    vec![
        UrlPattern::new(r"^https://(?P<user>[^./]+)\.github\.io/?$", Shape::UserRoot),
        UrlPattern::new(
            r"^https://(?P<user>[^./]+)\.github\.io/(?P<repo>[^/?#]+)/(?P<routine>[^?#]+?)/?(?:[?#].*)?$",
            Shape::Nested,
        ),
        UrlPattern::new(r"^https://(?P<user>[^./]+)\.github\.io/(?P<repo>[^/?#]+?)/?(?:[?#].*)?$", Shape::Repo),
    ]
});

const INDEX_PAGES: &[&str] = &["index", "index.html", "index.htm"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PagesFields {
    user: String,
    repo: Option<String>,
    /// Last meaningful path segment below the repository.
    page: Option<String>,
}

pub(crate) struct GithubPages;

impl SiteHandler for GithubPages {
    type Shape = Shape;
    type Fields = PagesFields;

    const NAME: &'static str = "Github Pages";

    fn patterns() -> &'static [UrlPattern<Shape>] {
        &PATTERNS
    }

    async fn parse(matched: &UrlMatch<Shape>, _page: &mut FieldExtractor<'_>) -> Result<PagesFields> {
        let user = matched.require("user")?.to_string();
        let repo = matched.get("repo").map(decode_path);
        let page = matched.get("routine").and_then(meaningful_segment);

        Ok(PagesFields { user, repo, page })
    }

    fn format(fields: &PagesFields) -> Option<String> {
        match (&fields.repo, &fields.page) {
            (_, Some(page)) => Some(page.clone()),
            (Some(repo), None) => Some(format!("{} document", repo)),
            (None, None) => Some(format!("{}'s blog", fields.user)),
        }
    }
}

/// The last segment that is not an index page, without its `.html` suffix.
fn meaningful_segment(path: &str) -> Option<String> {
    path.split('/')
        .rev()
        .filter(|s| !s.is_empty())
        .find(|s| !INDEX_PAGES.contains(s))
        .map(|s| s.strip_suffix(".html").or_else(|| s.strip_suffix(".htm")).unwrap_or(s))
        .filter(|s| !s.is_empty())
        .map(decode_path)
}
