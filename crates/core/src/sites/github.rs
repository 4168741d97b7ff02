//! github.com and raw.githubusercontent.com

use std::sync::LazyLock;

use regex::Regex;

use super::{SiteHandler, UrlMatch, UrlPattern, decode_query, last_segment};
use crate::error::Result;
use crate::extract::FieldExtractor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Root,
    Search,
    UserTab,
    User,
    Repo,
    /// `blob`, `tree` and `files` views
    File,
    Commit,
    /// `{repo}/issues`, `{repo}/pulls`, `{repo}/actions`, ...
    Function,
    /// `{repo}/issues/12`, `{repo}/wiki/Page`, ...
    Routine,
}

static PATTERNS: LazyLock<Vec<UrlPattern<Shape>>> = LazyLock::new(|| {
    vec![
        UrlPattern::new(r"^https://github\.com/?$", Shape::Root),
        UrlPattern::new(r"^https://github\.com/search\?(?:[^#]*&)?q=(?P<query>[^&#]+)", Shape::Search),
        UrlPattern::new(
            r"^https://github\.com/(?P<user>[^/?#]+)/?\?(?:[^#]*&)?tab=(?P<tab>[^&#/]+)",
            Shape::UserTab,
        ),
        UrlPattern::new(r"^https://github\.com/(?P<user>[^/?#]+)/?(?:[?#].*)?$", Shape::User),
        UrlPattern::new(
            r"^https://github\.com/(?P<user>[^/?#]+)/(?P<repo>[^/?#]+)/?(?:[?#].*)?$",
            Shape::Repo,
        ),
        UrlPattern::new(
            r"^https://github\.com/(?P<user>[^/?#]+)/(?P<repo>[^/?#]+)/(?:blob|tree|files)/(?P<branch>[^/?#]+)/?(?P<file>[^?#]*?)/?(?:[?#].*)?$",
            Shape::File,
        ),
        UrlPattern::new(
            r"^https://github\.com/(?P<user>[^/?#]+)/(?P<repo>[^/?#]+)/commits?/(?P<commit>[^?#]+)",
            Shape::Commit,
        ),
        UrlPattern::new(
            r"^https://github\.com/(?P<user>[^/?#]+)/(?P<repo>[^/?#]+)/(?P<function>[^/?#]+)/?(?:[?#].*)?$",
            Shape::Function,
        ),
        UrlPattern::new(
            r"^https://github\.com/(?P<user>[^/?#]+)/(?P<repo>[^/?#]+)/(?P<function>[^/?#]+)/(?P<routine>[^?#]+?)/?(?:[?#].*)?$",
            Shape::Routine,
        ),
    ]
});

static ISSUE_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<bdi class="js-issue-title markdown-title">(.*?)</bdi>"#).unwrap());

/// What a GitHub URL points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GithubPage {
    Home,
    Search { query: String },
    User { user: String, tab: Option<String> },
    Repo { repo: String },
    File { repo: String, file: Option<String> },
    Commit { repo: String },
    Function { repo: String, function: String },
    /// An issue or pull request title, or the leaf of any other nested path.
    Item { title: String },
}

pub(crate) struct Github;

impl SiteHandler for Github {
    type Shape = Shape;
    type Fields = GithubPage;

    const NAME: &'static str = "Github";

    fn patterns() -> &'static [UrlPattern<Shape>] {
        &PATTERNS
    }

    async fn parse(matched: &UrlMatch<Shape>, page: &mut FieldExtractor<'_>) -> Result<GithubPage> {
        let fields = match matched.shape() {
            Shape::Root => GithubPage::Home,
            Shape::Search => GithubPage::Search { query: decode_query(matched.require("query")?) },
            Shape::UserTab | Shape::User => GithubPage::User {
                user: matched.require("user")?.to_string(),
                tab: matched.get("tab").map(str::to_string),
            },
            Shape::Repo => GithubPage::Repo { repo: matched.require("repo")?.to_string() },
            Shape::File => GithubPage::File {
                repo: matched.require("repo")?.to_string(),
                file: matched.get("file").and_then(last_segment),
            },
            Shape::Commit => GithubPage::Commit { repo: matched.require("repo")?.to_string() },
            Shape::Function => GithubPage::Function {
                repo: matched.require("repo")?.to_string(),
                function: matched.require("function")?.to_string(),
            },
            Shape::Routine => {
                let routine = matched.require("routine")?;
                let numbered = routine
                    .split('/')
                    .next()
                    .is_some_and(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()));

                let title = if numbered {
                    page.extract(&ISSUE_TITLE).await?
                } else {
                    last_segment(routine).unwrap_or_else(|| routine.to_string())
                };
                GithubPage::Item { title }
            }
        };

        Ok(fields)
    }

    fn format(fields: &GithubPage) -> Option<String> {
        match fields {
            GithubPage::Home => None,
            GithubPage::Search { query } => Some(format!("{} search", query)),
            GithubPage::User { user, tab: Some(tab) } => Some(format!("{} {}", user, tab)),
            GithubPage::User { user, tab: None } => Some(user.clone()),
            GithubPage::Repo { repo } => Some(repo.clone()),
            GithubPage::File { repo, file: Some(file) } => Some(format!("{} {}", repo, file)),
            GithubPage::File { repo, file: None } => Some(repo.clone()),
            GithubPage::Commit { repo } => Some(format!("{} commit", repo)),
            GithubPage::Function { repo, function } => Some(format!("{} {}", repo, function)),
            GithubPage::Item { title } => Some(title.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawShape {
    File,
}

static RAW_PATTERNS: LazyLock<Vec<UrlPattern<RawShape>>> = LazyLock::new(|| {
    vec![UrlPattern::new(
        r"^https://raw\.githubusercontent\.com/(?P<user>[^/]+)/(?P<repo>[^/]+)/(?P<branch>[^/]+)/(?P<path>[^?#]+)",
        RawShape::File,
    )]
});

/// Raw file links: titled `{repo} {file}` without fetching anything.
pub(crate) struct RawGithub;

impl SiteHandler for RawGithub {
    type Shape = RawShape;
    type Fields = (String, Option<String>);

    const NAME: &'static str = "githubusercontent";

    fn patterns() -> &'static [UrlPattern<RawShape>] {
        &RAW_PATTERNS
    }

    async fn parse(matched: &UrlMatch<RawShape>, _page: &mut FieldExtractor<'_>) -> Result<Self::Fields> {
        let repo = matched.require("repo")?.to_string();
        let file = matched.get("path").and_then(last_segment);
        Ok((repo, file))
    }

    fn format((repo, file): &Self::Fields) -> Option<String> {
        match file {
            Some(file) => Some(format!("{} {}", repo, file)),
            None => Some(repo.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::MdlinkError;
    use crate::sites::Site;
    use crate::sites::testing::PageMap;
    use rstest::rstest;

    #[rstest]
    #[case("https://github.com/", "[Github](https://github.com/)")]
    #[case("https://github.com", "[Github](https://github.com)")]
    #[case("https://github.com/luzhixing12345", "[luzhixing12345](https://github.com/luzhixing12345)")]
    #[case(
        "https://github.com/luzhixing12345?tab=followers/",
        "[luzhixing12345 followers](https://github.com/luzhixing12345?tab=followers/)"
    )]
    #[case("https://github.com/microsoft/vscode", "[vscode](https://github.com/microsoft/vscode)")]
    #[case("https://github.com/microsoft/vscode/", "[vscode](https://github.com/microsoft/vscode/)")]
    #[case(
        "https://github.com/fadedzipper/zCore-Tutorial/tree/dev",
        "[zCore-Tutorial](https://github.com/fadedzipper/zCore-Tutorial/tree/dev)"
    )]
    #[case(
        "https://github.com/fadedzipper/zCore-Tutorial/blob/dev/docs/book.toml",
        "[zCore-Tutorial book.toml](https://github.com/fadedzipper/zCore-Tutorial/blob/dev/docs/book.toml)"
    )]
    #[case(
        "https://github.com/microsoft/vscode/commit/0a1b2c3",
        "[vscode commit](https://github.com/microsoft/vscode/commit/0a1b2c3)"
    )]
    #[case("https://github.com/microsoft/vscode/issues", "[vscode issues](https://github.com/microsoft/vscode/issues)")]
    #[case(
        "https://github.com/microsoft/vscode/pulls?q=is%3Aopen",
        "[vscode pulls](https://github.com/microsoft/vscode/pulls?q=is%3Aopen)"
    )]
    #[case(
        "https://github.com/rust-lang/rust/wiki/Getting-Started",
        "[Getting-Started](https://github.com/rust-lang/rust/wiki/Getting-Started)"
    )]
    #[case(
        "https://github.com/search?q=rust+async&type=repositories",
        "[rust async search](https://github.com/search?q=rust+async&type=repositories)"
    )]
    #[tokio::test]
    async fn test_github_titles_without_fetch(#[case] url: &str, #[case] expected: &str) {
        let pages = PageMap::new();
        let link = Site::Github.resolve(url, &pages).await.unwrap();
        assert_eq!(link.to_string(), expected);
        assert!(pages.requested().is_empty());
    }

    #[tokio::test]
    async fn test_github_issue_title_is_fetched() {
        let url = "https://github.com/microsoft/vscode/issues/1234";
        let pages = PageMap::new().page(
            url,
            r#"<h1><bdi class="js-issue-title markdown-title">Terminal flickers on resize</bdi></h1>"#,
        );

        let link = Site::Github.resolve(url, &pages).await.unwrap();
        assert_eq!(link.title(), "Terminal flickers on resize");
        assert_eq!(pages.requested(), vec![url.to_string()]);
    }

    #[tokio::test]
    async fn test_github_issue_without_title_fails() {
        let url = "https://github.com/microsoft/vscode/pull/99";
        let pages = PageMap::new().page(url, "<html>redesigned</html>");

        let err = Site::Github.resolve(url, &pages).await.unwrap_err();
        assert!(matches!(err, MdlinkError::ExtractionFailed { .. }));
    }

    #[tokio::test]
    async fn test_raw_github() {
        let url = "https://raw.githubusercontent.com/rust-lang/rust/master/src/README.md";
        let link = Site::RawGithub.resolve(url, &PageMap::new()).await.unwrap();
        assert_eq!(link.title(), "rust README.md");
    }
}
