//! YouTube channels, videos and playlists.
//!
//! Video pages render their title client side, so titles come from the public
//! oEmbed endpoint instead of the page itself.

use std::sync::LazyLock;

use serde::Deserialize;

use super::{SiteHandler, UrlMatch, UrlPattern, decode_path};
use crate::error::{MdlinkError, Result};
use crate::extract::FieldExtractor;

pub const OEMBED_ENDPOINT: &str = "https://www.youtube.com/oembed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Root,
    Channel,
    Video,
    Playlist,
}

static PATTERNS: LazyLock<Vec<UrlPattern<Shape>>> = LazyLock::new(|| {
    vec![
        UrlPattern::new(r"^https://www\.youtube\.com/?$", Shape::Root),
        UrlPattern::new(r"^https://www\.youtube\.com/@(?P<handle>[^/?#]+)(?:[/?#].*)?$", Shape::Channel),
        UrlPattern::new(r"^https://www\.youtube\.com/watch\?(?:[^#]*&)?v=(?P<id>[^&#/]+)", Shape::Video),
        UrlPattern::new(r"^https://youtu\.be/(?P<id>[^/?#]+)", Shape::Video),
        UrlPattern::new(r"^https://www\.youtube\.com/playlist\?(?:[^#]*&)?list=(?P<list>[^&#/]+)", Shape::Playlist),
    ]
});

#[derive(Debug, Deserialize)]
struct OembedResponse {
    title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Media {
    Home,
    Channel(String),
    /// A video or playlist title.
    Titled(String),
}

pub(crate) struct YouTube;

impl SiteHandler for YouTube {
    type Shape = Shape;
    type Fields = Media;

    const NAME: &'static str = "youtube";

    fn patterns() -> &'static [UrlPattern<Shape>] {
        &PATTERNS
    }

    async fn parse(matched: &UrlMatch<Shape>, page: &mut FieldExtractor<'_>) -> Result<Media> {
        match matched.shape() {
            Shape::Root => Ok(Media::Home),
            Shape::Channel => Ok(Media::Channel(decode_path(matched.require("handle")?))),
            Shape::Video | Shape::Playlist => {
                let endpoint = oembed_url(page.url());
                let body = page.fetch_other(&endpoint).await?;
                let response: OembedResponse = serde_json::from_str(&body)
                    .map_err(|e| MdlinkError::InvalidResponse { url: endpoint, message: e.to_string() })?;
                Ok(Media::Titled(response.title))
            }
        }
    }

    fn format(media: &Media) -> Option<String> {
        match media {
            Media::Home => None,
            Media::Channel(handle) => Some(handle.clone()),
            Media::Titled(title) => Some(title.trim().to_string()),
        }
    }
}

/// The oEmbed query for a video or playlist URL.
pub fn oembed_url(url: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("format", "json")
        .append_pair("url", url)
        .finish();
    format!("{}?{}", OEMBED_ENDPOINT, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sites::Site;
    use crate::sites::testing::PageMap;
    use rstest::rstest;

    #[test]
    fn test_oembed_url() {
        assert_eq!(
            oembed_url("https://www.youtube.com/watch?v=ErV-2tlf9Ls"),
            "https://www.youtube.com/oembed?format=json&url=https%3A%2F%2Fwww.youtube.com%2Fwatch%3Fv%3DErV-2tlf9Ls"
        );
    }

    #[rstest]
    #[case("https://www.youtube.com/", "youtube")]
    #[case("https://www.youtube.com/@LinusTechTips", "LinusTechTips")]
    #[case("https://www.youtube.com/@LinusTechTips/videos", "LinusTechTips")]
    #[tokio::test]
    async fn test_titles_without_fetch(#[case] url: &str, #[case] expected: &str) {
        let link = Site::YouTube.resolve(url, &PageMap::new()).await.unwrap();
        assert_eq!(link.title(), expected);
    }

    #[rstest]
    #[case("https://www.youtube.com/watch?v=ErV-2tlf9Ls")]
    #[case("https://youtu.be/ErV-2tlf9Ls")]
    #[case("https://www.youtube.com/playlist?list=PL123")]
    #[tokio::test]
    async fn test_title_from_oembed(#[case] url: &str) {
        let pages = PageMap::new().page(
            &oembed_url(url),
            r#"{"title":"Rust in 100 Seconds","author_name":"Fireship","type":"video"}"#,
        );

        let link = Site::YouTube.resolve(url, &pages).await.unwrap();
        assert_eq!(link.title(), "Rust in 100 Seconds");
        assert_eq!(link.url(), url);
        assert_eq!(pages.requested(), vec![oembed_url(url)]);
    }

    #[tokio::test]
    async fn test_bad_oembed_body() {
        let url = "https://youtu.be/abc";
        let pages = PageMap::new().page(&oembed_url(url), "Not Found");

        let err = Site::YouTube.resolve(url, &pages).await.unwrap_err();
        assert!(matches!(err, MdlinkError::InvalidResponse { .. }));
    }
}
