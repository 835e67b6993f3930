//! YouTube Data API v3 access.
//!
//! The collector only needs three read calls, exposed through the
//! [`VideoPlatform`] trait so the pipeline can run against a scripted fake.
//! [`YouTubeClient`] is the real implementation.

use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3/";

// the key travels as a header, never in the request URL
const API_KEY_HEADER: &str = "x-goog-api-key";

/// The three lookups the collection pipeline depends on.
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// `channels.list` with `part=contentDetails` for one channel id.
    async fn channel_details(&self, channel_id: &str) -> Result<ChannelListResponse>;

    /// One page of `playlistItems.list` with `part=snippet`.
    async fn playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<PlaylistItemListResponse>;

    /// `videos.list` with `part=contentDetails,statistics` for one video id.
    async fn video_details(&self, video_id: &str) -> Result<VideoListResponse>;
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelListResponse {
    #[serde(default)]
    pub items: Vec<Channel>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(default)]
    pub id: String,
    pub content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    #[serde(default)]
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedPlaylists {
    pub uploads: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemListResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    #[serde(default)]
    pub snippet: PlaylistItemSnippet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub published_at: String,
    pub resource_id: Option<ResourceId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceId {
    pub video_id: Option<String>,
}

impl PlaylistItem {
    pub fn video_id(&self) -> Option<&str> {
        self.snippet
            .resource_id
            .as_ref()
            .and_then(|r| r.video_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<Video>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(default)]
    pub id: String,
    pub content_details: Option<VideoContentDetails>,
    pub statistics: Option<VideoStatistics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContentDetails {
    pub duration: Option<String>,
}

/// Counts arrive as decimal strings; hidden counts are omitted entirely.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    pub view_count: Option<String>,
    pub like_count: Option<String>,
    pub comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// Client for the YouTube Data API authenticated with an API key.
///
/// # Examples
///
/// ```no_run
/// use youtube_data_collector::youtube::{VideoPlatform, YouTubeClient};
///
/// async fn example() {
///     let client = YouTubeClient::new("api-key").unwrap();
///     let channel = client.channel_details("UC_x5XG1OV2P6uZZ5FSM9Ttw").await;
/// }
/// ```
pub struct YouTubeClient {
    client: reqwest::Client,
    api_key: String,
    base_url: Url,
}

impl YouTubeClient {
    pub fn new(api_key: &str) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_API_BASE)
    }

    /// Points the client at another API root, e.g. a local mock server.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url,
        })
    }

    fn request(&self, resource: &str, query: &[(&str, &str)]) -> Result<reqwest::RequestBuilder> {
        let url = self.base_url.join(resource)?;
        Ok(self
            .client
            .get(url)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .query(query))
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status, &body));
        }

        Ok(response.json::<T>().await?)
    }
}

/// Maps a non-2xx response to `AppError::Api`, preferring the message from
/// Google's `{"error": {"message": ...}}` body over the status reason.
fn api_error(status: reqwest::StatusCode, body: &str) -> AppError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    AppError::Api {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    #[instrument(skip(self))]
    async fn channel_details(&self, channel_id: &str) -> Result<ChannelListResponse> {
        let request = self.request("channels", &[("part", "contentDetails"), ("id", channel_id)])?;
        self.fetch(request).await
    }

    #[instrument(skip(self))]
    async fn playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<PlaylistItemListResponse> {
        let max_results = max_results.to_string();
        let mut request = self.request(
            "playlistItems",
            &[
                ("part", "snippet"),
                ("playlistId", playlist_id),
                ("maxResults", max_results.as_str()),
            ],
        )?;
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }
        debug!("Requesting playlist page");
        self.fetch(request).await
    }

    #[instrument(skip(self))]
    async fn video_details(&self, video_id: &str) -> Result<VideoListResponse> {
        let request = self.request(
            "videos",
            &[("part", "contentDetails,statistics"), ("id", video_id)],
        )?;
        self.fetch(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_playlist_request_url() {
        let client = YouTubeClient::with_base_url("secret", "http://localhost:8080/youtube/v3").unwrap();
        let request = client
            .request(
                "playlistItems",
                &[("part", "snippet"), ("playlistId", "UUabc"), ("maxResults", "50")],
            )
            .unwrap()
            .build()
            .unwrap();

        let url = request.url();
        assert_eq!(url.path(), "/youtube/v3/playlistItems");
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("playlistId".into(), "UUabc".into())));
        assert!(pairs.contains(&("maxResults".into(), "50".into())));
        assert!(!pairs.iter().any(|(k, _)| k == "key"));
        assert_eq!(request.headers()[API_KEY_HEADER], "secret");
    }

    #[test]
    fn api_error_uses_google_error_message() {
        let body = r#"{"error": {"code": 403, "message": "The request cannot be completed because you have exceeded your quota.", "errors": []}}"#;
        let err = api_error(reqwest::StatusCode::FORBIDDEN, body);
        match err {
            AppError::Api { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("exceeded your quota"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn api_error_falls_back_to_status_reason() {
        let empty_message = r#"{"error": {"code": 404, "message": ""}}"#;
        let err = api_error(reqwest::StatusCode::NOT_FOUND, empty_message);
        assert!(matches!(err, AppError::Api { status: 404, ref message } if message == "Not Found"));

        let html = "<html><body>Bad Gateway</body></html>";
        let err = api_error(reqwest::StatusCode::BAD_GATEWAY, html);
        assert!(matches!(err, AppError::Api { status: 502, ref message } if message == "Bad Gateway"));

        let err = api_error(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "");
        assert!(matches!(err, AppError::Api { status: 500, ref message } if message == "Internal Server Error"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn deserializes_playlist_page() {
        let body = r#"{
            "kind": "youtube#playlistItemListResponse",
            "nextPageToken": "CDIQAA",
            "items": [{
                "snippet": {
                    "publishedAt": "2024-01-15T10:00:00Z",
                    "title": "Hello",
                    "resourceId": {"kind": "youtube#video", "videoId": "abc123"}
                }
            }]
        }"#;
        let page: PlaylistItemListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some("CDIQAA"));
        assert_eq!(page.items[0].video_id(), Some("abc123"));
        assert_eq!(page.items[0].snippet.published_at, "2024-01-15T10:00:00Z");
    }

    #[test]
    fn deserializes_video_with_hidden_likes() {
        let body = r#"{"items": [{
            "id": "abc123",
            "contentDetails": {"duration": "PT1M30S"},
            "statistics": {"viewCount": "12", "commentCount": "3"}
        }]}"#;
        let videos: VideoListResponse = serde_json::from_str(body).unwrap();
        let stats = videos.items[0].statistics.as_ref().unwrap();
        assert_eq!(stats.view_count.as_deref(), Some("12"));
        assert!(stats.like_count.is_none());
    }

    #[test]
    fn deserializes_channel_uploads() {
        let body = r#"{"items": [{"id": "UCx", "contentDetails": {"relatedPlaylists": {"uploads": "UUx"}}}]}"#;
        let channels: ChannelListResponse = serde_json::from_str(body).unwrap();
        let uploads = channels.items[0]
            .content_details
            .as_ref()
            .and_then(|d| d.related_playlists.uploads.as_deref());
        assert_eq!(uploads, Some("UUx"));
    }
}
