//! Scripted `VideoPlatform` used by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use youtube_data_collector::error::{AppError, Result};
use youtube_data_collector::youtube::{
    Channel, ChannelContentDetails, ChannelListResponse, PlaylistItem, PlaylistItemListResponse,
    PlaylistItemSnippet, RelatedPlaylists, ResourceId, Video, VideoContentDetails,
    VideoListResponse, VideoPlatform, VideoStatistics,
};

pub enum PageScript {
    Items(Vec<PlaylistItem>),
    Fail,
}

pub enum VideoScript {
    Found(Video),
    Missing,
    Fail,
}

/// Pages are addressed by index; page `n` hands out the token `page-<n+1>`
/// while more pages are scripted.
#[derive(Default)]
pub struct FakePlatform {
    uploads: Option<String>,
    channel_fails: bool,
    pages: Vec<PageScript>,
    videos: HashMap<String, VideoScript>,
    calls: Mutex<Vec<String>>,
    page_sizes: Mutex<Vec<u32>>,
}

impl FakePlatform {
    pub fn new(uploads: &str) -> Self {
        Self {
            uploads: Some(uploads.to_string()),
            ..Self::default()
        }
    }

    pub fn without_channel() -> Self {
        Self::default()
    }

    /// A channel whose content details carry an empty uploads id.
    pub fn blank_uploads() -> Self {
        Self::new("")
    }

    pub fn failing_channel() -> Self {
        Self {
            channel_fails: true,
            ..Self::default()
        }
    }

    pub fn page(mut self, items: Vec<PlaylistItem>) -> Self {
        self.pages.push(PageScript::Items(items));
        self
    }

    pub fn failing_page(mut self) -> Self {
        self.pages.push(PageScript::Fail);
        self
    }

    /// Scripts a video with a duration string and view/like/comment counts.
    pub fn video(mut self, id: &str, duration: &str, counts: (u64, u64, u64)) -> Self {
        let video = Video {
            id: id.to_string(),
            content_details: Some(VideoContentDetails {
                duration: Some(duration.to_string()),
            }),
            statistics: Some(VideoStatistics {
                view_count: Some(counts.0.to_string()),
                like_count: Some(counts.1.to_string()),
                comment_count: Some(counts.2.to_string()),
            }),
        };
        self.videos.insert(id.to_string(), VideoScript::Found(video));
        self
    }

    pub fn raw_video(mut self, video: Video) -> Self {
        self.videos.insert(video.id.clone(), VideoScript::Found(video));
        self
    }

    pub fn missing_video(mut self, id: &str) -> Self {
        self.videos.insert(id.to_string(), VideoScript::Missing);
        self
    }

    pub fn failing_video(mut self, id: &str) -> Self {
        self.videos.insert(id.to_string(), VideoScript::Fail);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn video_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.starts_with("video:")).count()
    }

    pub fn page_sizes(&self) -> Vec<u32> {
        self.page_sizes.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

pub fn item(video_id: &str, title: &str, published_at: &str) -> PlaylistItem {
    PlaylistItem {
        snippet: PlaylistItemSnippet {
            title: title.to_string(),
            published_at: published_at.to_string(),
            resource_id: Some(ResourceId {
                video_id: Some(video_id.to_string()),
            }),
        },
    }
}

#[async_trait]
impl VideoPlatform for FakePlatform {
    async fn channel_details(&self, channel_id: &str) -> Result<ChannelListResponse> {
        self.record(format!("channel:{channel_id}"));
        if self.channel_fails {
            return Err(AppError::Api {
                status: 403,
                message: "quotaExceeded".to_string(),
            });
        }
        let items = self
            .uploads
            .iter()
            .map(|uploads| Channel {
                id: channel_id.to_string(),
                content_details: Some(ChannelContentDetails {
                    related_playlists: RelatedPlaylists {
                        uploads: Some(uploads.clone()),
                    },
                }),
            })
            .collect();
        Ok(ChannelListResponse { items })
    }

    async fn playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<PlaylistItemListResponse> {
        self.record(format!("page:{playlist_id}:{}", page_token.unwrap_or("-")));
        self.page_sizes.lock().unwrap().push(max_results);

        let index = match page_token {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| AppError::Custom(format!("unknown token {token}")))?,
        };

        match self.pages.get(index) {
            Some(PageScript::Items(items)) => Ok(PlaylistItemListResponse {
                items: items.clone(),
                next_page_token: (index + 1 < self.pages.len()).then(|| format!("page-{}", index + 1)),
            }),
            Some(PageScript::Fail) => Err(AppError::Api {
                status: 500,
                message: "backendError".to_string(),
            }),
            None => Ok(PlaylistItemListResponse::default()),
        }
    }

    async fn video_details(&self, video_id: &str) -> Result<VideoListResponse> {
        self.record(format!("video:{video_id}"));
        match self.videos.get(video_id) {
            Some(VideoScript::Found(video)) => Ok(VideoListResponse {
                items: vec![video.clone()],
            }),
            Some(VideoScript::Missing) | None => Ok(VideoListResponse::default()),
            Some(VideoScript::Fail) => Err(AppError::Api {
                status: 503,
                message: "unavailable".to_string(),
            }),
        }
    }
}
