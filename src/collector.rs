use crate::config::{DateRange, VideoType};
use crate::duration::parse_iso8601_duration;
use crate::error::{AppError, Result};
use crate::progress::CollectionStats;
use crate::youtube::{PlaylistItem, Video, VideoPlatform};
use chrono::DateTime;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, error, info, instrument, warn};

/// Playlist items requested per page; the API maximum.
pub const PAGE_SIZE: u32 = 50;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// One exported row. Field order is the column order of the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoRecord {
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "Published At")]
    pub published_at: String,
    #[serde(rename = "View Count")]
    pub view_count: u64,
    #[serde(rename = "Like Count")]
    pub like_count: u64,
    #[serde(rename = "Comment Count")]
    pub comment_count: u64,
}

impl VideoRecord {
    pub fn watch_url(video_id: &str) -> String {
        format!("{WATCH_URL}{video_id}")
    }
}

/// Records gathered from one playlist walk, in playlist order.
#[derive(Debug, Default)]
pub struct Collection {
    pub records: Vec<VideoRecord>,
    pub stats: CollectionStats,
}

/// Walks an uploads playlist and keeps the videos that fall in the date
/// range and the requested duration category.
///
/// Every request is awaited before the next one is sent.
pub struct VideoCollector<'a, P: VideoPlatform + ?Sized> {
    api: &'a P,
}

impl<'a, P: VideoPlatform + ?Sized> VideoCollector<'a, P> {
    pub fn new(api: &'a P) -> Self {
        Self { api }
    }

    /// Collects matching videos from `playlist_id`.
    ///
    /// # Details
    /// * A failed page request stops pagination; records gathered so far
    ///   are kept and the error is recorded in the stats.
    /// * A failed video lookup skips that video only.
    /// * Videos repeated across pages are kept each time they appear.
    #[instrument(skip(self, range, video_type), fields(after = range.after(), before = range.before(), video_type = %video_type))]
    pub async fn collect(
        &self,
        playlist_id: &str,
        range: &DateRange,
        video_type: &VideoType,
    ) -> Collection {
        let mut collection = Collection::default();
        let mut seen = HashSet::new();
        let mut page_token: Option<String> = None;

        info!("Starting video collection");

        loop {
            let page = match self
                .api
                .playlist_items(playlist_id, page_token.as_deref(), PAGE_SIZE)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    error!("Failed to fetch playlist page: {}", e);
                    collection.stats.record_page_error(e.to_string());
                    break;
                }
            };
            collection.stats.record_page(page.items.len());
            info!(
                page = collection.stats.pages_fetched,
                items = page.items.len(),
                "Fetched playlist page"
            );

            for item in &page.items {
                let Some(video_id) = item.video_id() else {
                    warn!("Playlist item without a video id: {:?}", item.snippet.title);
                    continue;
                };

                let published_date = match published_date(&item.snippet.published_at) {
                    Some(date) => date,
                    None => {
                        warn!(
                            "Unparsable publish time {:?} for video {}",
                            item.snippet.published_at, video_id
                        );
                        collection
                            .stats
                            .record_skip(video_id, "unparsable publish time".to_string());
                        continue;
                    }
                };
                if !range.contains(&published_date) {
                    continue;
                }
                collection.stats.in_range += 1;

                if let VideoType::Other(_) = video_type {
                    continue;
                }

                match self.fetch_record(video_id, item, video_type).await {
                    Ok(Some(record)) => {
                        if !seen.insert(video_id.to_string()) {
                            warn!("Video {} appeared more than once in the playlist", video_id);
                            collection.stats.duplicates += 1;
                        }
                        collection.stats.matched += 1;
                        collection.records.push(record);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        error!("Failed to fetch details for video {}: {}", video_id, e);
                        collection.stats.record_skip(video_id, e.to_string());
                    }
                }
            }

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        collection.stats.log_summary();
        collection
    }

    /// Looks up one video and builds its record if the duration matches.
    ///
    /// Returns `Ok(None)` for videos filtered out by duration.
    async fn fetch_record(
        &self,
        video_id: &str,
        item: &PlaylistItem,
        video_type: &VideoType,
    ) -> Result<Option<VideoRecord>> {
        let response = self.api.video_details(video_id).await?;
        let video = response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| AppError::VideoNotFound(video_id.to_string()))?;

        let Some(seconds) = duration_secs(&video) else {
            debug!("Video {} has no usable duration", video_id);
            return Ok(None);
        };
        if !video_type.matches(seconds) {
            debug!("Video {} ({}s) is not {}", video_id, seconds, video_type);
            return Ok(None);
        }

        let stats = video.statistics.unwrap_or_default();
        Ok(Some(VideoRecord {
            title: item.snippet.title.clone(),
            url: VideoRecord::watch_url(video_id),
            published_at: item.snippet.published_at.clone(),
            view_count: parse_count(video_id, "view count", stats.view_count.as_deref())?,
            like_count: parse_count(video_id, "like count", stats.like_count.as_deref())?,
            comment_count: parse_count(video_id, "comment count", stats.comment_count.as_deref())?,
        }))
    }
}

/// Calendar date of an RFC 3339 timestamp, in the timestamp's own offset.
fn published_date(published_at: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(published_at.trim())
        .ok()
        .map(|dt| dt.date_naive().format("%Y-%m-%d").to_string())
}

fn duration_secs(video: &Video) -> Option<f64> {
    video
        .content_details
        .as_ref()?
        .duration
        .as_deref()
        .and_then(parse_iso8601_duration)
}

fn parse_count(video_id: &str, field: &'static str, value: Option<&str>) -> Result<u64> {
    let raw = value.unwrap_or("0");
    raw.trim().parse().map_err(|_| AppError::InvalidCount {
        video_id: video_id.to_string(),
        field,
        value: raw.to_string(),
    })
}
