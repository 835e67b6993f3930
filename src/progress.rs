use tracing::{info, warn};

/// Tracks what happened while walking a playlist.
///
/// Keeps counts for every stage of the filter plus the videos that were
/// skipped because their details could not be used, and the page error
/// that cut pagination short, if any.
///
/// # Examples
///
/// ```
/// use youtube_data_collector::CollectionStats;
///
/// let mut stats = CollectionStats::default();
/// stats.record_page(50);
/// stats.record_skip("abc123", "video not found".to_string());
/// assert_eq!(stats.items_scanned, 50);
/// assert_eq!(stats.skipped().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CollectionStats {
    pub pages_fetched: usize,
    pub items_scanned: usize,
    pub in_range: usize,
    pub matched: usize,
    pub duplicates: usize,
    skipped: Vec<(String, String)>, // (video id, reason)
    page_error: Option<String>,
}

impl CollectionStats {
    pub fn record_page(&mut self, item_count: usize) {
        self.pages_fetched += 1;
        self.items_scanned += item_count;
    }

    pub fn record_skip(&mut self, video_id: &str, reason: String) {
        self.skipped.push((video_id.to_string(), reason));
    }

    pub fn record_page_error(&mut self, error: String) {
        self.page_error = Some(error);
    }

    pub fn skipped(&self) -> &[(String, String)] {
        &self.skipped
    }

    /// The listing error that stopped pagination early.
    pub fn page_error(&self) -> Option<&str> {
        self.page_error.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.page_error.is_none()
    }

    pub fn log_summary(&self) {
        info!(
            pages = self.pages_fetched,
            scanned = self.items_scanned,
            in_range = self.in_range,
            matched = self.matched,
            duplicates = self.duplicates,
            skipped = self.skipped.len(),
            "Collection finished"
        );
        for (video_id, reason) in &self.skipped {
            warn!("Skipped video {}: {}", video_id, reason);
        }
        if let Some(error) = &self.page_error {
            warn!("Pagination stopped early: {}", error);
        }
    }
}
