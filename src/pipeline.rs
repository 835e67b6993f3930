use crate::collector::VideoCollector;
use crate::config::Settings;
use crate::error::Result;
use crate::progress::CollectionStats;
use crate::resolver::resolve_uploads_playlist;
use crate::sheet::SheetWriter;
use crate::youtube::VideoPlatform;
use chrono::{DateTime, Local};
use std::path::PathBuf;
use tracing::{info, instrument};

/// Outcome of a run that reached the export step.
#[derive(Debug)]
pub struct RunSummary {
    pub playlist_id: String,
    pub records: usize,
    pub output_path: PathBuf,
    pub stats: CollectionStats,
}

/// Runs one collection: resolve the uploads playlist, collect matching
/// videos, export them.
///
/// # Arguments
/// * `api` - Video platform used for every lookup
/// * `settings` - Validated settings
/// * `export_time` - Local time used to name the output file
///
/// # Errors
/// * `ChannelResolution` if the uploads playlist cannot be found
/// * `Export` if the output file cannot be written
///
/// A failed playlist page is not an error here: whatever was collected
/// before it is still exported and the failure is kept in the stats.
#[instrument(skip_all, fields(channel_id = %settings.channel_id))]
pub async fn run<P>(api: &P, settings: &Settings, export_time: DateTime<Local>) -> Result<RunSummary>
where
    P: VideoPlatform + ?Sized,
{
    let playlist_id = resolve_uploads_playlist(api, &settings.channel_id).await?;

    let collection = VideoCollector::new(api)
        .collect(&playlist_id, &settings.date_range, &settings.video_type)
        .await;

    let writer = SheetWriter::new(settings.output_format);
    let output_path = writer
        .export(&collection.records, &settings.output_dir, export_time)
        .await?;

    info!(
        "Exported {} videos to {}",
        collection.records.len(),
        output_path.display()
    );

    Ok(RunSummary {
        playlist_id,
        records: collection.records.len(),
        output_path,
        stats: collection.stats,
    })
}
