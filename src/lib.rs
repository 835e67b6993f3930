/// Collects a channel's uploads from the YouTube Data API and exports them
/// to a spreadsheet.
///
/// The library provides the pieces of one sequential run: settings
/// loading, uploads playlist resolution, paginated collection with date
/// and duration filters, and spreadsheet export.
///
/// # Architecture
///
/// The application is structured into several key components:
/// - `Settings`: INI settings with environment overrides
/// - `VideoPlatform`: the three API lookups, implemented by `YouTubeClient`
/// - `VideoCollector`: pagination and filtering
/// - `SheetWriter`: `.xlsx` / `.csv` export
/// - `pipeline::run`: ties them together
///
/// # Example
/// ```no_run
/// use chrono::{Local, Utc};
/// use std::path::Path;
/// use youtube_data_collector::{pipeline, Settings, YouTubeClient};
///
/// async fn example() {
///     let settings = Settings::load(Path::new("settings.ini"), Utc::now().date_naive()).unwrap();
///     let client = YouTubeClient::new(&settings.api_key).unwrap();
///     let summary = pipeline::run(&client, &settings, Local::now()).await.unwrap();
///     println!("{} videos", summary.records);
/// }
/// ```
pub mod collector;
pub mod config;
pub mod duration;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod progress;
pub mod resolver;
pub mod sheet;
pub mod youtube;

// Re-export commonly used items
pub use collector::{Collection, VideoCollector, VideoRecord};
pub use config::Settings;
pub use error::AppError;
pub use progress::CollectionStats;
pub use sheet::SheetWriter;
pub use youtube::{VideoPlatform, YouTubeClient};
