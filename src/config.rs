//! Settings management for the collector.
//!
//! Settings live in the `[entity]` section of an INI file. Values can be
//! overridden through `YTDC_ENTITY__<KEY>` environment variables, e.g.
//! `YTDC_ENTITY__GCP_APIKEY`.

use crate::error::{AppError, Result};
use chrono::NaiveDate;
use config::Source;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

pub const SETTINGS_SECTION: &str = "entity";
pub const ENV_PREFIX: &str = "YTDC";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Duration category requested through `VIDEO_TYPE`.
///
/// Only the exact labels `short` and `long-form` select a category. Any
/// other label is kept verbatim and matches no video at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoType {
    Short,
    LongForm,
    Other(String),
}

impl VideoType {
    pub fn from_label(label: &str) -> Self {
        match label {
            "short" => VideoType::Short,
            "long-form" => VideoType::LongForm,
            other => VideoType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for VideoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoType::Short => f.write_str("short"),
            VideoType::LongForm => f.write_str("long-form"),
            VideoType::Other(label) => write!(f, "{label:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Csv => "csv",
        }
    }

    fn from_label(label: &str) -> Result<Self> {
        match label.to_ascii_lowercase().as_str() {
            "" | "xlsx" => Ok(OutputFormat::Xlsx),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(AppError::ConfigurationInvalid(format!(
                "OUTPUT_FORMAT must be xlsx or csv, got {other:?}"
            ))),
        }
    }
}

/// Inclusive publish-date window.
///
/// Both bounds are zero-padded `YYYY-MM-DD` strings, so plain string
/// ordering is chronological ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    after: String,
    before: String,
}

impl DateRange {
    pub fn new(after: NaiveDate, before: NaiveDate) -> Self {
        Self {
            after: after.format(DATE_FORMAT).to_string(),
            before: before.format(DATE_FORMAT).to_string(),
        }
    }

    pub fn after(&self) -> &str {
        &self.after
    }

    pub fn before(&self) -> &str {
        &self.before
    }

    /// `date` must be in `YYYY-MM-DD` form.
    pub fn contains(&self, date: &str) -> bool {
        self.after.as_str() <= date && date <= self.before.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.after > self.before
    }
}

/// Validated settings for one collection run.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use std::collections::HashMap;
/// use youtube_data_collector::config::{Settings, VideoType};
///
/// let entries = HashMap::from([
///     ("gcp_apikey".to_string(), "key".to_string()),
///     ("channel_id".to_string(), "UC123".to_string()),
///     ("video_type".to_string(), "short".to_string()),
/// ]);
/// let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// let settings = Settings::from_entries(&entries, today).unwrap();
/// assert_eq!(settings.video_type, VideoType::Short);
/// assert_eq!(settings.date_range.after(), "2024-05-01");
/// ```
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub channel_id: String,
    pub date_range: DateRange,
    pub video_type: VideoType,
    pub output_dir: PathBuf,
    pub output_format: OutputFormat,
}

impl Settings {
    /// Loads settings from an INI file plus environment overrides.
    ///
    /// `today` is the current UTC date, used for blank date bounds.
    ///
    /// # Errors
    /// * `ConfigurationMissing` if the file, the `[entity]` section or a
    ///   required key is missing
    /// * `ConfigurationInvalid` if a date or the output format is malformed
    /// * `Config` if the file cannot be parsed
    #[instrument(skip(today))]
    pub fn load(path: &Path, today: NaiveDate) -> Result<Self> {
        if !path.is_file() {
            return Err(AppError::ConfigurationMissing(format!(
                "settings file not found: {}",
                path.display()
            )));
        }

        let file = config::Config::builder()
            .add_source(config::File::new(
                &path.to_string_lossy(),
                config::FileFormat::Ini,
            ))
            .build()?;
        let env = config::Config::builder()
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        // environment values are applied after the file so they always win
        let file_entries = section_entries(file.collect()?, SETTINGS_SECTION)?;
        let overrides = section_entries(env.collect()?, SETTINGS_SECTION)?;
        if file_entries.is_none() && overrides.is_none() {
            return Err(AppError::ConfigurationMissing(format!(
                "[{SETTINGS_SECTION}] section"
            )));
        }
        let mut entries = file_entries.unwrap_or_default();
        entries.extend(overrides.unwrap_or_default());

        let settings = Self::from_entries(&entries, today)?;
        info!("Settings loaded from {}", path.display());
        Ok(settings)
    }

    /// Builds settings from the key/value pairs of the `[entity]` section.
    ///
    /// Keys are matched case-insensitively.
    pub fn from_entries(entries: &HashMap<String, String>, today: NaiveDate) -> Result<Self> {
        let api_key = lookup(entries, "GCP_APIKEY")
            .ok_or_else(|| AppError::ConfigurationMissing("GCP_APIKEY".into()))?
            .to_string();
        let channel_id = lookup(entries, "CHANNEL_ID")
            .ok_or_else(|| AppError::ConfigurationMissing("CHANNEL_ID".into()))?
            .to_string();

        let after = parse_date("PUBLISHED_AFTER", lookup(entries, "PUBLISHED_AFTER"), today)?;
        let before = parse_date("PUBLISHED_BEFORE", lookup(entries, "PUBLISHED_BEFORE"), today)?;
        let date_range = DateRange::new(after, before);
        if date_range.is_empty() {
            warn!(
                "PUBLISHED_AFTER {} is later than PUBLISHED_BEFORE {}; no video can match",
                date_range.after(),
                date_range.before()
            );
        }

        let video_type = VideoType::from_label(lookup(entries, "VIDEO_TYPE").unwrap_or_default());
        if let VideoType::Other(label) = &video_type {
            warn!("VIDEO_TYPE {:?} is neither short nor long-form; every video will be rejected", label);
        }

        let output_dir = lookup(entries, "OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
        let output_format = OutputFormat::from_label(lookup(entries, "OUTPUT_FORMAT").unwrap_or_default())?;

        Ok(Self {
            api_key,
            channel_id,
            date_range,
            video_type,
            output_dir,
            output_format,
        })
    }
}

/// Returns the trimmed value for `key`, treating blank values as absent.
fn lookup<'a>(entries: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

fn parse_date(key: &str, value: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match value {
        None => Ok(today),
        // chrono accepts single-digit months and days; the range needs fixed width
        Some(raw) if raw.len() != 10 => Err(AppError::ConfigurationInvalid(format!(
            "{key} must be YYYY-MM-DD, got {raw:?}"
        ))),
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
            AppError::ConfigurationInvalid(format!("{key} must be YYYY-MM-DD, got {raw:?}: {e}"))
        }),
    }
}

/// Flattens every top-level table whose name matches `section`
/// (case-insensitively) into one string map, or `None` if there is none.
fn section_entries(
    root: HashMap<String, config::Value>,
    section: &str,
) -> Result<Option<HashMap<String, String>>> {
    let mut entries: Option<HashMap<String, String>> = None;

    for (name, value) in root {
        if !name.eq_ignore_ascii_case(section) {
            continue;
        }
        let target = entries.get_or_insert_with(HashMap::new);
        for (key, value) in value.into_table()? {
            target.insert(key.to_ascii_lowercase(), value.into_string()?);
        }
    }

    Ok(entries)
}
