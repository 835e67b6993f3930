use std::io;
use thiserror::Error;

/// Error types for the collector.
///
/// Covers every failure path of a run:
/// - Settings loading and validation
/// - YouTube Data API lookups
/// - Spreadsheet export
///
/// Only the binary decides what a failure means for the process; see
/// [`AppError::exit_code`].

/// Represents all possible errors that can occur while collecting.
///
/// # Error Categories
///
/// - Configuration: missing or invalid settings, fatal before any request
/// - Lookup: channel resolution (fatal) and per-request API failures
/// - Export: writing the output file
/// - Custom: anything else
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    ConfigurationMissing(String),

    #[error("Invalid configuration: {0}")]
    ConfigurationInvalid(String),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Channel resolution failed: {0}")]
    ChannelResolution(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Video not found: {0}")]
    VideoNotFound(String),

    #[error("Invalid {field} for video {video_id}: {value:?}")]
    InvalidCount {
        video_id: String,
        field: &'static str,
        value: String,
    },

    #[error("Export error: {0}")]
    Export(String),

    #[error("Xlsx error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Custom(String),
}

impl AppError {
    /// Process exit code for a run that ended with this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::ConfigurationMissing(_)
            | AppError::ConfigurationInvalid(_)
            | AppError::Config(_) => 2,
            AppError::ChannelResolution(_) => 3,
            AppError::Export(_) | AppError::Xlsx(_) | AppError::Csv(_) => 4,
            _ => 1,
        }
    }

    /// Wraps any failure of the final write step as an export error.
    pub fn into_export(self) -> AppError {
        match self {
            AppError::Export(_) => self,
            other => AppError::Export(other.to_string()),
        }
    }
}

impl From<&str> for AppError {
    fn from(error: &str) -> Self {
        AppError::Custom(error.to_string())
    }
}

impl From<String> for AppError {
    fn from(error: String) -> Self {
        AppError::Custom(error)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
