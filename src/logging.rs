use crate::error::Result;
use std::fs::File;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

pub const DEFAULT_LOG_FILE: &str = "youtube_data_collector.log";
const DEFAULT_FILTER: &str = "youtube_data_collector=info";

/// Keeps the log file writer alive.
///
/// Created once at startup; dropping it flushes buffered file output, so
/// hold it until the process is about to exit.
pub struct LoggingGuard {
    _file: WorkerGuard,
}

/// Installs the global subscriber: a plain-text file layer (the file is
/// truncated on every run) and, unless `quiet`, a console layer on stderr.
///
/// The filter comes from `RUST_LOG` and defaults to `info` for this crate.
pub fn init_logging(log_file: &Path, quiet: bool) -> Result<LoggingGuard> {
    if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(log_file)?;
    let (file_writer, guard) = tracing_appender::non_blocking(file);

    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(false)
        .with_filter(filter());

    let console_layer = (!quiet).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_filter(filter())
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| format!("Failed to install logger: {e}"))?;

    Ok(LoggingGuard { _file: guard })
}
