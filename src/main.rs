use chrono::{Local, Utc};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use youtube_data_collector::error::Result;
use youtube_data_collector::logging::{init_logging, DEFAULT_LOG_FILE};
use youtube_data_collector::pipeline::{self, RunSummary};
use youtube_data_collector::{Settings, YouTubeClient};

/// Collect a channel's uploads in a date range and export them to a spreadsheet.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Settings file with an [entity] section
    #[arg(short, long, default_value = "settings.ini")]
    config: PathBuf,

    /// Log file, truncated on every run
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Only log to the file
    #[arg(short, long)]
    quiet: bool,
}

/// Main entry point for the collector.
///
/// # Steps
/// 1. Parses CLI flags and initializes logging
/// 2. Loads settings, failing before any request when they are incomplete
/// 3. Runs resolution, collection and export
/// 4. Maps the outcome to the process exit code
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let guard = match init_logging(&cli.log_file, cli.quiet) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match run_application(&cli).await {
        Ok(summary) => {
            println!(
                "Saved {} videos to {}",
                summary.records,
                summary.output_path.display()
            );
            if let Some(page_error) = summary.stats.page_error() {
                println!("Warning: listing stopped early ({page_error}); see the log file");
            }
            info!("Application completed successfully");
            0
        }
        Err(e) => {
            error!("Application error: {}", e);
            eprintln!("Error: {}. See {} for details.", e, cli.log_file.display());
            e.exit_code()
        }
    };

    // flush the file writer before exiting
    drop(guard);
    std::process::exit(code);
}

/// Loads settings and runs the pipeline. Every request is awaited in turn
/// on the single-threaded runtime.
async fn run_application(cli: &Cli) -> Result<RunSummary> {
    info!("Starting application...");

    let settings = Settings::load(&cli.config, Utc::now().date_naive())?;
    info!(
        channel_id = %settings.channel_id,
        after = settings.date_range.after(),
        before = settings.date_range.before(),
        video_type = %settings.video_type,
        "Settings ready"
    );

    let client = YouTubeClient::new(&settings.api_key)?;
    info!("YouTube API client initialized");

    pipeline::run(&client, &settings, Local::now()).await
}
