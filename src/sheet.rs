use crate::collector::VideoRecord;
use crate::config::OutputFormat;
use crate::error::{AppError, Result};
use chrono::{DateTime, Local};
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};

/// Column headers, in output order.
pub const HEADERS: [&str; 6] = [
    "Title",
    "URL",
    "Published At",
    "View Count",
    "Like Count",
    "Comment Count",
];

pub const SHEET_NAME: &str = "videos";

/// Spreadsheet export for collected videos.
///
/// Writes one header row plus one row per record, as `.xlsx` by default
/// or `.csv` when configured.
///
/// # Examples
///
/// ```no_run
/// use chrono::Local;
/// use std::path::Path;
/// use youtube_data_collector::config::OutputFormat;
/// use youtube_data_collector::SheetWriter;
///
/// async fn example() {
///     let writer = SheetWriter::new(OutputFormat::Xlsx);
///     let path = writer.export(&[], Path::new("output"), Local::now()).await;
/// }
/// ```
pub struct SheetWriter {
    format: OutputFormat,
}

impl SheetWriter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// `<dir>/youtube_videos_<YYYYMMDD_HHMM>.<ext>` for the given local time.
    pub fn output_path(&self, dir: &Path, now: DateTime<Local>) -> PathBuf {
        dir.join(format!(
            "youtube_videos_{}.{}",
            now.format("%Y%m%d_%H%M"),
            self.format.extension()
        ))
    }

    /// Writes `records` into a timestamped file under `dir`, creating the
    /// directory if needed, and returns the file path.
    ///
    /// # Errors
    /// Every failure is reported as `AppError::Export`.
    #[instrument(skip(self, records, now), fields(records = records.len()))]
    pub async fn export(
        &self,
        records: &[VideoRecord],
        dir: &Path,
        now: DateTime<Local>,
    ) -> Result<PathBuf> {
        let path = self.output_path(dir, now);

        let result = match tokio::fs::create_dir_all(dir).await {
            Ok(()) => self.write(records, &path),
            Err(e) => Err(AppError::Io(e)),
        };

        match result {
            Ok(()) => {
                info!("Saved {} rows to {}", records.len(), path.display());
                Ok(path)
            }
            Err(e) => {
                error!("Failed to save {}: {}", path.display(), e);
                Err(e.into_export())
            }
        }
    }

    fn write(&self, records: &[VideoRecord], path: &Path) -> Result<()> {
        match self.format {
            OutputFormat::Xlsx => write_xlsx(records, path),
            OutputFormat::Csv => write_csv(records, path),
        }
    }
}

fn write_xlsx(records: &[VideoRecord], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, header) in HEADERS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
        }
        worksheet.set_column_width(0, 50)?;
        worksheet.set_column_width(1, 45)?;
        worksheet.set_column_width(2, 22)?;

        for (index, record) in records.iter().enumerate() {
            let row = index as u32 + 1;
            worksheet.write_string(row, 0, record.title.as_str())?;
            worksheet.write_string(row, 1, record.url.as_str())?;
            worksheet.write_string(row, 2, record.published_at.as_str())?;
            worksheet.write_number(row, 3, record.view_count as f64)?;
            worksheet.write_number(row, 4, record.like_count as f64)?;
            worksheet.write_number(row, 5, record.comment_count as f64)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn write_csv(records: &[VideoRecord], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    if records.is_empty() {
        writer.write_record(HEADERS)?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
