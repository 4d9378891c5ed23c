//! Input directory enumeration and per-file sequencing.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::AppError;
use crate::processor::{process_file, FileOutcome};
use crate::sender::EventSender;
use crate::sink::EventSink;

/// Tallies for one full run, logged on completion.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub files_processed: usize,
    pub files_skipped: usize,
    pub events_delivered: usize,
    pub events_failed: usize,
}

/// Processes every CSV file in `dir`, sequentially, in listing order.
///
/// Entries are filtered to a case-insensitive `.csv` extension. Files are
/// processed strictly one at a time: each file's rows are fully delivered
/// before the next file is opened, which is what keeps deliveries serial
/// across the whole run. Listing order is whatever the platform's directory
/// enumeration yields; no sorting is applied.
///
/// A file that fails (unreadable, malformed CSV) is logged and skipped; the
/// remaining files are still processed. An empty directory is a clean no-op.
///
/// # Errors
///
/// Returns a typed error only for directory-level failures, distinguishing
/// [`AppError::DirectoryNotFound`] from [`AppError::DirectoryUnreadable`].
/// The caller decides whether that ends the process (it should not).
pub async fn process_directory<S: EventSink>(
    dir: &Path,
    sender: &EventSender<S>,
    row_delay: Duration,
) -> Result<RunSummary, AppError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::DirectoryNotFound(dir.to_path_buf()));
        }
        Err(source) => {
            return Err(AppError::DirectoryUnreadable {
                path: dir.to_path_buf(),
                source,
            });
        }
    };

    let mut csv_files: Vec<PathBuf> = Vec::new();
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                let path = entry.path();
                if is_csv(&path) {
                    csv_files.push(path);
                }
            }
            Ok(None) => break,
            Err(source) => {
                return Err(AppError::DirectoryUnreadable {
                    path: dir.to_path_buf(),
                    source,
                });
            }
        }
    }

    if csv_files.is_empty() {
        tracing::info!(dir = %dir.display(), "no CSV files to process");
        return Ok(RunSummary::default());
    }

    let mut summary = RunSummary::default();
    for path in &csv_files {
        match process_file(path, sender, row_delay).await {
            Ok(FileOutcome::Processed { delivered, failed }) => {
                summary.files_processed += 1;
                summary.events_delivered += delivered;
                summary.events_failed += failed;
            }
            Ok(FileOutcome::Skipped) => summary.files_skipped += 1,
            Err(err) => {
                // File-level containment: log and move on to the next file.
                tracing::error!(file = %path.display(), error = %err, "file skipped");
                summary.files_skipped += 1;
            }
        }
    }

    Ok(summary)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}
