//! Per-file processing: parse, filter, deliver.

use std::path::Path;
use std::time::Duration;

use crate::domain::row::{build_header_map, qualify_row};
use crate::domain::ClickRecord;
use crate::error::AppError;
use crate::sender::EventSender;
use crate::sink::EventSink;
use crate::utils::extract_report_date;

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Filename carried no report date; no rows were read.
    Skipped,
    Processed { delivered: usize, failed: usize },
}

/// Processes one CSV file: extracts the report date from its name, parses
/// the rows, and delivers every qualifying row in file order.
///
/// Rows are delivered strictly one after another; each delivery is awaited
/// and then followed by `row_delay` before the next row is considered. The
/// delay stacks on top of the throttle's own spacing, so the effective floor
/// between deliveries is the sum of the two.
///
/// A delivery failure is logged and contained; the remaining rows are still
/// attempted. A CSV parse failure aborts this file and surfaces as an error
/// for the walker to contain at the file level.
pub async fn process_file<S: EventSink>(
    path: &Path,
    sender: &EventSender<S>,
    row_delay: Duration,
) -> Result<FileOutcome, AppError> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let Some(event_date) = extract_report_date(&filename) else {
        tracing::warn!(file = %filename, "no report date span in filename, skipping file");
        return Ok(FileOutcome::Skipped);
    };

    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| AppError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

    // Strict field counts: a ragged record marks the file malformed and
    // aborts it, per the file-level containment rule.
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());

    let headers = reader
        .headers()
        .map_err(|source| AppError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    let header_map = build_header_map(&headers);

    let mut delivered = 0usize;
    let mut failed = 0usize;

    for result in reader.records() {
        let record = result.map_err(|source| AppError::CsvParse {
            path: path.to_path_buf(),
            source,
        })?;

        let Some((domain, clicks)) = qualify_row(&record, &header_map) else {
            continue;
        };

        let click_record = ClickRecord {
            domain,
            clicks,
            event_date,
        };

        // One attempt per row; failure is contained here so the rest of the
        // file (and run) still gets delivered.
        match sender.send(&click_record).await {
            Ok(_) => delivered += 1,
            Err(_) => failed += 1,
        }

        // Second pacing layer on top of the throttle's spacing.
        tokio::time::sleep(row_delay).await;
    }

    tracing::info!(file = %filename, delivered, failed, "file processed");

    Ok(FileOutcome::Processed { delivered, failed })
}
