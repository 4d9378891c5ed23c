//! Typed error taxonomy for the delivery pipeline.
//!
//! Errors are contained at the narrowest reasonable scope (row < file < run):
//! a delivery failure never aborts its file, a file failure never aborts the
//! run, and directory failures are returned to the top-level handler in
//! `main`, which decides between log-and-continue and log-and-exit.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("input directory '{0}' does not exist")]
    DirectoryNotFound(PathBuf),

    #[error("input directory '{path}' could not be read: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{path}' as CSV: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("event delivery failed for domain '{domain}': {reason}")]
    Delivery { domain: String, reason: String },
}

impl AppError {
    /// True for directory-level failures that end the run gracefully
    /// (logged, exit code 0) rather than crashing it.
    pub fn is_directory_error(&self) -> bool {
        matches!(
            self,
            AppError::DirectoryNotFound(_) | AppError::DirectoryUnreadable { .. }
        )
    }
}
