//! Utility functions used across the pipeline.
//!
//! - [`date_span`] - Report-date extraction from export filenames

pub mod date_span;

pub use date_span::extract_report_date;
