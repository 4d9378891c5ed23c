//! Report-date extraction from export filenames.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

static DATE_SPAN: OnceLock<Regex> = OnceLock::new();

fn date_span_pattern() -> &'static Regex {
    DATE_SPAN.get_or_init(|| {
        Regex::new(r"\.(\d{4}-\d{2}-\d{2})_(\d{4}-\d{2}-\d{2})")
            .expect("date span pattern is a valid regex")
    })
}

/// Extracts the report date from an export filename.
///
/// Export files carry a date span in their name: a literal `.` followed by
/// `YYYY-MM-DD`, an underscore, and a second `YYYY-MM-DD`. The span may
/// appear anywhere in the name. Only the first date is used; the second
/// (span end) is ignored.
///
/// Returns `None` when the filename carries no span, or when the matched
/// span is not a real calendar date (e.g. `2024-13-99`).
///
/// # Examples
///
/// ```ignore
/// let date = extract_report_date("report.2024-03-01_2024-03-07.csv");
/// assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 1));
/// ```
pub fn extract_report_date(filename: &str) -> Option<NaiveDate> {
    let caps = date_span_pattern().captures(filename)?;
    NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()
}
