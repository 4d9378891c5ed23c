//! Row filtering and normalization.
//!
//! Turns one parsed CSV record into a `(domain, clicks)` pair when, and only
//! when, the row qualifies for delivery. Everything else is a silent skip:
//! missing columns, non-numeric counts, and zero-click rows are expected in
//! real exports and are not errors.

use csv::StringRecord;
use std::collections::HashMap;

/// Maps column names to their positions in the header row.
pub fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().to_string(), idx))
        .collect()
}

/// Extracts a qualifying `(domain, clicks)` pair from one record.
///
/// Column lookup is first-match-wins with the lowercase name checked first:
/// `clicks` then `Clicks`, `domain` then `Domain`. A missing or non-numeric
/// clicks value is coerced to 0, which disqualifies the row; a missing domain
/// is coerced to the empty string, likewise.
///
/// Returns `None` unless `clicks > 0` and the domain is non-empty.
pub fn qualify_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Option<(String, i64)> {
    let clicks = get_column(record, header_map, "clicks")
        .or_else(|| get_column(record, header_map, "Clicks"))
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0);

    let domain = get_column(record, header_map, "domain")
        .or_else(|| get_column(record, header_map, "Domain"))
        .unwrap_or("");

    if clicks > 0 && !domain.is_empty() {
        Some((domain.to_string(), clicks))
    } else {
        None
    }
}

fn get_column<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}
