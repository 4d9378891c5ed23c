//! Qualifying click row model.

use chrono::NaiveDate;

/// A validated per-domain click count extracted from one CSV row.
///
/// Only constructed for qualifying rows: `clicks` is always positive and
/// `domain` is always non-empty. Non-qualifying rows never produce a record
/// and are dropped silently upstream.
///
/// Short-lived by design: produced and consumed within a single file's
/// processing pass, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickRecord {
    pub domain: String,
    pub clicks: i64,
    pub event_date: NaiveDate,
}
