//! Wire payload for the event-ingestion endpoint.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::click_record::ClickRecord;

/// The JSON body POSTed to the ingestion endpoint for one click record.
///
/// Constructed fresh per [`ClickRecord`]; never persisted. Field names follow
/// the endpoint's camelCase convention (`eventName`, `occurredAt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub event_name: String,
    pub occurred_at: DateTime<Utc>,
    pub properties: EventProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventProperties {
    pub clicks: i64,
    pub domain: String,
}

impl EventPayload {
    /// Builds the payload for one record, noon-normalizing its event date.
    pub fn new(event_name: &str, record: &ClickRecord) -> Self {
        Self {
            event_name: event_name.to_string(),
            occurred_at: noon_timestamp(record.event_date),
            properties: EventProperties {
                clicks: record.clicks,
                domain: record.domain.clone(),
            },
        }
    }
}

/// Fixes a calendar date to 12:00:00.000 local time, expressed in UTC.
///
/// Discarding time-of-day and pinning to local noon keeps day-level
/// aggregation stable across timezone boundaries: whichever zone the
/// downstream system aggregates in, noon stays on the source calendar day.
pub fn noon_timestamp(date: NaiveDate) -> DateTime<Utc> {
    let noon = date
        .and_hms_opt(12, 0, 0)
        .expect("12:00:00 is a valid wall-clock time");

    // DST transitions never land on noon in practice, but the conversion
    // must stay total: prefer the earlier of an ambiguous pair, and fall
    // back to reading the naive noon as UTC if the local mapping has a gap.
    Local
        .from_local_datetime(&noon)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&noon))
}
