//! Domain layer containing the pipeline's data entities and row logic.
//!
//! Everything here is short-lived and immutable after construction: records
//! are produced while one file is being processed and consumed by the sender,
//! with no state carried between runs.
//!
//! - [`click_record`] - Validated per-domain click count
//! - [`event_payload`] - Wire payload sent to the ingestion endpoint
//! - [`row`] - CSV row filtering and normalization

pub mod click_record;
pub mod event_payload;
pub mod row;

pub use click_record::ClickRecord;
pub use event_payload::{EventPayload, EventProperties};
