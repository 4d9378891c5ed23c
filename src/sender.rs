//! Event construction and throttled delivery.

use serde_json::Value;
use std::sync::Arc;

use crate::domain::{ClickRecord, EventPayload};
use crate::error::AppError;
use crate::sink::EventSink;
use crate::throttle::Throttle;

/// Builds the wire payload for a click record and submits exactly one
/// delivery attempt through the shared [`Throttle`].
///
/// On success the endpoint's response body is returned and a progress line
/// is logged. On failure the error is logged with the affected domain and
/// propagated unchanged; containment is the caller's decision.
pub struct EventSender<S: EventSink> {
    sink: S,
    throttle: Arc<Throttle>,
    event_name: String,
}

impl<S: EventSink> EventSender<S> {
    pub fn new(sink: S, throttle: Arc<Throttle>, event_name: String) -> Self {
        Self {
            sink,
            throttle,
            event_name,
        }
    }

    pub async fn send(&self, record: &ClickRecord) -> Result<Value, AppError> {
        let payload = EventPayload::new(&self.event_name, record);

        match self.throttle.run(self.sink.deliver(payload)).await {
            Ok(body) => {
                tracing::info!(
                    domain = %record.domain,
                    clicks = record.clicks,
                    date = %record.event_date,
                    "event delivered"
                );
                Ok(body)
            }
            Err(err) => {
                tracing::error!(domain = %record.domain, error = %err, "event delivery failed");
                Err(err)
            }
        }
    }
}
