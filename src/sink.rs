//! Delivery transport for the event-ingestion endpoint.
//!
//! The transport sits behind the [`EventSink`] trait so the pipeline can be
//! exercised in tests without a network. [`HttpEventSink`] is the production
//! implementation.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::config::Config;
use crate::domain::EventPayload;
use crate::error::AppError;

/// A destination that accepts one event payload per call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Performs exactly one delivery attempt. No retries at this layer.
    async fn deliver(&self, payload: EventPayload) -> Result<Value, AppError>;
}

/// POSTs payloads to the configured ingestion endpoint with bearer-token
/// authorization.
pub struct HttpEventSink {
    client: reqwest::Client,
    ingest_url: String,
    api_token: String,
}

impl HttpEventSink {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            ingest_url: config.ingest_url.clone(),
            api_token: config.api_token.clone(),
        })
    }
}

#[async_trait]
impl EventSink for HttpEventSink {
    async fn deliver(&self, payload: EventPayload) -> Result<Value, AppError> {
        let domain = payload.properties.domain.clone();

        let response = self
            .client
            .post(&self.ingest_url)
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Delivery {
                domain: domain.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            // A 2xx with a non-JSON body still counts as delivered; wrap the
            // raw text so the caller always gets a JSON value back.
            Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
        } else {
            Err(AppError::Delivery {
                domain,
                reason: format!("HTTP {status}: {}", endpoint_error_detail(&body)),
            })
        }
    }
}

/// Pulls the structured error message out of an endpoint error body,
/// falling back to the raw body text when there is none.
fn endpoint_error_detail(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };

    // Common shapes: {"error": {"message": ...}}, {"error": ...}, {"message": ...}
    let detail = json
        .pointer("/error/message")
        .or_else(|| json.get("error"))
        .or_else(|| json.get("message"));

    match detail {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => json.to_string(),
    }
}
