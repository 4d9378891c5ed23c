//! # Click Relay
//!
//! Forwards per-domain click counts from dated CSV export files to an
//! external analytics API, under a strict outbound rate limit.
//!
//! ## Pipeline
//!
//! - **Directory Walker** ([`walker`]) - Enumerates the input directory and
//!   sequences files one at a time
//! - **File Processor** ([`processor`]) - Parses one file and drives delivery
//!   per qualifying row, containing per-row failures
//! - **Row Filter** ([`domain::row`]) - Coerces rows into `(domain, clicks)`
//!   pairs, silently dropping non-qualifying ones
//! - **Event Sender** ([`sender`]) - Noon-normalizes the event date, builds
//!   the wire payload, and performs one delivery attempt
//! - **Throttle** ([`throttle`]) - Global spacing and mutual exclusion for
//!   outbound requests
//!
//! The whole run is serial by construction: each file awaits its rows, each
//! row awaits its delivery, and the throttle's spacing compounds with the
//! per-row delay. One bad file or one flaky delivery never stops the rest of
//! the dataset.
//!
//! ## Quick Start
//!
//! ```bash
//! export INGEST_URL="https://ingest.example.com/v1/events"
//! export API_TOKEN="..."
//! export INPUT_DIR="files"
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Loaded from environment variables via [`config::Config`]. See the
//! [`config`] module for available options.

pub mod config;
pub mod domain;
pub mod error;
pub mod processor;
pub mod sender;
pub mod sink;
pub mod throttle;
pub mod utils;
pub mod walker;

pub use error::AppError;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::domain::{ClickRecord, EventPayload, EventProperties};
    pub use crate::error::AppError;
    pub use crate::sender::EventSender;
    pub use crate::sink::{EventSink, HttpEventSink};
    pub use crate::throttle::Throttle;
    pub use crate::walker::{process_directory, RunSummary};
}
