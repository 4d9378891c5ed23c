//! End-to-end pipeline tests against an in-memory event sink.

use async_trait::async_trait;
use chrono::{Datelike, Local};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use click_relay::prelude::*;

/// Records every payload it is asked to deliver, optionally failing for a
/// configured set of domains, and counts in-flight overlap.
#[derive(Default)]
struct RecordingSink {
    deliveries: Mutex<Vec<EventPayload>>,
    attempts: Mutex<Vec<EventPayload>>,
    fail_domains: HashSet<String>,
    in_flight: AtomicUsize,
    overlapped: AtomicUsize,
}

impl RecordingSink {
    fn failing_for(domains: &[&str]) -> Self {
        Self {
            fail_domains: domains.iter().map(|d| d.to_string()).collect(),
            ..Self::default()
        }
    }

    fn delivered_domains(&self) -> Vec<String> {
        self.deliveries
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.properties.domain.clone())
            .collect()
    }

    fn attempted_domains(&self) -> Vec<String> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.properties.domain.clone())
            .collect()
    }
}

/// Newtype around the shared sink; the orphan rule forbids implementing the
/// foreign `EventSink` trait directly on `Arc<RecordingSink>`.
struct SharedSink(Arc<RecordingSink>);

#[async_trait]
impl EventSink for SharedSink {
    async fn deliver(&self, payload: EventPayload) -> Result<Value, AppError> {
        let sink = &self.0;
        if sink.in_flight.fetch_add(1, Ordering::SeqCst) > 0 {
            sink.overlapped.fetch_add(1, Ordering::SeqCst);
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
        sink.in_flight.fetch_sub(1, Ordering::SeqCst);

        sink.attempts.lock().unwrap().push(payload.clone());

        if sink.fail_domains.contains(&payload.properties.domain) {
            return Err(AppError::Delivery {
                domain: payload.properties.domain,
                reason: "HTTP 500: simulated".to_string(),
            });
        }

        sink.deliveries.lock().unwrap().push(payload);
        Ok(json!({"status": "accepted"}))
    }
}

fn sender_for(sink: Arc<RecordingSink>) -> EventSender<SharedSink> {
    EventSender::new(
        SharedSink(sink),
        Arc::new(Throttle::new(Duration::from_millis(1))),
        "csv clicks".to_string(),
    )
}

fn write_file(dir: &Path, name: &str, contents: &str) {
    std::fs::write(dir.join(name), contents).unwrap();
}

#[tokio::test]
async fn test_rows_delivered_in_file_order() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "report.2024-03-01_2024-03-07.csv",
        "domain,clicks\nfirst.com,1\nsecond.com,2\nthird.com,3\n",
    );

    let sink = Arc::new(RecordingSink::default());
    let sender = sender_for(Arc::clone(&sink));

    let summary = process_directory(dir.path(), &sender, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(summary.events_delivered, 3);
    assert_eq!(
        sink.delivered_domains(),
        vec!["first.com", "second.com", "third.com"]
    );
    assert_eq!(sink.overlapped.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_deliveries_grouped_per_file_and_never_concurrent() {
    let dir = tempfile::tempdir().unwrap();
    // Distinct event dates identify which file a delivery came from.
    write_file(
        dir.path(),
        "alpha.2024-01-01_2024-01-07.csv",
        "domain,clicks\na1.com,1\na2.com,2\n",
    );
    write_file(
        dir.path(),
        "beta.2024-02-01_2024-02-07.csv",
        "domain,clicks\nb1.com,1\nb2.com,2\n",
    );

    let sink = Arc::new(RecordingSink::default());
    let sender = sender_for(Arc::clone(&sink));

    let summary = process_directory(dir.path(), &sender, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(summary.files_processed, 2);
    assert_eq!(summary.events_delivered, 4);
    assert_eq!(sink.overlapped.load(Ordering::SeqCst), 0);

    // Files are processed one at a time: each file's rows are contiguous
    // and in row order, whatever order the listing yielded.
    let months: Vec<u32> = sink
        .deliveries
        .lock()
        .unwrap()
        .iter()
        .map(|p| p.occurred_at.with_timezone(&Local).month())
        .collect();
    assert!(months == vec![1, 1, 2, 2] || months == vec![2, 2, 1, 1]);

    let domains = sink.delivered_domains();
    let a_positions: Vec<usize> = domains
        .iter()
        .enumerate()
        .filter(|(_, d)| d.starts_with('a'))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(domains[a_positions[0]], "a1.com");
    assert_eq!(domains[a_positions[1]], "a2.com");
}

#[tokio::test]
async fn test_non_qualifying_rows_never_reach_the_sink() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "report.2024-03-01_2024-03-07.csv",
        "domain,clicks\n\
         zero.com,0\n\
         negative.com,-3\n\
         nonnumeric.com,n/a\n\
         ,42\n\
         good.com,1\n",
    );

    let sink = Arc::new(RecordingSink::default());
    let sender = sender_for(Arc::clone(&sink));

    let summary = process_directory(dir.path(), &sender, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(summary.events_delivered, 1);
    assert_eq!(sink.attempted_domains(), vec!["good.com"]);
}

#[tokio::test]
async fn test_malformed_middle_file_does_not_stop_the_run() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "a.2024-01-01_2024-01-07.csv",
        "domain,clicks\na.com,1\n",
    );
    // Ragged record: field count disagrees with the header.
    write_file(
        dir.path(),
        "b.2024-02-01_2024-02-07.csv",
        "domain,clicks\nbroken.com,2,unexpected,extra\n",
    );
    write_file(
        dir.path(),
        "c.2024-03-01_2024-03-07.csv",
        "domain,clicks\nc.com,3\n",
    );

    let sink = Arc::new(RecordingSink::default());
    let sender = sender_for(Arc::clone(&sink));

    let summary = process_directory(dir.path(), &sender, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(summary.files_processed, 2);
    assert_eq!(summary.files_skipped, 1);
    assert_eq!(summary.events_delivered, 2);

    let delivered: HashSet<String> = sink.delivered_domains().into_iter().collect();
    assert!(delivered.contains("a.com"));
    assert!(delivered.contains("c.com"));
    assert!(!delivered.contains("broken.com"));
}

#[tokio::test]
async fn test_failed_delivery_does_not_stop_next_row() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "report.2024-03-01_2024-03-07.csv",
        "domain,clicks\nrejected.com,1\naccepted.com,2\n",
    );

    let sink = Arc::new(RecordingSink::failing_for(&["rejected.com"]));
    let sender = sender_for(Arc::clone(&sink));

    let summary = process_directory(dir.path(), &sender, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(summary.events_delivered, 1);
    assert_eq!(summary.events_failed, 1);
    assert_eq!(sink.attempted_domains(), vec!["rejected.com", "accepted.com"]);
    assert_eq!(sink.delivered_domains(), vec!["accepted.com"]);
}

#[tokio::test]
async fn test_payload_contents_for_dated_export() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "report.2024-03-01_2024-03-07.csv",
        "domain,clicks\nexample.com,5\n",
    );

    let sink = Arc::new(RecordingSink::default());
    let sender = sender_for(Arc::clone(&sink));

    process_directory(dir.path(), &sender, Duration::ZERO)
        .await
        .unwrap();

    let deliveries = sink.deliveries.lock().unwrap();
    assert_eq!(deliveries.len(), 1);

    let payload = &deliveries[0];
    assert_eq!(payload.event_name, "csv clicks");
    assert_eq!(payload.properties.clicks, 5);
    assert_eq!(payload.properties.domain, "example.com");

    // occurredAt is local noon of the first span date, expressed in UTC.
    let local = payload.occurred_at.with_timezone(&Local);
    assert_eq!(local.date_naive().to_string(), "2024-03-01");
    assert_eq!(local.format("%H:%M:%S%.3f").to_string(), "12:00:00.000");
}

#[tokio::test]
async fn test_file_without_date_span_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "undated.csv", "domain,clicks\nexample.com,5\n");

    let sink = Arc::new(RecordingSink::default());
    let sender = sender_for(Arc::clone(&sink));

    let summary = process_directory(dir.path(), &sender, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(summary.files_skipped, 1);
    assert_eq!(summary.events_delivered, 0);
    assert!(sink.attempted_domains().is_empty());
}

#[tokio::test]
async fn test_non_csv_entries_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "notes.2024-03-01_2024-03-07.txt", "domain,clicks\nx.com,1\n");
    write_file(
        dir.path(),
        "report.2024-03-01_2024-03-07.CSV",
        "domain,clicks\nupper.com,1\n",
    );

    let sink = Arc::new(RecordingSink::default());
    let sender = sender_for(Arc::clone(&sink));

    let summary = process_directory(dir.path(), &sender, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(summary.files_processed, 1);
    assert_eq!(sink.delivered_domains(), vec!["upper.com"]);
}

#[tokio::test]
async fn test_empty_directory_is_a_clean_noop() {
    let dir = tempfile::tempdir().unwrap();

    let sink = Arc::new(RecordingSink::default());
    let sender = sender_for(Arc::clone(&sink));

    let summary = process_directory(dir.path(), &sender, Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(summary, RunSummary::default());
}

#[tokio::test]
async fn test_missing_directory_is_a_typed_graceful_error() {
    let sink = Arc::new(RecordingSink::default());
    let sender = sender_for(Arc::clone(&sink));

    let result = process_directory(Path::new("/no/such/dir"), &sender, Duration::ZERO).await;

    // main logs this and exits 0; it must be distinguishable from a crash.
    match result {
        Err(err @ AppError::DirectoryNotFound(_)) => assert!(err.is_directory_error()),
        other => panic!("expected DirectoryNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_row_delay_and_throttle_spacing_compound() {
    let dir = tempfile::tempdir().unwrap();
    write_file(
        dir.path(),
        "report.2024-03-01_2024-03-07.csv",
        "domain,clicks\na.com,1\nb.com,2\nc.com,3\n",
    );

    let sink = Arc::new(RecordingSink::default());
    let sender = EventSender::new(
        SharedSink(Arc::clone(&sink)),
        Arc::new(Throttle::new(Duration::from_millis(30))),
        "csv clicks".to_string(),
    );

    let started = tokio::time::Instant::now();
    process_directory(dir.path(), &sender, Duration::from_millis(30))
        .await
        .unwrap();

    // Two inter-delivery gaps, each at least row delay + throttle interval,
    // plus the trailing row delay.
    assert!(started.elapsed() >= Duration::from_millis(150));
}
