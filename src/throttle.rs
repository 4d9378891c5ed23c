//! Outbound request throttling.

use std::time::Duration;
use tokio::sync::Mutex;

/// Serializes submitted tasks and enforces a minimum spacing between their
/// start times.
///
/// Guarantees, independent of how many callers share the throttle:
///
/// - at most one task executes at a time,
/// - every task start (after the first) is preceded by a full
///   `min_interval` pause, so consecutive starts are at least that far
///   apart and the spacing stacks with any pacing the caller adds,
/// - tasks start in submission order (the internal lock is fair, so waiters
///   are released FIFO),
/// - a task's failure neither cancels nor delays subsequently queued tasks
///   beyond the normal spacing.
///
/// The pause is deliberately unconditional rather than "time remaining since
/// the last start": callers that already pace themselves between submissions
/// still get the full spacing added, and a timing test observes the
/// compounded floor.
///
/// Constructed once at startup and shared by reference, so every delivery in
/// the process contends for the same spacing. No task is ever dropped; each
/// submitted task runs exactly once unless the process terminates first.
#[derive(Debug)]
pub struct Throttle {
    min_interval: Duration,
    ran_before: Mutex<bool>,
}

impl Throttle {
    /// Default spacing between task starts: 10 effective ops/sec.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            ran_before: Mutex::new(false),
        }
    }

    /// Runs `task` under the throttle and returns its output.
    ///
    /// The lock is held for the task's whole execution, which is what makes
    /// "max one in flight" hold even when callers submit concurrently.
    pub async fn run<F, T>(&self, task: F) -> T
    where
        F: Future<Output = T>,
    {
        let mut ran_before = self.ran_before.lock().await;

        if *ran_before {
            tokio::time::sleep(self.min_interval).await;
        }
        *ran_before = true;

        task.await
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERVAL)
    }
}
