//! Shared utilities for executor integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use std::future::Future;
use tokio::time::Instant;

use resilient_executor::{AttemptEvent, AttemptReporter};

/// A scripted operation that records when each call started.
///
/// Call `n` (0-based) sleeps `latency(n)` and then fails while `n < fail_first`.
#[derive(Clone)]
pub struct ScriptedOperation {
    starts: Arc<Mutex<Vec<Instant>>>,
    fail_first: u32,
    latency: Arc<dyn Fn(u32) -> Duration + Send + Sync>,
}

#[allow(dead_code)]
impl ScriptedOperation {
    pub fn failing_first(fail_first: u32) -> Self {
        Self {
            starts: Arc::new(Mutex::new(Vec::new())),
            fail_first,
            latency: Arc::new(|_| Duration::ZERO),
        }
    }

    pub fn always_failing() -> Self {
        Self::failing_first(u32::MAX)
    }

    pub fn with_latency<F>(mut self, latency: F) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        self.latency = Arc::new(latency);
        self
    }

    /// Start one call. Returns `Ok(call_index)` on success.
    pub fn call(&self) -> impl Future<Output = Result<u32, String>> + Send + 'static {
        let mut starts = self.starts.lock().unwrap();
        let n = starts.len() as u32;
        starts.push(Instant::now());

        let latency = (self.latency)(n);
        let fail = n < self.fail_first;
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            if fail {
                Err(format!("call {n} failed"))
            } else {
                Ok(n)
            }
        }
    }

    pub fn calls(&self) -> u32 {
        self.starts.lock().unwrap().len() as u32
    }

    /// Gaps between consecutive call starts.
    pub fn gaps(&self) -> Vec<Duration> {
        let starts = self.starts.lock().unwrap();
        starts.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

/// A reporter closure plus the events it collected.
#[allow(dead_code)]
pub fn recording_reporter() -> (Arc<dyn AttemptReporter>, Arc<Mutex<Vec<AttemptEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let reporter: Arc<dyn AttemptReporter> = Arc::new(move |event: &AttemptEvent| {
        sink.lock().unwrap().push(event.clone());
    });
    (reporter, events)
}
