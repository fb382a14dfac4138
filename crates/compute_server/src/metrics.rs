//! Process-lifetime request metrics.
//!
//! [`RunningMetrics`] is an explicitly owned instance injected into the
//! dispatcher at construction (not a global), so tests can run with
//! independent instances. The request counter is a lock-free atomic;
//! cumulative latency is behind a mutex; every write and every read of
//! it holds the lock, so there are no torn reads.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Running request/latency metrics, mutated by every completed call.
#[derive(Debug, Default)]
pub struct RunningMetrics {
    total_requests: AtomicU64,
    total_response_time_ms: Mutex<f64>,
}

impl RunningMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts an incoming request (also counted when it later fails).
    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds the elapsed wall-clock time of a completed call.
    pub fn record_latency(&self, elapsed_ms: f64) {
        let mut total = self
            .total_response_time_ms
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *total += elapsed_ms;
    }

    pub fn total_requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    /// Running average response time; zero before the first request.
    pub fn average_response_time_ms(&self) -> f64 {
        let total = self
            .total_response_time_ms
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let requests = self.total_requests();
        if requests > 0 {
            *total / requests as f64
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    #[test]
    fn test_empty_metrics() {
        let metrics = RunningMetrics::new();
        assert_eq!(metrics.total_requests(), 0);
        assert_eq!(metrics.average_response_time_ms(), 0.0);
    }

    #[test]
    fn test_average_is_total_over_requests() {
        let metrics = RunningMetrics::new();
        for ms in [10.0, 20.0, 30.0] {
            metrics.record_request();
            metrics.record_latency(ms);
        }
        assert_eq!(metrics.total_requests(), 3);
        assert_relative_eq!(
            metrics.average_response_time_ms(),
            20.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_concurrent_requests_are_not_lost() {
        let metrics = Arc::new(RunningMetrics::new());
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let metrics = Arc::clone(&metrics);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        metrics.record_request();
                        metrics.record_latency(1.0);
                    }
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }

        assert_eq!(metrics.total_requests(), 8000);
        assert_relative_eq!(metrics.average_response_time_ms(), 1.0, max_relative = 1e-9);
    }
}
