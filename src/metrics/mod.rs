//! Basic metrics instrumentation for tracking performance.
//!
//! Provides counters and duration tracking for HTTP requests, duplicate checks,
//! contact creation and local searches.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector shared by the client and the services.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Total number of HTTP requests made
    http_requests_total: Arc<AtomicU64>,

    /// Total number of HTTP errors
    http_errors_total: Arc<AtomicU64>,

    /// Total duration of all HTTP requests in milliseconds
    http_duration_total_ms: Arc<AtomicU64>,

    /// Number of contacts loaded from the list source
    contacts_loaded_total: Arc<AtomicU64>,

    /// Number of near-duplicate checks performed
    duplicate_checks_total: Arc<AtomicU64>,

    /// Number of duplicate candidates returned across all checks
    duplicates_found_total: Arc<AtomicU64>,

    /// Number of contacts created
    contacts_created_total: Arc<AtomicU64>,

    /// Number of local index searches
    searches_total: Arc<AtomicU64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            http_requests_total: Arc::new(AtomicU64::new(0)),
            http_errors_total: Arc::new(AtomicU64::new(0)),
            http_duration_total_ms: Arc::new(AtomicU64::new(0)),
            contacts_loaded_total: Arc::new(AtomicU64::new(0)),
            duplicate_checks_total: Arc::new(AtomicU64::new(0)),
            duplicates_found_total: Arc::new(AtomicU64::new(0)),
            contacts_created_total: Arc::new(AtomicU64::new(0)),
            searches_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record an HTTP request with duration.
    pub fn record_http_request(&self, duration: Duration) {
        self.http_requests_total.fetch_add(1, Ordering::Relaxed);
        self.http_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record an HTTP error.
    pub fn record_http_error(&self) {
        self.http_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record contacts loaded from the list source.
    pub fn record_contacts_loaded(&self, count: usize) {
        self.contacts_loaded_total
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Record a duplicate check and the number of candidates it returned.
    pub fn record_duplicate_check(&self, candidates: usize) {
        self.duplicate_checks_total.fetch_add(1, Ordering::Relaxed);
        self.duplicates_found_total
            .fetch_add(candidates as u64, Ordering::Relaxed);
    }

    /// Record a created contact.
    pub fn record_contact_created(&self) {
        self.contacts_created_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a local index search.
    pub fn record_search(&self) {
        self.searches_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total HTTP requests.
    pub fn http_requests_total(&self) -> u64 {
        self.http_requests_total.load(Ordering::Relaxed)
    }

    /// Get total HTTP errors.
    pub fn http_errors_total(&self) -> u64 {
        self.http_errors_total.load(Ordering::Relaxed)
    }

    /// Get total HTTP duration in milliseconds.
    pub fn http_duration_total_ms(&self) -> u64 {
        self.http_duration_total_ms.load(Ordering::Relaxed)
    }

    /// Get average HTTP request duration in milliseconds.
    pub fn http_duration_avg_ms(&self) -> f64 {
        let total = self.http_duration_total_ms.load(Ordering::Relaxed);
        let count = self.http_requests_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    pub fn contacts_loaded_total(&self) -> u64 {
        self.contacts_loaded_total.load(Ordering::Relaxed)
    }

    pub fn duplicate_checks_total(&self) -> u64 {
        self.duplicate_checks_total.load(Ordering::Relaxed)
    }

    pub fn duplicates_found_total(&self) -> u64 {
        self.duplicates_found_total.load(Ordering::Relaxed)
    }

    pub fn contacts_created_total(&self) -> u64 {
        self.contacts_created_total.load(Ordering::Relaxed)
    }

    pub fn searches_total(&self) -> u64 {
        self.searches_total.load(Ordering::Relaxed)
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        for counter in [
            &self.http_requests_total,
            &self.http_errors_total,
            &self.http_duration_total_ms,
            &self.contacts_loaded_total,
            &self.duplicate_checks_total,
            &self.duplicates_found_total,
            &self.contacts_created_total,
            &self.searches_total,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            http_requests_total: self.http_requests_total(),
            http_errors_total: self.http_errors_total(),
            http_duration_total_ms: self.http_duration_total_ms(),
            http_duration_avg_ms: self.http_duration_avg_ms(),
            contacts_loaded_total: self.contacts_loaded_total(),
            duplicate_checks_total: self.duplicate_checks_total(),
            duplicates_found_total: self.duplicates_found_total(),
            contacts_created_total: self.contacts_created_total(),
            searches_total: self.searches_total(),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSummary {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub http_duration_total_ms: u64,
    pub http_duration_avg_ms: f64,
    pub contacts_loaded_total: u64,
    pub duplicate_checks_total: u64,
    pub duplicates_found_total: u64,
    pub contacts_created_total: u64,
    pub searches_total: u64,
}

/// Helper for timing HTTP requests.
pub struct HttpTimer {
    start: Instant,
    metrics: Metrics,
}

impl HttpTimer {
    /// Start timing an HTTP request.
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Complete the timing and record the duration.
    pub fn complete(self) {
        let duration = self.start.elapsed();
        self.metrics.record_http_request(duration);
    }

    /// Complete the timing and record as an error.
    pub fn complete_with_error(self) {
        let duration = self.start.elapsed();
        self.metrics.record_http_request(duration);
        self.metrics.record_http_error();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert_eq!(metrics.http_requests_total(), 0);
        assert_eq!(metrics.http_errors_total(), 0);
        assert_eq!(metrics.http_duration_total_ms(), 0);
    }

    #[test]
    fn test_average_duration() {
        let metrics = Metrics::new();
        metrics.record_http_request(Duration::from_millis(100));
        metrics.record_http_request(Duration::from_millis(200));
        assert_eq!(metrics.http_requests_total(), 2);
        assert_eq!(metrics.http_duration_total_ms(), 300);
        assert_eq!(metrics.http_duration_avg_ms(), 150.0);
    }

    #[test]
    fn test_duplicate_check_counters() {
        let metrics = Metrics::new();
        metrics.record_duplicate_check(0);
        metrics.record_duplicate_check(3);
        assert_eq!(metrics.duplicate_checks_total(), 2);
        assert_eq!(metrics.duplicates_found_total(), 3);
    }

    #[test]
    fn test_reset() {
        let metrics = Metrics::new();
        metrics.record_http_request(Duration::from_millis(100));
        metrics.record_http_error();
        metrics.record_contacts_loaded(5);
        metrics.record_contact_created();
        metrics.record_search();

        metrics.reset();

        let summary = metrics.summary();
        assert_eq!(summary.http_requests_total, 0);
        assert_eq!(summary.http_errors_total, 0);
        assert_eq!(summary.contacts_loaded_total, 0);
        assert_eq!(summary.contacts_created_total, 0);
        assert_eq!(summary.searches_total, 0);
    }

    #[test]
    fn test_http_timer_with_error() {
        let metrics = Metrics::new();
        let timer = HttpTimer::new(metrics.clone());
        timer.complete_with_error();

        assert_eq!(metrics.http_requests_total(), 1);
        assert_eq!(metrics.http_errors_total(), 1);
    }

    #[test]
    fn test_concurrent_access() {
        let metrics = Metrics::new();
        let handles: Vec<_> = (0..2)
            .map(|_| {
                let metrics = metrics.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        metrics.record_search();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(metrics.searches_total(), 200);
    }
}
