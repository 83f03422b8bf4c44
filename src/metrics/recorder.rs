//! Metrics recording implementation using Prometheus.

use prometheus::{
    CounterVec, Encoder, HistogramVec, IntCounter, Opts, Registry, TextEncoder,
    register_counter_vec_with_registry, register_histogram_vec_with_registry,
    register_int_counter_with_registry,
};
use std::sync::Arc;

/// Trait for recording session refresh metrics.
pub trait MetricsRecorder: Clone + Send + Sync + 'static {
    /// Records a physical refresh call with its outcome.
    fn record_refresh_attempt(&self, result: &str);

    /// Records how long a refresh call took.
    fn record_refresh_duration(&self, duration_secs: f64, result: &str);

    /// Records waiters released by a settled refresh.
    fn record_waiters_settled(&self, count: usize, result: &str);

    /// Records the outcome of replaying a request after a refresh.
    fn record_retry(&self, result: &str);

    /// Records a forced end of the local session.
    fn record_session_terminated(&self);
}

/// Prometheus metrics collector.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,

    // Refresh metrics
    refresh_attempts_total: CounterVec,
    refresh_duration_seconds: HistogramVec,
    refresh_waiters_total: CounterVec,

    // Request metrics
    request_retries_total: CounterVec,
    session_terminations_total: IntCounter,
}

impl Metrics {
    /// Creates a new metrics instance with its own Prometheus registry.
    pub fn new() -> Self {
        let registry = Arc::new(Registry::new());

        let refresh_attempts_total = register_counter_vec_with_registry!(
            Opts::new(
                "journy_refresh_attempts_total",
                "Total number of session refresh calls"
            ),
            &["result"],
            registry.clone()
        )
        .expect("Failed to register journy_refresh_attempts_total");

        let refresh_duration_seconds = register_histogram_vec_with_registry!(
            "journy_refresh_duration_seconds",
            "Session refresh duration in seconds",
            &["result"],
            vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
            registry.clone()
        )
        .expect("Failed to register journy_refresh_duration_seconds");

        let refresh_waiters_total = register_counter_vec_with_registry!(
            Opts::new(
                "journy_refresh_waiters_total",
                "Requests released after waiting on an in-flight refresh"
            ),
            &["result"],
            registry.clone()
        )
        .expect("Failed to register journy_refresh_waiters_total");

        let request_retries_total = register_counter_vec_with_registry!(
            Opts::new(
                "journy_request_retries_total",
                "Requests replayed after a successful refresh"
            ),
            &["result"],
            registry.clone()
        )
        .expect("Failed to register journy_request_retries_total");

        let session_terminations_total = register_int_counter_with_registry!(
            Opts::new(
                "journy_session_terminations_total",
                "Sessions ended because the refresh failed"
            ),
            registry.clone()
        )
        .expect("Failed to register journy_session_terminations_total");

        Metrics {
            registry,
            refresh_attempts_total,
            refresh_duration_seconds,
            refresh_waiters_total,
            request_retries_total,
            session_terminations_total,
        }
    }

    /// Renders all metrics in Prometheus text format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::warn!("Failed to encode metrics: {}", e);
            return String::new();
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder for Metrics {
    fn record_refresh_attempt(&self, result: &str) {
        self.refresh_attempts_total
            .with_label_values(&[result])
            .inc();
    }

    fn record_refresh_duration(&self, duration_secs: f64, result: &str) {
        self.refresh_duration_seconds
            .with_label_values(&[result])
            .observe(duration_secs);
    }

    fn record_waiters_settled(&self, count: usize, result: &str) {
        if count == 0 {
            return;
        }
        self.refresh_waiters_total
            .with_label_values(&[result])
            .inc_by(count as f64);
    }

    fn record_retry(&self, result: &str) {
        self.request_retries_total
            .with_label_values(&[result])
            .inc();
    }

    fn record_session_terminated(&self) {
        self.session_terminations_total.inc();
    }
}
