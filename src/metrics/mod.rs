//! Metrics collection for session refresh cycles.
//!
//! Rendered in Prometheus text format by `Metrics::render`.

mod recorder;

pub use recorder::{Metrics, MetricsRecorder};
