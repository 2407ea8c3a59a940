//! Lightweight in-process metrics.
//!
//! Counters and latency histograms are stored as atomics and rendered in
//! Prometheus text format on demand (the CLI prints them after a replay).

pub mod metrics;

pub use metrics::ClientMetrics;
