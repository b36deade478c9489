//! Lightweight in-process metrics.
//!
//! Counters and gauges are stored as atomics and rendered in Prometheus text
//! format on demand; the bridge never blocks on them.

pub mod metrics;

pub use metrics::BridgeMetrics;
