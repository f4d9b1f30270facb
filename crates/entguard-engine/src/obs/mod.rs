//! Lightweight in-process metrics for policy decisions.
//!
//! Decision counters and evaluation latency are stored as atomics keyed by
//! label sets and rendered on demand in Prometheus text format.

pub mod metrics;

pub use metrics::PolicyMetrics;
