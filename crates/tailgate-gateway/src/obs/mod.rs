//! Lightweight in-process metrics.
//!
//! Decision and reload counters are stored as atomics and rendered by the
//! `/metrics` handler in Prometheus text format.

pub mod metrics;
