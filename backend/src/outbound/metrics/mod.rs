//! Outbound adapters for metrics exporting.
//!
//! Prometheus-backed implementations of domain metrics ports, gated behind
//! the `metrics` feature.

mod prometheus_user_service;

pub use prometheus_user_service::PrometheusUserServiceMetrics;
