//! Prometheus adapter for user service request metrics.
//!
//! Metrics are registered with the registry shared with `actix-web-prom`, so
//! they are exposed on the same `/metrics` endpoint.

use std::time::Duration;

use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry};

use crate::domain::ports::{UserOperation, UserServiceMetrics};

/// Prometheus-backed user service metrics recorder.
///
/// # Metrics
///
/// - `tristore_requests_total` (counter)
/// - `tristore_request_duration_seconds` (histogram)
///
/// Both carry the labels `method` (`CreateUser` or `UpdateUser`) and `error`
/// (`true` or `false`).
pub struct PrometheusUserServiceMetrics {
    requests_total: CounterVec,
    request_duration: HistogramVec,
}

impl PrometheusUserServiceMetrics {
    /// Create and register metrics with the given registry.
    ///
    /// # Errors
    ///
    /// Returns an error if either metric is already registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let labels = ["method", "error"];
        let requests_total = CounterVec::new(
            Opts::new("tristore_requests_total", "Number of user service requests"),
            &labels,
        )?;
        let request_duration = HistogramVec::new(
            HistogramOpts::new(
                "tristore_request_duration_seconds",
                "User service request latency in seconds",
            ),
            &labels,
        )?;
        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(request_duration.clone()))?;
        Ok(Self {
            requests_total,
            request_duration,
        })
    }
}

impl UserServiceMetrics for PrometheusUserServiceMetrics {
    fn record(&self, operation: UserOperation, failed: bool, elapsed: Duration) {
        let error = if failed { "true" } else { "false" };
        let labels = [operation.as_str(), error];
        self.requests_total.with_label_values(&labels).inc();
        self.request_duration
            .with_label_values(&labels)
            .observe(elapsed.as_secs_f64());
    }
}
