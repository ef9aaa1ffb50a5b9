//! Domain port surface for recording user service request metrics.
//!
//! The instrumenting decorator reports every call through this port so the
//! domain stays independent of the metrics backend. Implementations may
//! export to Prometheus or discard the samples in tests.

use std::time::Duration;

use super::UserOperation;

/// Metrics recording port for user service calls.
pub trait UserServiceMetrics: Send + Sync {
    /// Record one completed call: a request count increment and a latency
    /// observation, both labelled by method and whether the call failed.
    fn record(&self, operation: UserOperation, failed: bool, elapsed: Duration);
}

/// No-op implementation for when metrics are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpUserServiceMetrics;

impl UserServiceMetrics for NoOpUserServiceMetrics {
    fn record(&self, _operation: UserOperation, _failed: bool, _elapsed: Duration) {}
}
