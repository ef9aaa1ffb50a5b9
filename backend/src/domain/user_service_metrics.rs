//! Metrics decorator for [`UserService`].
//!
//! Every call is timed and reported through the [`UserServiceMetrics`] port,
//! labelled by method and whether it failed.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::domain::ports::{UserOperation, UserService, UserServiceError, UserServiceMetrics};
use crate::domain::{RequestContext, UserId, UserName};

/// [`UserService`] wrapper recording request counts and latency.
pub struct InstrumentedUserService<S, M: ?Sized> {
    inner: S,
    metrics: Arc<M>,
}

impl<S, M: ?Sized> InstrumentedUserService<S, M> {
    pub fn new(inner: S, metrics: Arc<M>) -> Self {
        Self { inner, metrics }
    }
}

#[async_trait]
impl<S, M> UserService for InstrumentedUserService<S, M>
where
    S: UserService,
    M: UserServiceMetrics + ?Sized,
{
    async fn create_user(
        &self,
        ctx: &RequestContext,
        name: &UserName,
    ) -> Result<UserId, UserServiceError> {
        let started = Instant::now();
        let result = self.inner.create_user(ctx, name).await;
        self.metrics.record(
            UserOperation::CreateUser,
            result.is_err(),
            started.elapsed(),
        );
        result
    }

    async fn update_user(
        &self,
        ctx: &RequestContext,
        id: &UserId,
        name: &UserName,
    ) -> Result<(), UserServiceError> {
        let started = Instant::now();
        let result = self.inner.update_user(ctx, id, name).await;
        self.metrics.record(
            UserOperation::UpdateUser,
            result.is_err(),
            started.elapsed(),
        );
        result
    }
}
