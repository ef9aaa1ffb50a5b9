//! Logging decorator for [`UserService`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{UserOperation, UserService, UserServiceError};
use crate::domain::{RequestContext, UserId, UserName};

/// Emits one structured log line per service call once the inner call has
/// completed, at `info` on success and `warn` on failure.
#[derive(Debug, Clone)]
pub struct LoggingUserService<S> {
    inner: S,
}

impl<S> LoggingUserService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

fn log_call(
    ctx: &RequestContext,
    operation: UserOperation,
    name: &UserName,
    id: Option<&UserId>,
    error: Option<&UserServiceError>,
    took: Duration,
) {
    let id = id.map(UserId::as_str).unwrap_or_default();
    match error {
        None => info!(
            method = operation.as_str(),
            request_id = %ctx.request_id(),
            name = name.as_str(),
            id,
            took = ?took,
            "user service call completed"
        ),
        Some(err) => warn!(
            method = operation.as_str(),
            request_id = %ctx.request_id(),
            name = name.as_str(),
            id,
            error = %err,
            took = ?took,
            "user service call failed"
        ),
    }
}

#[async_trait]
impl<S> UserService for LoggingUserService<S>
where
    S: UserService,
{
    async fn create_user(
        &self,
        ctx: &RequestContext,
        name: &UserName,
    ) -> Result<UserId, UserServiceError> {
        let started = Instant::now();
        let result = self.inner.create_user(ctx, name).await;
        log_call(
            ctx,
            UserOperation::CreateUser,
            name,
            result.as_ref().ok(),
            result.as_ref().err(),
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
        log_call(
            ctx,
            UserOperation::UpdateUser,
            name,
            Some(id),
            result.as_ref().err(),
            started.elapsed(),
        );
        result
    }
}
