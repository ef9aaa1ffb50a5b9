//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the user service port and remain testable without I/O.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::ports::UserService;
use crate::domain::{RequestContext, RequestId};

use super::validation::RequestValidator;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserService>,
    pub validator: RequestValidator,
    pub request_timeout: Option<Duration>,
}

impl HttpState {
    /// State without a request deadline.
    pub fn new(users: Arc<dyn UserService>, validator: RequestValidator) -> Self {
        Self {
            users,
            validator,
            request_timeout: None,
        }
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Context for one request, with the deadline starting now.
    pub fn request_context(&self, request_id: RequestId) -> RequestContext {
        let ctx = RequestContext::new(request_id);
        match self.request_timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }
}
