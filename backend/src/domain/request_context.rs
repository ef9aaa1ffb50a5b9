//! Request-scoped context threaded explicitly through the service layer.
//!
//! `RequestContext` carries the correlation identifier for a request and the
//! deadline by which every store call must finish. Inbound adapters build one
//! per request and pass it by reference into the service, its decorators and
//! the store adapters.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use uuid::Uuid;

/// Header carrying the correlation identifier in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest inbound correlation identifier accepted verbatim.
const REQUEST_ID_MAX: usize = 128;

/// Opaque per-request correlation identifier.
///
/// # Examples
/// ```
/// use tristore::domain::RequestId;
///
/// let id = RequestId::parse("abc123").expect("valid id");
/// assert_eq!(id.as_str(), "abc123");
/// assert!(RequestId::parse("").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Accept an inbound identifier when it is non-empty, bounded and made of
    /// visible ASCII characters.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let acceptable = !trimmed.is_empty()
            && trimmed.len() <= REQUEST_ID_MAX
            && trimmed.bytes().all(|b| b.is_ascii_graphic());
        acceptable.then(|| Self(trimmed.to_owned()))
    }

    /// Use the inbound identifier when acceptable, otherwise mint a new one.
    #[must_use]
    pub fn from_header_or_generate(raw: Option<&str>) -> Self {
        raw.and_then(Self::parse).unwrap_or_else(Self::generate)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a request deadline elapses before the guarded work finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("request deadline exceeded")]
pub struct DeadlineExceeded;

/// Per-request execution context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: RequestId,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Context without a deadline.
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            deadline: None,
        }
    }

    /// Set the deadline to `timeout` from now.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Drive `fut` to completion unless the deadline passes first.
    ///
    /// # Examples
    /// ```
    /// use tristore::domain::{RequestContext, RequestId};
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let ctx = RequestContext::new(RequestId::generate());
    /// assert_eq!(ctx.within_deadline(async { 7 }).await, Ok(7));
    /// # });
    /// ```
    pub async fn within_deadline<Fut>(&self, fut: Fut) -> Result<Fut::Output, DeadlineExceeded>
    where
        Fut: Future,
    {
        match self.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, fut)
                .await
                .map_err(|_| DeadlineExceeded),
            None => Ok(fut.await),
        }
    }
}
