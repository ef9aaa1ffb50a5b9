//! Domain primitives, ports and services.
//!
//! Purpose: Define the strongly typed user values, the request context
//! threaded through every call, the ports implemented by store adapters and
//! the orchestration service with its decorators.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - UserName, UserId, StoreId: validated user values.
//! - RequestContext, RequestId: correlation id and deadline for a request.
//! - UserOrchestrator: writes a user to all three stores in order.
//! - LoggingUserService, InstrumentedUserService: service decorators.

pub mod error;
pub mod ports;
pub mod request_context;
pub mod user;
pub mod user_service;
pub mod user_service_logging;
pub mod user_service_metrics;

pub use self::error::{Error, ErrorCode};
pub use self::request_context::{DeadlineExceeded, REQUEST_ID_HEADER, RequestContext, RequestId};
pub use self::user::{StoreId, USER_NAME_MAX, UserId, UserName, UserValidationError};
pub use self::user_service::UserOrchestrator;
pub use self::user_service_logging::LoggingUserService;
pub use self::user_service_metrics::InstrumentedUserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use tristore::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such user"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
