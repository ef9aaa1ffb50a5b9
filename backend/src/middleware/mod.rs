//! Request middleware.
//!
//! Purpose: Define middleware for request lifecycle concerns: correlation
//! ids, request logging and panic recovery.

pub mod recovery;
pub mod request_id;
pub mod request_logging;

pub use recovery::Recovery;
pub use request_id::RequestIdMiddleware;
pub use request_logging::{LogMode, ParseLogModeError, RequestLogging};
