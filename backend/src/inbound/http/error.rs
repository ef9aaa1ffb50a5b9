//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while turning domain
//! failures into the uniform `{"error": {"code", "message"}}` envelope with a
//! matching status code. This is the only place store failures are
//! classified.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::domain::ports::{UserServiceError, UserStoreError};
use crate::domain::{Error, ErrorCode};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Wire form of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code: 60801 validation, 60401 not found, 60901 internal.
    #[schema(example = 60801)]
    pub code: u32,
    #[schema(example = "missing required field: name")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<&Error> for ErrorEnvelope {
    fn from(error: &Error) -> Self {
        let body = if matches!(error.code(), ErrorCode::InternalError) {
            ErrorBody {
                code: error.code().numeric(),
                message: "internal server error".to_owned(),
                details: None,
            }
        } else {
            ErrorBody {
                code: error.code().numeric(),
                message: error.message().to_owned(),
                details: error.details().cloned(),
            }
        };
        Self { error: body }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorEnvelope::from(self))
    }
}

impl From<UserServiceError> for Error {
    fn from(err: UserServiceError) -> Self {
        match err.store_error() {
            UserStoreError::NotFound { .. } => {
                warn!(error = %err, store = %err.store(), "user record not found");
                Error::not_found(err.to_string())
            }
            _ => {
                error!(error = %err, store = %err.store(), "user service failed");
                Error::internal(err.to_string())
            }
        }
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("internal server error")
    }
}
