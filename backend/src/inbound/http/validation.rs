//! Request decoding and validation for inbound HTTP adapters.
//!
//! Every failure here is a validation error raised before the user service
//! is called.

use actix_web::web;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::domain::{Error, USER_NAME_MAX, UserId, UserName, UserValidationError};

/// Validation error codes reported in the `details` of a 400 response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    EmptyBody,
    MalformedBody,
    MissingField,
    EmptyField,
    TooLong,
    TooLarge,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::EmptyBody => "empty_body",
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::MissingField => "missing_field",
            ErrorCode::EmptyField => "empty_field",
            ErrorCode::TooLong => "too_long",
            ErrorCode::TooLarge => "too_large",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

pub(crate) const NAME: FieldName = FieldName::new("name");
pub(crate) const USER_ID: FieldName = FieldName::new("userId");

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

fn field_error(field: FieldName, err: &UserValidationError) -> Error {
    let code = match err {
        UserValidationError::NameTooLong { .. } => ErrorCode::TooLong,
        UserValidationError::EmptyName | UserValidationError::EmptyId => ErrorCode::EmptyField,
    };
    ValidationError::new(field.as_str(), err.to_string()).with_code(code)
}

/// Largest request body accepted by the user handlers, in bytes.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Immutable validation rules shared by the user handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestValidator {
    max_name_length: usize,
    max_body_bytes: usize,
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new(USER_NAME_MAX)
    }
}

impl RequestValidator {
    pub fn new(max_name_length: usize) -> Self {
        Self {
            max_name_length,
            max_body_bytes: MAX_BODY_BYTES,
        }
    }

    #[must_use]
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub fn max_name_length(&self) -> usize {
        self.max_name_length
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    /// Read the request body, refusing anything over the configured limit.
    ///
    /// Oversized or unreadable bodies become validation errors so they share
    /// the JSON envelope with every other rejected request.
    pub async fn read_body(&self, payload: web::Payload) -> Result<web::Bytes, Error> {
        match payload.to_bytes_limited(self.max_body_bytes).await {
            Ok(Ok(body)) => Ok(body),
            Ok(Err(err)) => Err(Error::invalid_request("cannot read request").with_details(
                json!({
                    "code": ErrorCode::MalformedBody.as_str(),
                    "reason": err.to_string(),
                }),
            )),
            Err(_) => Err(Error::invalid_request("request body too large").with_details(
                json!({
                    "code": ErrorCode::TooLarge.as_str(),
                    "limit": self.max_body_bytes,
                }),
            )),
        }
    }

    /// Decode a JSON request body.
    ///
    /// Whitespace-only bodies are reported as empty rather than malformed.
    pub fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(Error::invalid_request("empty request")
                .with_details(json!({ "code": ErrorCode::EmptyBody.as_str() })));
        }
        serde_json::from_slice(body).map_err(|err| {
            Error::invalid_request("cannot decode request").with_details(json!({
                "code": ErrorCode::MalformedBody.as_str(),
                "reason": err.to_string(),
            }))
        })
    }

    pub fn name(&self, raw: Option<String>) -> Result<UserName, Error> {
        let raw = raw.ok_or_else(|| missing_field_error(NAME))?;
        UserName::with_max_length(raw, self.max_name_length).map_err(|err| field_error(NAME, &err))
    }

    pub fn user_id(&self, raw: Option<String>) -> Result<UserId, Error> {
        let raw = raw.ok_or_else(|| missing_field_error(USER_ID))?;
        UserId::new(raw).map_err(|err| field_error(USER_ID, &err))
    }
}
