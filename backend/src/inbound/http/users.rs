//! User write endpoints.
//!
//! ```text
//! POST /createUser {"name":"alice"}                 -> {"userId":"17-930...-551..."}
//! POST /updateUser {"userId":"17-930...","name":"bob"} -> {}
//! ```
//!
//! Bodies are read as raw bytes, capped at the validator's size limit, and
//! decoded by the [`RequestValidator`] so oversized, empty and malformed
//! payloads produce the uniform validation envelope.
//!
//! [`RequestValidator`]: super::validation::RequestValidator

use actix_web::{post, web};
use serde::{Deserialize, Serialize};

use crate::domain::RequestId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;

/// Request body for `POST /createUser`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "alice")]
    pub name: Option<String>,
}

/// Response body for `POST /createUser`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
    /// Composite identifier `"{sql}-{kv}-{docs}"`.
    #[schema(example = "17-9306384152837594671-5515186419874061045")]
    pub user_id: String,
}

/// Request body for `POST /updateUser`.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub user_id: Option<String>,
    pub name: Option<String>,
}

/// Response body for `POST /updateUser`; always an empty object.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct UpdateUserResponse {}

/// Create a user in all three stores.
#[utoipa::path(
    post,
    path = "/createUser",
    request_body = CreateUserRequest,
    params(("X-Request-ID" = Option<String>, Header, description = "Correlation id, echoed back")),
    responses(
        (status = 200, description = "User created", body = CreateUserResponse),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 404, description = "A store could not find the record", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/createUser")]
pub async fn create_user(
    state: web::Data<HttpState>,
    request_id: RequestId,
    payload: web::Payload,
) -> ApiResult<web::Json<CreateUserResponse>> {
    let body = state.validator.read_body(payload).await?;
    let request: CreateUserRequest = state.validator.decode(&body)?;
    let name = state.validator.name(request.name)?;
    let ctx = state.request_context(request_id);

    let user_id = state.users.create_user(&ctx, &name).await?;
    Ok(web::Json(CreateUserResponse {
        user_id: user_id.into(),
    }))
}

/// Rename a user in all three stores.
#[utoipa::path(
    post,
    path = "/updateUser",
    request_body = UpdateUserRequest,
    params(("X-Request-ID" = Option<String>, Header, description = "Correlation id, echoed back")),
    responses(
        (status = 200, description = "User updated", body = UpdateUserResponse),
        (status = 400, description = "Invalid request", body = ErrorEnvelope),
        (status = 404, description = "A store could not find the record", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[post("/updateUser")]
pub async fn update_user(
    state: web::Data<HttpState>,
    request_id: RequestId,
    payload: web::Payload,
) -> ApiResult<web::Json<UpdateUserResponse>> {
    let body = state.validator.read_body(payload).await?;
    let request: UpdateUserRequest = state.validator.decode(&body)?;
    let user_id = state.validator.user_id(request.user_id)?;
    let name = state.validator.name(request.name)?;
    let ctx = state.request_context(request_id);

    state.users.update_user(&ctx, &user_id, &name).await?;
    Ok(web::Json(UpdateUserResponse {}))
}
