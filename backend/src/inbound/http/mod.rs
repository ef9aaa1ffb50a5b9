//! HTTP inbound adapter exposing the user write endpoints and health checks.

pub mod error;
pub mod health;
pub mod state;
pub mod users;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register the user endpoints on an application or scope.
///
/// Callers supply `web::Data<HttpState>` separately.
pub fn configure_users(cfg: &mut web::ServiceConfig) {
    cfg.service(users::create_user).service(users::update_user);
}

/// Register the health checks. Callers supply `web::Data<HealthState>`.
pub fn configure_health(cfg: &mut web::ServiceConfig) {
    cfg.service(health::ready).service(health::live);
}
