//! Request-logging middleware.
//!
//! Logs one line when a request arrives and one when its response is ready.
//! In [`LogMode::Debug`] the arrival line carries a dump of the request line
//! and headers; in [`LogMode::Release`] the dump is replaced by `"hidden"`.

use std::fmt;
use std::str::FromStr;
use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::HttpMessage;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::CONTENT_LENGTH;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::info;

use crate::domain::RequestId;

/// Runtime mode controlling how much request detail is logged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogMode {
    #[default]
    Debug,
    Release,
}

impl LogMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Release => "release",
        }
    }
}

impl fmt::Display for LogMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode `{0}`; expected `debug` or `release`")]
pub struct ParseLogModeError(String);

impl FromStr for LogMode {
    type Err = ParseLogModeError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "release" => Ok(Self::Release),
            _ => Err(ParseLogModeError(raw.to_owned())),
        }
    }
}

/// Request-logging middleware factory.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use tristore::middleware::{LogMode, RequestLogging};
///
/// let app = App::new().wrap(RequestLogging::new(LogMode::Release));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequestLogging {
    mode: LogMode,
}

impl RequestLogging {
    pub fn new(mode: LogMode) -> Self {
        Self { mode }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLogging
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggingService {
            service,
            mode: self.mode,
        }))
    }
}

/// Service wrapper produced by [`RequestLogging`].
pub struct RequestLoggingService<S> {
    service: S,
    mode: LogMode,
}

pub(crate) fn dump_request(req: &ServiceRequest, mode: LogMode) -> String {
    if mode == LogMode::Release {
        return "hidden".to_owned();
    }
    let mut dump = format!("{} {} {:?}", req.method(), req.uri(), req.version());
    for (name, value) in req.headers() {
        let value = value.to_str().unwrap_or("<binary>");
        dump.push_str(&format!("\n{name}: {value}"));
    }
    dump
}

impl<S, B> Service<ServiceRequest> for RequestLoggingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let method = req.method().to_string();
        let path = req.path().to_owned();
        let request_id = req
            .extensions()
            .get::<RequestId>()
            .map(ToString::to_string)
            .unwrap_or_default();
        let content_length = req
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(0);
        info!(
            method = %method,
            path = %path,
            content_length,
            request_id = %request_id,
            request = %dump_request(&req, self.mode),
            "request received"
        );

        let fut = self.service.call(req);
        Box::pin(async move {
            let result = fut.await;
            let status = match &result {
                Ok(res) => res.status().as_u16(),
                Err(err) => err.as_response_error().status_code().as_u16(),
            };
            info!(
                method = %method,
                path = %path,
                status,
                request_id = %request_id,
                took = ?started.elapsed(),
                "request completed"
            );
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpResponse, test as actix_test, web};
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("debug", LogMode::Debug)]
    #[case("Release", LogMode::Release)]
    #[case(" release ", LogMode::Release)]
    fn mode_parses_known_names(#[case] raw: &str, #[case] expected: LogMode) {
        assert_eq!(raw.parse::<LogMode>(), Ok(expected));
    }

    #[test]
    fn mode_rejects_unknown_names() {
        assert!("verbose".parse::<LogMode>().is_err());
    }

    #[test]
    fn release_mode_hides_the_request() {
        let req = actix_test::TestRequest::post()
            .uri("/createUser")
            .insert_header(("X-Secret", "token"))
            .to_srv_request();
        assert_eq!(dump_request(&req, LogMode::Release), "hidden");
    }

    #[test]
    fn debug_mode_dumps_request_line_and_headers() {
        let req = actix_test::TestRequest::post()
            .uri("/createUser")
            .insert_header(("X-Trace", "yes"))
            .to_srv_request();
        let dump = dump_request(&req, LogMode::Debug);
        assert!(dump.starts_with("POST /createUser"));
        assert!(dump.contains("x-trace: yes"));
    }

    #[actix_web::test]
    async fn passes_responses_through() {
        let app = actix_test::init_service(
            App::new()
                .wrap(RequestLogging::new(LogMode::Release))
                .route("/", web::get().to(|| async { HttpResponse::Created().finish() })),
        )
        .await;
        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), actix_web::http::StatusCode::CREATED);
    }
}
