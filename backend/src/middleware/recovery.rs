//! Panic recovery middleware.
//!
//! A panic raised while the wrapped endpoint runs is caught, logged with a
//! backtrace and surfaced as the classified internal error. The worker keeps
//! serving subsequent requests.
//!
//! The request is handed to the inner service untouched: routing needs sole
//! ownership of it, so only the path is kept for the log line. The error is
//! rendered by the outer layers, which keeps the correlation header on it.

use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::{self, AssertUnwindSafe};
use std::task::{Context, Poll};

use actix_web::Error as ActixError;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::FutureExt as _;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::error;

use crate::domain::Error;

/// Panic recovery middleware factory.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use tristore::middleware::Recovery;
///
/// let app = App::new().wrap(Recovery);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Recovery;

impl<S, B> Transform<S, ServiceRequest> for Recovery
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = RecoveryService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RecoveryService { service }))
    }
}

/// Service wrapper produced by [`Recovery`].
pub struct RecoveryService<S> {
    service: S,
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&'static str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

fn recovered(path: &str, payload: Box<dyn Any + Send>) -> ActixError {
    let backtrace = Backtrace::force_capture();
    error!(
        panic = panic_message(payload.as_ref()),
        path,
        %backtrace,
        "recovered from panic in endpoint"
    );
    Error::internal("endpoint panicked").into()
}

impl<S, B> Service<ServiceRequest> for RecoveryService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let path = req.path().to_owned();
        match panic::catch_unwind(AssertUnwindSafe(|| self.service.call(req))) {
            Ok(fut) => Box::pin(async move {
                match AssertUnwindSafe(fut).catch_unwind().await {
                    Ok(result) => result,
                    Err(payload) => Err(recovered(&path, payload)),
                }
            }),
            Err(payload) => Box::pin(ready(Err(recovered(&path, payload)))),
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test, web};
    use serde_json::Value;

    use super::*;

    async fn boom() -> HttpResponse {
        panic!("handler exploded");
    }

    async fn fine() -> HttpResponse {
        HttpResponse::Ok().body("still serving")
    }

    fn routed_app() -> App<
        impl actix_web::dev::ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl actix_web::body::MessageBody + 'static>,
            Error = ActixError,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(Recovery)
            .route("/boom", web::get().to(boom))
            .route("/fine", web::get().to(fine))
    }

    #[actix_web::test]
    async fn routes_requests_that_do_not_panic() {
        let app = actix_test::init_service(routed_app()).await;

        let req = actix_test::TestRequest::get().uri("/fine").to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = actix_test::read_body(res).await;
        assert_eq!(body.as_ref(), b"still serving");

        let req = actix_test::TestRequest::get().uri("/absent").to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn panicking_endpoint_yields_classified_500() {
        let app = actix_test::init_service(routed_app()).await;

        let Err(err) = app
            .call(actix_test::TestRequest::get().uri("/boom").to_request())
            .await
        else {
            panic!("panic should surface as an error");
        };
        let res = err.error_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = actix_web::body::to_bytes(res.into_body())
            .await
            .expect("error body");
        let body: Value = serde_json::from_slice(&bytes).expect("JSON envelope");
        assert_eq!(body["error"]["code"], 60901);
        assert_eq!(body["error"]["message"], "internal server error");

        let req = actix_test::TestRequest::get().uri("/fine").to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[test]
    fn panic_message_reads_common_payloads() {
        let borrowed: Box<dyn Any + Send> = Box::new("static message");
        let owned: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        let other: Box<dyn Any + Send> = Box::new(42_u8);

        assert_eq!(panic_message(borrowed.as_ref()), "static message");
        assert_eq!(panic_message(owned.as_ref()), "owned message");
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }
}
