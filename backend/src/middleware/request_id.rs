//! Correlation-id middleware.
//!
//! Reads `X-Request-ID` from the inbound request (or mints a new identifier),
//! stores it in the request extensions for handlers, runs the rest of the
//! pipeline inside a `request` span carrying the id, and echoes it on the
//! response. Errors raised by inner layers carry the header too.

use std::task::{Context, Poll};

use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::InternalError;
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, error, info_span};

use crate::domain::{REQUEST_ID_HEADER, RequestId};

impl FromRequest for RequestId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    /// Yields the id assigned by [`RequestIdMiddleware`]; outside the
    /// middleware a fresh one is minted.
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let id = req
            .extensions()
            .get::<RequestId>()
            .cloned()
            .unwrap_or_else(RequestId::generate);
        ready(Ok(id))
    }
}

/// Correlation-id middleware factory.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use tristore::middleware::RequestIdMiddleware;
///
/// let app = App::new().wrap(RequestIdMiddleware);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdService { service }))
    }
}

fn echo(headers: &mut HeaderMap, request_id: &RequestId) {
    match HeaderValue::from_str(request_id.as_str()) {
        Ok(value) => {
            headers.insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
        }
        Err(error) => {
            error!(%error, "failed to encode request id header");
        }
    }
}

/// Service wrapper produced by [`RequestIdMiddleware`].
pub struct RequestIdService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestIdService<S>
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
        let inbound = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok());
        let request_id = RequestId::from_header_or_generate(inbound);
        req.extensions_mut().insert(request_id.clone());

        let span = info_span!("request", request_id = %request_id);
        let fut = span.in_scope(|| self.service.call(req));
        Box::pin(
            async move {
                let mut res = match fut.await {
                    Ok(res) => res,
                    Err(err) => {
                        let mut response = err.error_response();
                        echo(response.headers_mut(), &request_id);
                        return Err(InternalError::from_response(err, response).into());
                    }
                };
                echo(res.headers_mut(), &request_id);
                Ok(res)
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    async fn echo_request_id(id: RequestId) -> HttpResponse {
        HttpResponse::Ok().body(id.to_string())
    }

    async fn explode() -> HttpResponse {
        panic!("handler exploded");
    }

    fn header(res: &ServiceResponse<impl actix_web::body::MessageBody>) -> String {
        res.headers()
            .get(REQUEST_ID_HEADER)
            .expect("request id header")
            .to_str()
            .expect("header is ascii")
            .to_owned()
    }

    #[actix_web::test]
    async fn echoes_inbound_request_id() {
        let app = test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .route("/", web::get().to(echo_request_id)),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("X-Request-ID", "abc123"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(header(&res), "abc123");
        let body = test::read_body(res).await;
        assert_eq!(body.as_ref(), b"abc123");
    }

    #[actix_web::test]
    async fn generates_distinct_ids_when_header_absent() {
        let app = test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .route("/", web::get().to(echo_request_id)),
        )
        .await;
        let first = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let second = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;

        let first_id = header(&first);
        let second_id = header(&second);
        assert!(!first_id.is_empty());
        assert_ne!(first_id, second_id);

        let body = test::read_body(first).await;
        assert_eq!(body.as_ref(), first_id.as_bytes());
    }

    #[actix_web::test]
    async fn replaces_unusable_inbound_ids() {
        let app = test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .route("/", web::get().to(echo_request_id)),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("X-Request-ID", "   "))
            .to_request();
        let res = test::call_service(&app, req).await;

        let id = header(&res);
        assert!(!id.trim().is_empty());
    }

    #[actix_web::test]
    async fn echoes_id_on_error_responses() {
        let app = test::init_service(App::new().wrap(RequestIdMiddleware).route(
            "/",
            web::get().to(|| async {
                Err::<HttpResponse, _>(crate::domain::Error::invalid_request("bad"))
            }),
        ))
        .await;
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("X-Request-ID", "err-1"))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), actix_web::http::StatusCode::BAD_REQUEST);
        assert_eq!(header(&res), "err-1");
    }

    #[actix_web::test]
    async fn echoes_id_when_inner_layer_fails() {
        let app = test::init_service(
            App::new()
                .wrap(crate::middleware::Recovery)
                .wrap(RequestIdMiddleware)
                .route("/", web::get().to(explode)),
        )
        .await;
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("X-Request-ID", "boom-1"))
            .to_request();

        let Err(err) = app.call(req).await else {
            panic!("panic should surface as an error");
        };
        let res = err.error_response();
        assert_eq!(res.status(), actix_web::http::StatusCode::INTERNAL_SERVER_ERROR);
        let id = res
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok());
        assert_eq!(id, Some("boom-1"));
    }
}
