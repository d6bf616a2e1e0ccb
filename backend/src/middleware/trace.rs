//! Request tracing: one trace id, one span and one completion event per
//! request.
//!
//! The id lives in task-local storage while the request is served, so any
//! [`DomainError`](crate::domain::Error) built on the way captures it. It is
//! also returned in the `trace-id` response header; clients quote it when
//! reporting a failure and operators grep the logs for it.

use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, debug, error, info, info_span};

use crate::domain::{TRACE_ID_HEADER, TraceId};

/// Probe paths logged at debug level so they do not drown real traffic.
const QUIET_PREFIX: &str = "/health/";

/// Middleware factory assigning a trace id to every request.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use recipe_backend::Trace;
///
/// let app = App::new().wrap(Trace);
/// ```
#[derive(Clone)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { service }))
    }
}

/// Service produced by [`Trace`]; scopes each request to a fresh trace id.
pub struct TraceMiddleware<S> {
    service: S,
}

fn stamp_header<B>(res: &mut ServiceResponse<B>, trace_id: TraceId) {
    match HeaderValue::from_str(&trace_id.to_string()) {
        Ok(value) => {
            res.response_mut()
                .headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        Err(error) => error!(%error, "trace id is not a valid header value"),
    }
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
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
        let trace_id = TraceId::generate();
        let quiet = req.path().starts_with(QUIET_PREFIX);
        let span = info_span!(
            "request",
            trace_id = %trace_id,
            method = %req.method(),
            path = %req.path()
        );
        let started = Instant::now();
        let fut = TraceId::scope(trace_id, self.service.call(req));
        Box::pin(
            async move {
                let mut res = fut.await?;
                stamp_header(&mut res, trace_id);
                let status = res.status().as_u16();
                let elapsed_ms = started.elapsed().as_millis();
                if quiet {
                    debug!(status, elapsed_ms, "request completed");
                } else {
                    info!(status, elapsed_ms, "request completed");
                }
                Ok(res)
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    use super::*;
    use crate::domain::{ApiResult, Error as DomainError};

    fn header_trace_id<B>(res: &ServiceResponse<B>) -> String {
        res.headers()
            .get(TRACE_ID_HEADER)
            .expect("trace id header")
            .to_str()
            .expect("header is ascii")
            .to_owned()
    }

    #[rstest]
    #[actix_web::test]
    async fn handler_sees_the_header_trace_id() {
        let app = test::init_service(App::new().wrap(Trace).route(
            "/recipes",
            web::get().to(|| async move {
                let id = TraceId::current().expect("trace id in scope");
                HttpResponse::Ok().body(id.to_string())
            }),
        ))
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/recipes").to_request()).await;
        let trace_id = header_trace_id(&res);

        assert_eq!(test::read_body(res).await, trace_id);
    }

    #[rstest]
    #[actix_web::test]
    async fn error_envelope_carries_the_header_trace_id() {
        let app = test::init_service(App::new().wrap(Trace).route(
            "/recipes/9",
            web::get().to(|| async move {
                ApiResult::<HttpResponse>::Err(DomainError::not_found("recipe 9 not found"))
            }),
        ))
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/recipes/9").to_request())
                .await;
        let trace_id = header_trace_id(&res);
        let body: DomainError = test::read_body_json(res).await;

        assert_eq!(body.trace_id(), Some(trace_id.as_str()));
    }

    #[rstest]
    #[case("/health/live")]
    #[case("/unrouted")]
    #[actix_web::test]
    async fn every_response_gets_a_fresh_trace_id(#[case] uri: &str) {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route(
                    "/health/live",
                    web::get().to(|| async { HttpResponse::Ok().finish() }),
                ),
        )
        .await;

        let first = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let second = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;

        let first_id: TraceId = header_trace_id(&first).parse().expect("uuid header");
        assert_ne!(header_trace_id(&first), header_trace_id(&second));
        assert_eq!(first_id.to_string(), header_trace_id(&first));
    }
}
