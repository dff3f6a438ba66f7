//! Fixed CORS policy: answer every preflight, stamp every response

use axum::{
    body::Body,
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderMap, HeaderValue, Method, Request, StatusCode,
    },
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::debug;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type";

/// CORS layer
#[derive(Clone, Default)]
pub struct CorsLayer;

impl CorsLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for CorsLayer {
    type Service = CorsMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorsMiddleware { inner }
    }
}

/// CORS middleware service
#[derive(Clone)]
pub struct CorsMiddleware<S> {
    inner: S,
}

impl<S> Service<Request<Body>> for CorsMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        // Preflight never reaches the router
        if request.method() == Method::OPTIONS {
            debug!(path = %request.uri().path(), "Answered preflight");
            return Box::pin(async move { Ok(preflight_response()) });
        }

        let future = self.inner.call(request);
        Box::pin(async move {
            let mut response = future.await?;
            apply_cors_headers(response.headers_mut());
            Ok(response)
        })
    }
}

/// Merge the fixed CORS headers into `headers`
pub fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN));
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS));
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS));
}

fn preflight_response() -> Response {
    let mut response = StatusCode::OK.into_response();
    apply_cors_headers(response.headers_mut());
    response
}
