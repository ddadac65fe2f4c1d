//! Cross-cutting HTTP middleware
//!
//! The chain composed in the router is a fixed contract: logging and
//! metrics run outermost, then panic recovery, then authentication
//! (see `auth::middleware`). Stages here never mutate the call.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::time::Instant;
use tracing::error;

use crate::domain::ServiceError;

/// Middleware that records HTTP request metrics:
///
/// - **`http_requests_total`** — counter with labels `method`, `path`, `status`
/// - **`http_request_duration_seconds`** — histogram with labels `method`, `path`
pub async fn http_metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();

    metrics::counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status)
        .increment(1);
    metrics::histogram!("http_request_duration_seconds", "method" => method, "path" => path)
        .record(duration);

    response
}

/// Middleware that converts a handler panic into an `InternalError`
/// response instead of tearing down the connection task. The panic
/// payload is logged here and kept out of the response body.
pub async fn recovery_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            let detail = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            error!("handler for {} {} panicked: {}", method, path, detail);
            ServiceError::Internal(detail).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{middleware, Router};
    use tower::ServiceExt;

    async fn panicking() -> &'static str {
        panic!("boom");
    }

    async fn healthy() -> &'static str {
        "ok"
    }

    fn app() -> Router {
        Router::new()
            .route("/panic", get(panicking))
            .route("/ok", get(healthy))
            .layer(middleware::from_fn(recovery_middleware))
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error_response() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/panic")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error_kind"], "INTERNAL");
        // The panic payload stays out of the response
        assert!(!body["error"].as_str().unwrap().contains("boom"));
    }

    #[tokio::test]
    async fn test_requests_after_a_panic_still_served() {
        let app = app();
        let _ = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/panic")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let response = app
            .oneshot(Request::builder().uri("/ok").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
