//! Prometheus scrape endpoint
//!
//! Renders the global `metrics-exporter-prometheus` recorder into
//! Prometheus text format. The handle is installed once at startup and
//! shared as router state.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// `GET /metrics` (no auth)
pub async fn prometheus_metrics(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        handle.render(),
    )
}
