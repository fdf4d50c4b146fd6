//! # waitlist-api
//!
//! Axum HTTP service for the OPTI-AVIS waitlist.
//!
//! ## Routes
//!
//! - `POST /api/waitlist`, `GET /api/waitlist?uniqueId=`: see [`routes::waitlist`].
//! - `GET /health/liveness`, `GET /health/readiness`: probes.
//! - `GET /metrics`: Prometheus text format, when enabled.
//! - `GET /openapi.json`: generated API document.
//!
//! ## Backends
//!
//! The [`gateway::SubmissionGateway`] talks to a
//! [`waitlist_store::WaitlistStore`]: direct Postgres ([`db::PgStore`]),
//! the hosted REST table, or the in-memory store.

pub mod db;
pub mod error;
pub mod extractors;
pub mod gateway;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Largest accepted request body. A draft is a few kilobytes at most.
const BODY_LIMIT: usize = 64 * 1024;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let metrics_on = state.config.metrics_enabled;

    let api = Router::new()
        .merge(routes::waitlist::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(BODY_LIMIT));

    let mut probes = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));
    if metrics_on {
        probes = probes.route("/metrics", get(prometheus_metrics));
    }

    let mut router = Router::new().merge(probes).merge(api);
    if metrics_on {
        router = router
            .route_layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(state.metrics.clone()));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}

async fn liveness() -> &'static str {
    "ok"
}

async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let store = state.store();
    match store.health_check().await {
        Ok(()) => (StatusCode::OK, "ready").into_response(),
        Err(e) => {
            tracing::warn!(backend = store.backend(), error = %e, "readiness probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("{} store unavailable", store.backend()),
            )
                .into_response()
        }
    }
}
