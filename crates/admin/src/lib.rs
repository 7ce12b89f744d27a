//! Catalog Sync Admin library.
//!
//! Operators log in, browse the supplier catalog by category and
//! subcategory, inspect product records and push them to Shopify one at a
//! time or in batches. A second page shows the daily changed-products
//! report.
//!
//! The panel holds no database of its own. Everything it shows comes from
//! the catalog, report and login backends; per-operator view state lives in
//! memory next to the session.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod report;
pub mod routes;
pub mod state;
pub mod submit;

use axum::{Router, routing::get};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::create_session_layer;
use crate::state::AppState;

/// Build the full application router.
///
/// The Sentry layers are outermost so they cover the whole request.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(session_layer)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Backends are not contacted.
async fn health() -> &'static str {
    "ok"
}
