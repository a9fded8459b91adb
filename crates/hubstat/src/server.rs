//! The scrape endpoint.
//!
//! One route, `GET /metrics`, backed by the snapshot cache. The cache
//! is the synchronization point: any number of concurrent scrapes
//! collapse into at most one upstream refresh.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use tracing::warn;

use hubstat_core::{RepoSource, StatsCache};

use crate::render::render_metrics;

const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Build the exporter's router around an owned cache instance.
pub fn router<S: RepoSource + 'static>(cache: Arc<StatsCache<S>>) -> Router {
    Router::new()
        .route("/metrics", get(metrics::<S>))
        .with_state(cache)
}

async fn metrics<S: RepoSource + 'static>(
    State(cache): State<Arc<StatsCache<S>>>,
) -> impl IntoResponse {
    let scrape = cache.get().await;

    if let Some(error) = &scrape.error {
        warn!(%error, "scrape failed; exposing cached snapshot with error sample");
    }

    (
        [(header::CONTENT_TYPE, CONTENT_TYPE)],
        render_metrics(&scrape.stats, scrape.error.is_some()),
    )
}
