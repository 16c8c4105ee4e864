use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    http::header,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use metrics::counter;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::feed::{render_rss, FeedSource};
use crate::filter::{transform, FilterQuery, FilterRequest};
use crate::metrics::Metrics;
use crate::status::StatusSampler;

const INDEX_HTML: &str = include_str!("../static/index.html");
const RSS_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Everything the handlers need. Nothing in here is mutated by the filter path.
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn FeedSource>,
    pub status: StatusSampler,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(source: Arc<dyn FeedSource>) -> anyhow::Result<Self> {
        Ok(Self {
            source,
            status: StatusSampler::new(),
            metrics: Metrics::init()?,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/status", get(status))
        .route("/metrics", get(metrics_text))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// `/` without a query serves the landing page; with one it filters a feed.
async fn index(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    match query.as_deref() {
        None | Some("") => Html(INDEX_HTML).into_response(),
        Some(raw) => {
            let query = FilterQuery::parse(raw);
            let mode = query.mode_kind();
            let (outcome, response) = match filter_feed(&state, query).await {
                Ok(body) => (
                    "ok",
                    ([(header::CONTENT_TYPE, RSS_CONTENT_TYPE)], body).into_response(),
                ),
                Err(e) => {
                    let outcome = match &e {
                        AppError::Request(_) => {
                            tracing::debug!(error = %e, mode, "rejected filter request");
                            "rejected"
                        }
                        AppError::Feed(_) => {
                            tracing::warn!(error = %e, mode, "filter request failed");
                            "failed"
                        }
                    };
                    (outcome, e.into_response())
                }
            };
            counter!("feed_filter_requests_total", "mode" => mode, "outcome" => outcome)
                .increment(1);
            response
        }
    }
}

/// Validate, fetch, filter, render. The whole document is rendered before
/// anything is sent, so failures never produce a truncated 200.
async fn filter_feed(state: &AppState, query: FilterQuery) -> Result<Vec<u8>, AppError> {
    let FilterRequest { url, mode } = query.into_request()?;

    let source = state.source.fetch(&url).await?;
    let filtered = transform(&source, &mode, chrono::Utc::now())?;
    let body = render_rss(&filtered)?;

    let kept = filtered.items.len();
    let dropped = source.items.len() - kept;
    counter!("feed_filter_items_kept_total").increment(kept as u64);
    counter!("feed_filter_items_dropped_total").increment(dropped as u64);
    tracing::info!(target: "filter", %url, mode = mode.kind(), kept, dropped, "filtered feed");

    Ok(body)
}

async fn status(State(state): State<AppState>) -> String {
    state.status.snapshot().to_string()
}

async fn metrics_text(State(state): State<AppState>) -> String {
    state.metrics.handle.render()
}
