// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod filter;
pub mod metrics;
pub mod status;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;

pub use crate::api::{router, AppState};
pub use crate::config::ServerConfig;
pub use crate::error::{AppError, FeedError, RequestError};
pub use crate::filter::FilterMode;

/// Build the full application router from configuration, with the real HTTP fetcher.
pub fn app(cfg: &ServerConfig) -> anyhow::Result<Router> {
    let source = feed::HttpFeedSource::new(&cfg.user_agent, cfg.fetch_timeout())
        .context("building upstream http client")?;
    let state = AppState::new(Arc::new(source))?;
    Ok(router(state))
}
