//! Error types for the filtering pipeline.
//!
//! - `RequestError`: bad caller input, detected before any network access (400)
//! - `FeedError`: upstream fetch/parse/transform/serialize failures (500)
//! - `AppError`: what handlers return; maps the two above onto HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("missing 'url'")]
    MissingUrl,

    #[error("invalid 'url' {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("missing 'skip' or 're'")]
    MissingFilterSpec,

    #[error("invalid 're': {0}")]
    InvalidFilterSyntax(#[from] regex::Error),
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("fetching {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fetching {url}: upstream responded with HTTP {status}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("parsing feed: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),

    #[error("item {title:?} has no publication date")]
    MissingPublishedDate { title: String },

    #[error("writing rss: {0}")]
    Serialize(String),
}

impl FeedError {
    /// True for failures talking to the upstream host (as opposed to its content).
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::UpstreamStatus { .. })
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Feed(#[from] FeedError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Request(_) => StatusCode::BAD_REQUEST,
            AppError::Feed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Plain-text body: the message itself, nothing else.
        (self.status_code(), self.to_string()).into_response()
    }
}
