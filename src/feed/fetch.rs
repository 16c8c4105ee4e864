// src/feed/fetch.rs
use std::time::Duration;

use async_trait::async_trait;
use metrics::{counter, histogram};
use reqwest::Client;
use url::Url;

use crate::error::FeedError;
use crate::feed::model::SourceFeed;
use crate::feed::parse::parse_feed;

/// Where feeds come from. The HTTP implementation is the only production one;
/// tests plug in canned feeds.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<SourceFeed, FeedError>;
}

/// Single-attempt HTTP(S) fetch followed by format auto-detection.
#[derive(Clone)]
pub struct HttpFeedSource {
    client: Client,
}

impl HttpFeedSource {
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &Url) -> Result<SourceFeed, FeedError> {
        tracing::debug!(%url, "fetching feed");
        let t0 = std::time::Instant::now();

        let fetch_err = |source: reqwest::Error| {
            counter!("feed_filter_upstream_errors_total", "kind" => "transport").increment(1);
            FeedError::Fetch {
                url: url.to_string(),
                source,
            }
        };

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(fetch_err)?;

        let status = resp.status();
        if !status.is_success() {
            counter!("feed_filter_upstream_errors_total", "kind" => "status").increment(1);
            return Err(FeedError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(fetch_err)?;
        histogram!("feed_filter_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        tracing::debug!(%url, bytes = body.len(), "fetched feed");

        parse_feed(&body)
    }
}
