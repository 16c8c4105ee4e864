// src/filter/query.rs
use url::{form_urlencoded, Url};

use crate::error::RequestError;
use crate::filter::FilterMode;

/// Raw filter parameters as they arrived. `skip` is repeatable.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    pub url: Option<String>,
    pub re: Option<String>,
    pub skip: Vec<String>,
}

impl FilterQuery {
    /// Parse an `application/x-www-form-urlencoded` query string.
    /// Repeated `url`/`re` keep their first value; unknown keys are ignored.
    pub fn parse(raw: &str) -> Self {
        let mut q = FilterQuery::default();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "url" if q.url.is_none() => q.url = Some(value.into_owned()),
                "re" if q.re.is_none() => q.re = Some(value.into_owned()),
                "skip" => q.skip.push(value.into_owned()),
                _ => {}
            }
        }
        q
    }

    /// Which filter these parameters ask for, following the same precedence as
    /// [`FilterMode::from_params`]; `"none"` when neither is given.
    pub fn mode_kind(&self) -> &'static str {
        if self.re.is_some() {
            "regex"
        } else if !self.skip.is_empty() {
            "skip"
        } else {
            "none"
        }
    }

    /// Validate in order: `url` present, `url` usable, filter mode buildable.
    /// Nothing here touches the network.
    pub fn into_request(self) -> Result<FilterRequest, RequestError> {
        let raw_url = self.url.ok_or(RequestError::MissingUrl)?;
        let url = parse_feed_url(&raw_url)?;
        let mode = FilterMode::from_params(self.re.as_deref(), &self.skip)?;
        Ok(FilterRequest { url, mode })
    }
}

/// A validated request: where to fetch and how to filter.
#[derive(Debug, Clone)]
pub struct FilterRequest {
    pub url: Url,
    pub mode: FilterMode,
}

fn parse_feed_url(raw: &str) -> Result<Url, RequestError> {
    let invalid = |reason: String| RequestError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme '{other}'"))),
    }
}
