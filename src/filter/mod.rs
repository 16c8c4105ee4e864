// src/filter/mod.rs
pub mod query;
pub mod transform;

use std::collections::HashSet;

use regex::Regex;

use crate::error::RequestError;

pub use query::{FilterQuery, FilterRequest};
pub use transform::transform;

/// The one item-acceptance rule active for a request.
#[derive(Debug, Clone)]
pub enum FilterMode {
    /// Keep items whose title matches anywhere.
    Regex(Regex),
    /// Drop items whose title contains one of these exact whitespace-delimited tokens.
    SkipWords(HashSet<String>),
}

impl FilterMode {
    /// Pick the mode from request parameters. `re` takes precedence over `skip`.
    pub fn from_params(re: Option<&str>, skip: &[String]) -> Result<Self, RequestError> {
        if let Some(pattern) = re {
            return Ok(FilterMode::Regex(Regex::new(pattern)?));
        }
        if !skip.is_empty() {
            return Ok(FilterMode::SkipWords(skip.iter().cloned().collect()));
        }
        Err(RequestError::MissingFilterSpec)
    }

    pub fn keeps(&self, title: &str) -> bool {
        match self {
            FilterMode::Regex(re) => re.is_match(title),
            FilterMode::SkipWords(words) => !title
                .split_whitespace()
                .any(|token| words.contains(token)),
        }
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FilterMode::Regex(_) => "regex",
            FilterMode::SkipWords(_) => "skip",
        }
    }
}
