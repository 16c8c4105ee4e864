// src/feed/model.rs
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    pub name: String,
    pub email: Option<String>,
}

impl Author {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.as_deref().unwrap_or_default().is_empty()
    }

    /// RSS rendering: `email (Name)`, the email alone, or the name alone.
    pub fn to_rss(&self) -> String {
        match (self.email.as_deref().filter(|e| !e.is_empty()), self.name.as_str()) {
            (Some(email), "") => email.to_string(),
            (Some(email), name) => format!("{email} ({name})"),
            (None, name) => name.to_string(),
        }
    }
}

/// A parsed upstream feed, normalized across RSS and Atom.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceFeed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub author: Option<Author>,
    pub items: Vec<SourceItem>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub author: Option<Author>,
    pub published: Option<DateTime<Utc>>,
}

/// The filtered feed, ready for RSS serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputFeed {
    pub title: String,
    pub link: String,
    pub description: String,
    pub author: Option<Author>,
    pub created: DateTime<Utc>,
    pub items: Vec<OutputItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputItem {
    pub title: String,
    pub link: String,
    pub description: String,
    pub author: Option<Author>,
    pub created: DateTime<Utc>,
}
