// src/feed/mod.rs
pub mod fetch;
pub mod model;
pub mod parse;
pub mod rss;

pub use fetch::{FeedSource, HttpFeedSource};
pub use model::{Author, OutputFeed, OutputItem, SourceFeed, SourceItem};
pub use parse::parse_feed;
pub use rss::{render_rss, write_rss};
