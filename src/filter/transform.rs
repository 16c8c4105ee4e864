// src/filter/transform.rs
use chrono::{DateTime, Utc};

use crate::error::FeedError;
use crate::feed::model::{OutputFeed, OutputItem, SourceFeed};
use crate::filter::FilterMode;

/// Keep the items `mode` accepts, in source order, and carry feed metadata over.
///
/// `now` becomes the output feed's creation time. A kept item without a
/// publication date aborts the whole transform; dropped items are never checked.
pub fn transform(
    source: &SourceFeed,
    mode: &FilterMode,
    now: DateTime<Utc>,
) -> Result<OutputFeed, FeedError> {
    let mut items = Vec::with_capacity(source.items.len());
    for it in source.items.iter().filter(|it| mode.keeps(&it.title)) {
        let created = it.published.ok_or_else(|| FeedError::MissingPublishedDate {
            title: it.title.clone(),
        })?;
        items.push(OutputItem {
            title: it.title.clone(),
            link: it.link.clone(),
            description: it.description.clone(),
            author: it.author.clone(),
            created,
        });
    }

    Ok(OutputFeed {
        title: source.title.clone(),
        link: source.link.clone(),
        description: source.description.clone(),
        author: source.author.clone(),
        created: now,
        items,
    })
}
