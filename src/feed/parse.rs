// src/feed/parse.rs
//
// Normalizes whatever feed-rs understands (RSS 0.9x/1.0/2.0, Atom, JSON Feed)
// into a SourceFeed.

use feed_rs::model::{Entry, Feed, FeedType, Link, Person, Text};
use metrics::{counter, histogram};
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::error::FeedError;
use crate::feed::model::{Author, SourceFeed, SourceItem};

/// Parse a raw feed document.
pub fn parse_feed(body: &[u8]) -> Result<SourceFeed, FeedError> {
    let t0 = std::time::Instant::now();
    let feed = feed_rs::parser::parse(body)?;
    let out = normalize_feed(feed);

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("feed_filter_parse_ms").record(ms);
    counter!("feed_filter_items_parsed_total").increment(out.items.len() as u64);
    tracing::debug!(items = out.items.len(), title = %out.title, "parsed feed");
    Ok(out)
}

fn normalize_feed(feed: Feed) -> SourceFeed {
    let rss = matches!(
        feed.feed_type,
        FeedType::RSS0 | FeedType::RSS1 | FeedType::RSS2
    );
    let author = feed
        .authors
        .first()
        .or_else(|| feed.contributors.first())
        .and_then(|p| normalize_person(p, rss));

    SourceFeed {
        title: text_or_empty(feed.title),
        link: primary_link(&feed.links),
        description: text_or_empty(feed.description),
        author,
        items: feed
            .entries
            .into_iter()
            .map(|e| normalize_entry(e, rss))
            .collect(),
    }
}

fn normalize_entry(entry: Entry, rss: bool) -> SourceItem {
    let description = match entry.summary {
        Some(summary) => summary.content,
        None => entry.content.and_then(|c| c.body).unwrap_or_default(),
    };

    SourceItem {
        title: text_or_empty(entry.title),
        link: primary_link(&entry.links),
        description,
        author: entry.authors.first().and_then(|p| normalize_person(p, rss)),
        // Atom entries often carry only <updated>.
        published: entry.published.or(entry.updated),
    }
}

fn text_or_empty(t: Option<Text>) -> String {
    t.map(|t| t.content).unwrap_or_default()
}

/// First link without `rel` or with `rel="alternate"`, else the first link at all.
fn primary_link(links: &[Link]) -> String {
    links
        .iter()
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| links.first())
        .map(|l| l.href.clone())
        .unwrap_or_default()
}

/// Element names the parser may put in `name` when an RSS contact element only
/// carried a free-form address.
const RSS_CONTACT_ROLES: [&str; 3] = ["author", "managingEditor", "webMaster"];

/// Atom and JSON Feed persons are structured and kept as given. RSS has a
/// single free-form author string, conventionally `email (Name)`; depending on
/// the element it arrives either as the name or as the email.
fn normalize_person(p: &Person, rss: bool) -> Option<Author> {
    let name = p.name.trim();
    let email = p.email.as_deref().map(str::trim).filter(|e| !e.is_empty());

    if !rss {
        let author = Author {
            name: name.to_string(),
            email: email.map(str::to_string),
        };
        return (!author.is_empty()).then_some(author);
    }

    let author = match email {
        Some(raw) => {
            let split = split_rss_author(raw);
            let combined = split.email.is_some() && !split.name.is_empty();
            if combined || name.is_empty() || RSS_CONTACT_ROLES.contains(&name) {
                split
            } else {
                Author {
                    name: name.to_string(),
                    email: Some(raw.to_string()),
                }
            }
        }
        None => split_rss_author(name),
    };

    (!author.is_empty()).then_some(author)
}

fn split_rss_author(raw: &str) -> Author {
    static RE_EMAIL_NAME: OnceCell<Regex> = OnceCell::new();
    let re = RE_EMAIL_NAME.get_or_init(|| {
        Regex::new(r"^(\S+@\S+)\s+\((.*)\)$").expect("static author regex compiles")
    });

    if let Some(caps) = re.captures(raw) {
        return Author {
            name: caps[2].trim().to_string(),
            email: Some(caps[1].to_string()),
        };
    }
    if raw.contains('@') && !raw.contains(char::is_whitespace) {
        return Author {
            name: String::new(),
            email: Some(raw.to_string()),
        };
    }
    Author {
        name: raw.to_string(),
        email: None,
    }
}
