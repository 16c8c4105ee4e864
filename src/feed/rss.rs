// src/feed/rss.rs
use std::io::Write;

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::FeedError;
use crate::feed::model::{OutputFeed, OutputItem};

fn xml_err<E: std::fmt::Display>(e: E) -> FeedError {
    FeedError::Serialize(e.to_string())
}

/// Write `feed` as an RSS 2.0 document. Text is escaped by the writer.
pub fn write_rss<W: Write>(feed: &OutputFeed, out: W) -> Result<(), FeedError> {
    let mut w = Writer::new_with_indent(out, b' ', 2);

    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    w.write_event(Event::Start(rss)).map_err(xml_err)?;
    w.write_event(Event::Start(BytesStart::new("channel")))
        .map_err(xml_err)?;

    text_element(&mut w, "title", &feed.title)?;
    text_element(&mut w, "link", &feed.link)?;
    text_element(&mut w, "description", &feed.description)?;
    if let Some(author) = feed.author.as_ref().filter(|a| !a.is_empty()) {
        text_element(&mut w, "managingEditor", &author.to_rss())?;
    }
    text_element(&mut w, "pubDate", &rfc2822(&feed.created))?;

    for item in &feed.items {
        write_item(&mut w, item)?;
    }

    w.write_event(Event::End(BytesEnd::new("channel")))
        .map_err(xml_err)?;
    w.write_event(Event::End(BytesEnd::new("rss")))
        .map_err(xml_err)?;
    w.into_inner().flush().map_err(xml_err)
}

/// Convenience for handlers and tests: render into an owned buffer.
pub fn render_rss(feed: &OutputFeed) -> Result<Vec<u8>, FeedError> {
    let mut buf = Vec::with_capacity(1024 + feed.items.len() * 512);
    write_rss(feed, &mut buf)?;
    Ok(buf)
}

fn write_item<W: Write>(w: &mut Writer<W>, item: &OutputItem) -> Result<(), FeedError> {
    w.write_event(Event::Start(BytesStart::new("item")))
        .map_err(xml_err)?;
    text_element(w, "title", &item.title)?;
    if !item.link.is_empty() {
        text_element(w, "link", &item.link)?;
    }
    text_element(w, "description", &item.description)?;
    if let Some(author) = item.author.as_ref().filter(|a| !a.is_empty()) {
        text_element(w, "author", &author.to_rss())?;
    }
    text_element(w, "pubDate", &rfc2822(&item.created))?;
    w.write_event(Event::End(BytesEnd::new("item")))
        .map_err(xml_err)?;
    Ok(())
}

fn text_element<W: Write>(w: &mut Writer<W>, name: &str, text: &str) -> Result<(), FeedError> {
    w.write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_err)?;
    w.write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_err)?;
    w.write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_err)?;
    Ok(())
}

/// RFC 822 date with a two-digit day and numeric zone, e.g. `Tue, 01 Jul 2025 08:00:00 +0000`.
fn rfc2822(ts: &DateTime<Utc>) -> String {
    ts.format("%a, %d %b %Y %H:%M:%S %z").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::model::Author;
    use chrono::TimeZone;

    fn sample() -> OutputFeed {
        OutputFeed {
            title: "Tom & Jerry <news>".into(),
            link: "https://example.com/?a=1&b=2".into(),
            description: "quotes \"here\"".into(),
            author: None,
            created: Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap(),
            items: vec![OutputItem {
                title: "A < B".into(),
                link: "https://example.com/a".into(),
                description: "<p>html</p>".into(),
                author: Some(Author {
                    name: "Jane".into(),
                    email: Some("jane@example.com".into()),
                }),
                created: Utc.with_ymd_and_hms(2025, 6, 30, 8, 15, 0).unwrap(),
            }],
        }
    }

    #[test]
    fn escapes_text_and_emits_required_elements() {
        let xml = String::from_utf8(render_rss(&sample()).unwrap()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<rss version=\"2.0\">"));
        assert!(xml.contains("<title>Tom &amp; Jerry &lt;news&gt;</title>"));
        assert!(xml.contains("<title>A &lt; B</title>"));
        assert!(xml.contains("<description>&lt;p&gt;html&lt;/p&gt;</description>"));
        assert!(xml.contains("<author>jane@example.com (Jane)</author>"));
        assert!(xml.contains("<pubDate>Mon, 30 Jun 2025 08:15:00 +0000</pubDate>"));
        assert!(!xml.contains("managingEditor"));
    }

    #[test]
    fn item_without_author_omits_element() {
        let mut feed = sample();
        feed.items[0].author = None;
        let xml = String::from_utf8(render_rss(&feed).unwrap()).unwrap();
        assert!(!xml.contains("<author>"));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_errors_are_propagated() {
        let err = write_rss(&sample(), FailingWriter).unwrap_err();
        assert!(matches!(err, FeedError::Serialize(_)), "{err:?}");
    }
}
