//! RSS item extraction and HTML stripping.

use chrono::{DateTime, FixedOffset, Utc};
use quick_xml::events::Event;
use quick_xml::Reader;

use newsdigest_core::NewsItem;

use crate::error::FeedError;

/// Parse an RSS document into [`NewsItem`]s, in document order.
///
/// Extracts `<item>` elements, pulling `<title>`, `<link>`, `<description>`,
/// and `<pubDate>`. Items without a title or link are skipped. A `pubDate`
/// that is missing or not RFC 2822 falls back to the current instant.
pub(crate) fn parse_rss_feed(xml: &str) -> Result<Vec<NewsItem>, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut in_item = false;
    let mut in_description = false;
    let mut current_tag = String::new();
    let mut title = String::new();
    let mut link = String::new();
    let mut description = String::new();
    let mut pub_date = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("").to_string();
                if name == "item" {
                    in_item = true;
                    in_description = false;
                    title.clear();
                    link.clear();
                    description.clear();
                    pub_date.clear();
                } else if name == "description" && in_item {
                    in_description = true;
                }
                current_tag = name;
            }
            Ok(Event::End(e)) => {
                let name_buf = e.name().as_ref().to_vec();
                let name = std::str::from_utf8(&name_buf).unwrap_or("");
                if name == "description" {
                    in_description = false;
                }
                if name == "item" && in_item {
                    in_item = false;
                    if title.is_empty() || link.is_empty() {
                        tracing::warn!(
                            title = %title,
                            "skipping RSS item without title or link"
                        );
                        continue;
                    }
                    items.push(NewsItem::new(
                        title.clone(),
                        link.clone(),
                        parse_pub_date(&pub_date),
                        strip_html(&description),
                    ));
                }
                current_tag.clear();
            }
            Ok(Event::Text(e)) => {
                if in_item {
                    let text = match e.unescape() {
                        Ok(text) => text.into_owned(),
                        Err(err) => {
                            tracing::warn!(
                                tag = %current_tag,
                                error = %err,
                                "unescapable RSS text; dropping it"
                            );
                            String::new()
                        }
                    };
                    if in_description {
                        if !description.is_empty() {
                            description.push(' ');
                        }
                        description.push_str(&text);
                    } else {
                        match current_tag.as_str() {
                            "title" => title = text,
                            "link" => link = text,
                            "pubDate" => pub_date = text,
                            _ => {}
                        }
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if in_item {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    if in_description {
                        description.push_str(&text);
                    } else if current_tag == "title" {
                        title = text;
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Xml(e)),
            _ => {}
        }
    }

    Ok(items)
}

fn parse_pub_date(raw: &str) -> DateTime<FixedOffset> {
    match DateTime::parse_from_rfc2822(raw.trim()) {
        Ok(ts) => ts,
        Err(e) => {
            tracing::warn!(
                pub_date = %raw,
                error = %e,
                "unparseable pubDate; using current time"
            );
            Utc::now().fixed_offset()
        }
    }
}

/// Strip HTML tags and `&nbsp;` entities from a string and normalize whitespace.
pub(crate) fn strip_html(html: &str) -> String {
    let html = html.replace("&nbsp;", " ");
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
