//! LINE message payloads: the flex carousel digest and the plain-text error report.

use chrono::{DateTime, FixedOffset};
use serde_json::{json, Value};

use newsdigest_core::NewsItem;

/// LINE caps a carousel at this many bubbles.
pub const MAX_BUBBLES: usize = 10;

const TITLE_MAX_CHARS: usize = 60;
const TEXT_MAX_CHARS: usize = 150;
/// LINE rejects flex text components with empty `text`.
const EMPTY_TEXT_PLACEHOLDER: &str = "-";

/// Build the flex carousel digest for `items`.
///
/// The alt text counts every item, but only the first [`MAX_BUBBLES`] get a bubble.
#[must_use]
pub fn digest_message(items: &[NewsItem], label: &str, zone: FixedOffset) -> Value {
    let bubbles: Vec<Value> = items
        .iter()
        .take(MAX_BUBBLES)
        .enumerate()
        .map(|(i, item)| bubble(item, i + 1, zone))
        .collect();

    json!({
        "type": "flex",
        "altText": format!("{label}: {} new articles", items.len()),
        "contents": {
            "type": "carousel",
            "contents": bubbles,
        }
    })
}

/// Plain-text error report.
#[must_use]
pub fn error_message(message: &str) -> Value {
    json!({
        "type": "text",
        "text": format!("❌ An error occurred\n\n{message}"),
    })
}

fn bubble(item: &NewsItem, index: usize, zone: FixedOffset) -> Value {
    let body_text = match item.display_text().trim() {
        "" => EMPTY_TEXT_PLACEHOLDER,
        text => text,
    };

    json!({
        "type": "bubble",
        "header": {
            "type": "box",
            "layout": "vertical",
            "contents": [
                { "type": "text", "text": format!("📰 News #{index}"), "size": "sm", "color": "#1DB446" }
            ]
        },
        "body": {
            "type": "box",
            "layout": "vertical",
            "contents": [
                {
                    "type": "text",
                    "text": truncate_chars(&item.title, TITLE_MAX_CHARS),
                    "size": "lg",
                    "weight": "bold",
                    "wrap": true
                },
                {
                    "type": "box",
                    "layout": "vertical",
                    "margin": "md",
                    "spacing": "sm",
                    "contents": [
                        {
                            "type": "text",
                            "text": truncate_chars(body_text, TEXT_MAX_CHARS),
                            "size": "sm",
                            "color": "#666666",
                            "wrap": true
                        },
                        {
                            "type": "text",
                            "text": format_published(&item.published_at, zone),
                            "size": "xs",
                            "color": "#999999",
                            "margin": "md"
                        }
                    ]
                }
            ]
        },
        "footer": {
            "type": "box",
            "layout": "vertical",
            "spacing": "sm",
            "contents": [
                {
                    "type": "button",
                    "style": "primary",
                    "action": { "type": "uri", "label": "Read article", "uri": item.url }
                }
            ]
        }
    })
}

/// Keep at most `max` characters, appending `...` when anything was cut.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

/// Render `ts` in the reference zone, e.g. `2025-01-15 14:30 +09:00`.
pub(crate) fn format_published(ts: &DateTime<FixedOffset>, zone: FixedOffset) -> String {
    ts.with_timezone(&zone).format("%Y-%m-%d %H:%M %:z").to_string()
}
