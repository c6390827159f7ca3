//! Pattern-based extraction of RSS `<item>` entries.
//!
//! This is not an XML parser. Each entry is located by its `<item>` wrapper
//! and every field is pulled independently with a first-match pattern, so a
//! missing or mangled field degrades to an empty value instead of failing
//! the entry or the feed.

use crate::model::FeedItem;
use crate::normalize::{clean_text, parse_pub_date, strip_cdata};
use regex::Regex;
use std::sync::LazyLock;

static ITEM_RE: LazyLock<Regex> = LazyLock::new(|| field_re(r"<item>(.*?)</item>"));
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| field_re(r"<title>(.*?)</title>"));
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| field_re(r"<link>(.*?)</link>"));
static PUB_DATE_RE: LazyLock<Regex> = LazyLock::new(|| field_re(r"<pubDate>(.*?)</pubDate>"));
static SOURCE_RE: LazyLock<Regex> = LazyLock::new(|| field_re(r"<source[^>]*>(.*?)</source>"));

// `(?s)` lets `.` cross newlines inside multi-line entries.
fn field_re(pattern: &str) -> Regex {
    Regex::new(&format!("(?s){pattern}")).expect("static feed pattern compiles")
}

fn first_capture<'a>(re: &Regex, segment: &'a str) -> &'a str {
    re.captures(segment)
        .and_then(|c| c.get(1))
        .map_or("", |m| m.as_str())
}

/// Extract every `<item>` of `xml`, in document order. Never fails; text
/// without any complete `<item>` yields an empty list.
///
/// ```
/// use pulse_feed::parse_feed;
///
/// let items = parse_feed("<item><title>Hi &amp; bye</title></item><item></item>");
/// assert_eq!(items.len(), 2);
/// assert_eq!(items[0].title, "Hi & bye");
/// assert!(items[1].title.is_empty());
/// ```
pub fn parse_feed(xml: &str) -> Vec<FeedItem> {
    ITEM_RE
        .captures_iter(xml)
        .filter_map(|c| c.get(1))
        .map(|m| parse_item(m.as_str()))
        .collect()
}

fn parse_item(segment: &str) -> FeedItem {
    FeedItem {
        title: clean_text(first_capture(&TITLE_RE, segment)),
        link: strip_cdata(first_capture(&LINK_RE, segment)),
        published_at: parse_pub_date(first_capture(&PUB_DATE_RE, segment)),
        source_name: clean_text(first_capture(&SOURCE_RE, segment)),
    }
}
