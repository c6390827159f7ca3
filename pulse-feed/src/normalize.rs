//! Text and date clean-up applied to every extracted field.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// `&amp;` must stay first: it is decoded exactly once, before the others.
const ENTITIES: [(&str, &str); 5] = [
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
];

/// Remove every CDATA open/close delimiter, keeping the wrapped text.
pub fn strip_cdata(raw: &str) -> String {
    raw.replace(CDATA_OPEN, "").replace(CDATA_CLOSE, "")
}

/// Decode the five entities feeds commonly escape, one pass per entity.
///
/// ```
/// use pulse_feed::normalize::decode_entities;
///
/// assert_eq!(decode_entities("Q&amp;A &lt;live&gt;"), "Q&A <live>");
/// assert_eq!(decode_entities("A &amp;amp; B"), "A &amp; B");
/// ```
pub fn decode_entities(raw: &str) -> String {
    ENTITIES
        .iter()
        .fold(raw.to_string(), |acc, &(entity, ch)| acc.replace(entity, ch))
}

/// Title and source-name clean-up: CDATA delimiters out, entities decoded.
pub fn clean_text(raw: &str) -> String {
    decode_entities(&strip_cdata(raw))
}

/// Parse a feed date. RSS uses RFC 2822; RFC 3339 is accepted as well.
/// When neither parses strictly, a lenient pass ignores a mismatched
/// weekday and reads zone-less or date-only stamps as UTC. Anything else
/// yields `None`.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let s = strip_cdata(raw);
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(s)
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .map(|d| d.with_timezone(&Utc))
        .ok()
        .or_else(|| parse_lenient(s))
}

const NAIVE_FORMATS: [&str; 3] = ["%d %b %Y %H:%M:%S", "%d %b %Y %H:%M", "%Y-%m-%dT%H:%M:%S"];

fn parse_lenient(s: &str) -> Option<DateTime<Utc>> {
    let body = match s.split_once(',') {
        Some((day, rest)) if day.chars().all(|c| c.is_ascii_alphabetic()) => rest.trim(),
        _ => s,
    };
    if let Ok(d) = DateTime::parse_from_rfc2822(body) {
        return Some(d.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(body, fmt).ok())
        .map(|d| d.and_utc())
        .or_else(|| {
            NaiveDate::parse_from_str(body, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|d| d.and_utc())
        })
}
