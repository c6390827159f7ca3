//! Card markup for the AI Pulse feed.

use crate::model::ClassifiedItem;
use chrono::{DateTime, TimeDelta, Utc};
use html_escape::{encode_double_quoted_attribute, encode_text};

const CARD_INDENT: &str = "                    ";
const TAG_INDENT: &str = "                            ";

/// Shown when the feed gave no usable publish date.
pub const UNKNOWN_AGE: &str = "unknown";

/// Human "N units ago" for the card header. Dates in the future count as
/// just published.
///
/// ```
/// use chrono::{Duration, Utc};
/// use pulse_feed::relative_age;
///
/// let now = Utc::now();
/// assert_eq!(relative_age(Some(now - Duration::minutes(59)), now), "59m ago");
/// assert_eq!(relative_age(Some(now - Duration::hours(23)), now), "23h ago");
/// assert_eq!(relative_age(Some(now - Duration::hours(30)), now), "1d ago");
/// assert_eq!(relative_age(Some(now - Duration::days(9)), now), "9d ago");
/// assert_eq!(relative_age(None, now), "unknown");
/// ```
pub fn relative_age(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(at) = published_at else {
        return UNKNOWN_AGE.to_string();
    };
    let elapsed = (now - at).max(TimeDelta::zero());
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days == 1 {
        "1d ago".to_string()
    } else {
        format!("{days}d ago")
    }
}

/// One `<article>` card. `age` is the pre-computed relative age.
pub fn render_post(item: &ClassifiedItem, age: &str) -> String {
    let feed_item = item.item();
    let category = item.category();

    let source = if feed_item.source_name.is_empty() {
        String::new()
    } else {
        format!(
            " <span class=\"post-source\">— {}</span>",
            encode_text(&feed_item.source_name)
        )
    };
    let tags = item
        .tags()
        .iter()
        .map(|tag| format!("<span class=\"tag\">{tag}</span>"))
        .collect::<Vec<_>>()
        .join(format!("\n{TAG_INDENT}").as_str());

    let lines = [
        format!(
            "{CARD_INDENT}<article class=\"feed-post animate-on-scroll\" data-category=\"{}\">",
            category.as_str()
        ),
        format!("{CARD_INDENT}    <div class=\"post-header\">"),
        format!(
            "{CARD_INDENT}        <span class=\"post-category\">{}</span>",
            category.label()
        ),
        format!("{CARD_INDENT}        <span class=\"post-time\">{age}</span>"),
        format!("{CARD_INDENT}    </div>"),
        format!(
            "{CARD_INDENT}    <p class=\"post-content\"><a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>{source}</p>",
            encode_double_quoted_attribute(&feed_item.link),
            encode_text(&feed_item.title),
        ),
        format!("{CARD_INDENT}    <div class=\"post-tags\">"),
        format!("{TAG_INDENT}{tags}"),
        format!("{CARD_INDENT}    </div>"),
        format!("{CARD_INDENT}</article>"),
    ];
    lines.join("\n")
}

/// All cards, newest first as given, separated by a blank line.
pub fn render_feed(items: &[ClassifiedItem], now: DateTime<Utc>) -> String {
    items
        .iter()
        .map(|item| render_post(item, &relative_age(item.item().published_at, now)))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::model::FeedItem;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn card(title: &str, source: &str) -> ClassifiedItem {
        classify(FeedItem {
            title: title.to_string(),
            link: "https://example.com/story?a=1&b=2".to_string(),
            published_at: Some(now() - Duration::minutes(5)),
            source_name: source.to_string(),
        })
    }

    #[test]
    fn age_buckets() {
        let n = now();
        assert_eq!(relative_age(Some(n), n), "0m ago");
        assert_eq!(relative_age(Some(n - Duration::minutes(60)), n), "1h ago");
        assert_eq!(relative_age(Some(n - Duration::hours(24)), n), "1d ago");
        assert_eq!(relative_age(Some(n - Duration::hours(48)), n), "2d ago");
    }

    #[test]
    fn future_dates_clamp_to_zero() {
        let n = now();
        assert_eq!(relative_age(Some(n + Duration::hours(2)), n), "0m ago");
    }

    #[test]
    fn renders_expected_card() {
        let html = render_post(&card("OpenAI launches research tool", "Reuters"), "5m ago");
        let expected = [
            r#"                    <article class="feed-post animate-on-scroll" data-category="tools">"#,
            r#"                        <div class="post-header">"#,
            r#"                            <span class="post-category">Tools</span>"#,
            r#"                            <span class="post-time">5m ago</span>"#,
            r#"                        </div>"#,
            r#"                        <p class="post-content"><a href="https://example.com/story?a=1&amp;b=2" target="_blank" rel="noopener noreferrer">OpenAI launches research tool</a> <span class="post-source">— Reuters</span></p>"#,
            r#"                        <div class="post-tags">"#,
            r#"                            <span class="tag">#OpenAI</span>"#,
            r#"                            <span class="tag">#AIResearch</span>"#,
            r#"                        </div>"#,
            r#"                    </article>"#,
        ]
        .join("\n");
        assert_eq!(html, expected);
    }

    #[test]
    fn source_suffix_omitted_when_empty() {
        let html = render_post(&card("Plain story", ""), "1h ago");
        assert!(!html.contains("post-source"));
        assert!(html.contains(r#"<span class="tag">#AI</span>"#));
        assert!(html.contains(r#"data-category="news""#));
    }

    #[test]
    fn title_markup_is_escaped() {
        let html = render_post(&card("<script>alert('x')</script>", ""), "1m ago");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert('x')&lt;/script&gt;"));
    }

    #[test]
    fn link_quotes_cannot_break_out_of_href() {
        let mut item = card("Quoted link", "").item().clone();
        item.link = "https://example.com/?q=\"><b>x</b>".to_string();
        let html = render_post(&classify(item), "1m ago");
        assert!(html.contains(r#"href="https://example.com/?q=&quot;"#));
        assert!(!html.contains(r#"q="><b>"#));
    }

    #[test]
    fn feed_joins_cards_with_blank_line() {
        let items = vec![card("One", ""), card("Two", "")];
        let html = render_feed(&items, now());
        assert_eq!(html.matches("<article").count(), 2);
        assert!(html.contains("</article>\n\n                    <article"));
        assert_eq!(html.matches("5m ago").count(), 2);
    }
}
