mod common;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use pulse_feed::pipeline::FeedOutcome;
use pulse_feed::{
    Category, FeedSource, Marker, Pipeline, PipelineError, PipelineOptions, SpliceError,
};
use pulse_http::HttpError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<body>
    <main class="pulse">
            <section class="feed-section">
                <!-- Feed posts -->
                <div class="feed">
                    <article class="feed-post">placeholder</article>
                </div>

                <!-- Load more -->
                <div class="load-more"><button>Load more</button></div>
            </section>
    </main>
</body>
</html>
"#;

/// Serves canned bodies by URL; unknown URLs fail like a dead host.
#[derive(Default)]
struct FakeFeeds {
    bodies: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
}

impl FakeFeeds {
    fn with(mut self, url: &str, body: String) -> Self {
        self.bodies.insert(url.to_string(), body);
        self
    }
}

#[async_trait]
impl FeedSource for FakeFeeds {
    async fn fetch(&self, url: &str) -> Result<String, HttpError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| HttpError::Network(format!("no route to {url}")))
    }
}

fn rss(items: &[(&str, chrono::DateTime<Utc>)]) -> String {
    let body: String = items
        .iter()
        .enumerate()
        .map(|(i, (title, at))| {
            format!(
                "<item><title>{title}</title><link>https://news.example.com/{i}</link>\
                 <pubDate>{}</pubDate><source url=\"https://wire.example.com\">Wire</source></item>",
                at.to_rfc2822()
            )
        })
        .collect();
    format!("<?xml version=\"1.0\"?><rss><channel><title>feed</title>{body}</channel></rss>")
}

fn write_page(tmp: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = tmp.path().join("ai-pulse.html");
    std::fs::write(&path, contents).unwrap();
    path
}

fn options(feeds: &[&str]) -> PipelineOptions {
    PipelineOptions {
        feeds: feeds.iter().map(|s| s.to_string()).collect(),
        ..PipelineOptions::default()
    }
}

#[tokio::test]
async fn near_duplicate_across_feeds_collapses_to_one_card() {
    common::init_test_tracing();
    let now = Utc::now();
    let source = FakeFeeds::default()
        .with("https://a.example/rss", rss(&[("OpenAI launches new tool", now)]))
        .with(
            "https://b.example/rss",
            rss(&[("openai launches new tool", now - Duration::hours(1))]),
        );
    let pipeline = Pipeline::new(
        Arc::new(source),
        options(&["https://a.example/rss", "https://b.example/rss"]),
    );

    let collected = pipeline.collect().await;
    assert_eq!(collected.items.len(), 2);

    let items = pipeline.prepare(collected.items);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].item().title, "OpenAI launches new tool");
    assert_eq!(items[0].category(), Category::Tools);
    assert!(items[0].tags().contains(&"#OpenAI"));

    let tmp = TempDir::new().unwrap();
    let page = write_page(&tmp, PAGE);
    let report = pipeline.run(&page, false).await.unwrap();

    assert_eq!(report.feeds_total, 2);
    assert_eq!(report.feeds_failed, 0);
    assert_eq!(report.items_fetched, 2);
    assert_eq!(report.items_published, 1);
    assert!(report.written);

    let written = std::fs::read_to_string(&page).unwrap();
    assert_eq!(written, report.document);
    assert!(!written.contains("placeholder"));
    assert_eq!(written.matches("<article class=\"feed-post animate-on-scroll\"").count(), 1);
    assert!(written.contains(r#"data-category="tools""#));
    assert!(written.contains(r#"<span class="tag">#OpenAI</span>"#));
    assert!(written.contains(r#"<span class="post-source">— Wire</span>"#));
    assert!(written.contains("<!-- Last updated: "));
    assert!(
        written.contains(r#"<span class="post-time">0m ago</span>"#)
            || written.contains(r#"<span class="post-time">1m ago</span>"#)
    );
    assert!(written.contains(r#"<div class="load-more"><button>Load more</button></div>"#));
}

#[tokio::test]
async fn failing_feed_does_not_abort_the_run() {
    common::init_test_tracing();
    let now = Utc::now();
    let source = Arc::new(
        FakeFeeds::default().with("https://up.example/rss", rss(&[("Claude gets memory", now)])),
    );
    let pipeline = Pipeline::new(
        source.clone(),
        options(&["https://down.example/rss", "https://up.example/rss"]),
    );

    let tmp = TempDir::new().unwrap();
    let page = write_page(&tmp, PAGE);
    let report = pipeline.run(&page, false).await.unwrap();

    assert_eq!(report.feeds_failed, 1);
    assert_eq!(report.items_published, 1);
    assert_eq!(
        *source.calls.lock().unwrap(),
        vec!["https://down.example/rss", "https://up.example/rss"]
    );
    let written = std::fs::read_to_string(&page).unwrap();
    assert!(written.contains("Claude gets memory"));
    assert!(written.contains("#Anthropic"));
}

#[tokio::test]
async fn publishes_at_most_fifteen_newest() {
    common::init_test_tracing();
    let now = Utc::now();
    let titles: Vec<String> = (0..20).map(|i| format!("Story number {i}")).collect();
    let entries: Vec<(&str, chrono::DateTime<Utc>)> = titles
        .iter()
        .enumerate()
        .map(|(i, t)| (t.as_str(), now - Duration::hours(i as i64)))
        .collect();
    let pipeline = Pipeline::new(
        Arc::new(FakeFeeds::default().with("https://a.example/rss", rss(&entries))),
        options(&["https://a.example/rss"]),
    );

    let tmp = TempDir::new().unwrap();
    let page = write_page(&tmp, PAGE);
    let report = pipeline.run(&page, true).await.unwrap();

    assert_eq!(report.items_fetched, 20);
    assert_eq!(report.items_published, 15);
    assert!(report.document.contains("Story number 14<"));
    assert!(!report.document.contains("Story number 15<"));
}

#[tokio::test]
async fn dry_run_leaves_page_untouched() {
    let pipeline = Pipeline::new(
        Arc::new(FakeFeeds::default().with(
            "https://a.example/rss",
            rss(&[("Microsoft Copilot update", Utc::now())]),
        )),
        options(&["https://a.example/rss"]),
    );

    let tmp = TempDir::new().unwrap();
    let page = write_page(&tmp, PAGE);
    let report = pipeline.run(&page, true).await.unwrap();

    assert!(!report.written);
    assert!(report.document.contains("Microsoft Copilot update"));
    assert_eq!(std::fs::read_to_string(&page).unwrap(), PAGE);
}

#[tokio::test]
async fn missing_marker_aborts_without_writing() {
    common::init_test_tracing();
    let source = Arc::new(FakeFeeds::default().with(
        "https://a.example/rss",
        rss(&[("Anything at all", Utc::now())]),
    ));
    let pipeline = Pipeline::new(source, options(&["https://a.example/rss"]));

    let broken = PAGE.replace("<!-- Load more -->", "<!-- more -->");
    let tmp = TempDir::new().unwrap();
    let page = write_page(&tmp, &broken);

    let err = pipeline.run(&page, false).await.unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Splice(SpliceError::MarkerNotFound { marker: Marker::End })
    ));
    assert_eq!(std::fs::read_to_string(&page).unwrap(), broken);
}

#[tokio::test]
async fn unreadable_page_fails_before_fetching() {
    let source = Arc::new(FakeFeeds::default());
    let pipeline = Pipeline::new(source.clone(), options(&["https://a.example/rss"]));

    let tmp = TempDir::new().unwrap();
    let err = pipeline
        .run(&tmp.path().join("nope.html"), false)
        .await
        .unwrap_err();

    assert!(matches!(err, PipelineError::ReadPage { .. }));
    assert!(source.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn all_feeds_down_still_rewrites_block() {
    let pipeline = Pipeline::new(
        Arc::new(FakeFeeds::default()),
        options(&["https://x.example/rss", "https://y.example/rss"]),
    );
    let collected = pipeline.collect().await;
    assert!(collected
        .outcomes
        .iter()
        .all(|o| matches!(o, FeedOutcome::Failed { .. })));

    let tmp = TempDir::new().unwrap();
    let page = write_page(&tmp, PAGE);
    let report = pipeline.run(&page, false).await.unwrap();
    assert_eq!(report.feeds_failed, 2);
    assert_eq!(report.items_published, 0);
    assert!(!report.document.contains("placeholder"));
}
