//! News ingestion for the AI Pulse page.
//!
//! A single pass over a fixed list of RSS feeds:
//!
//! 1. [`source`]: fetch each feed body ([`FeedSource`], one feed at a time)
//! 2. [`parse`]: lenient, pattern-based extraction of `<item>` entries
//! 3. [`normalize`]: CDATA stripping, entity decoding, date parsing
//! 4. [`rank`]: title-prefix dedup, newest-first stable sort, top-N cut
//! 5. [`classify`]: keyword category and topical tags
//! 6. [`render`]: one `<article>` card per item
//! 7. [`splice`]: swap the card block between two literal page markers
//!
//! [`pipeline::Pipeline`] strings the stages together and owns the only
//! side effects (network reads and the single page write).
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use pulse_feed::{classify, parse_feed, render_feed, splice, Markers};
//!
//! let xml = "<rss><channel><item><title>Google ships Gemini app</title>\
//!            <link>https://example.com/a</link>\
//!            <pubDate>Mon, 19 Oct 2026 10:00:00 GMT</pubDate></item></channel></rss>";
//! let items: Vec<_> = parse_feed(xml).into_iter().map(classify).collect();
//! assert_eq!(items[0].category().as_str(), "tools");
//!
//! let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
//! let page = "<main>\n<!-- Feed posts -->\n                <div class=\"feed\">\nold\n</div>\n\n                <!-- Load more -->\n</main>";
//! let out = splice(page, &Markers::default(), &render_feed(&items, now), now).unwrap();
//! assert!(out.contains("2h ago"));
//! assert!(!out.contains("old"));
//! ```

pub mod classify;
pub mod model;
pub mod normalize;
pub mod parse;
pub mod pipeline;
pub mod rank;
pub mod render;
pub mod source;
pub mod splice;

pub use classify::{categorize, classify, generate_tags};
pub use model::{Category, ClassifiedItem, FeedItem};
pub use parse::parse_feed;
pub use pipeline::{Pipeline, PipelineError, PipelineOptions, RunReport};
pub use rank::curate;
pub use render::{relative_age, render_feed, render_post};
pub use source::FeedSource;
pub use splice::{splice, Marker, Markers, SpliceError};
