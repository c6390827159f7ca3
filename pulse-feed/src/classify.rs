//! Keyword classification: one category and up to three tags per title.
//!
//! Matching is plain substring search on the lowercased title, so short
//! keywords also hit inside longer words ("app" in "apple").

use crate::model::{Category, ClassifiedItem, FeedItem};

const TOOL_KEYWORDS: &[&str] = &["tool", "app", "software", "platform", "launch", "release"];

const BUSINESS_KEYWORDS: &[&str] = &[
    "business",
    "company",
    "startup",
    "investment",
    "funding",
    "market",
    "enterprise",
    "revenue",
];

/// Tag label and the keywords that earn it, in priority order.
pub const TAG_TABLE: &[(&str, &[&str])] = &[
    ("#OpenAI", &["openai", "chatgpt", "gpt-4", "gpt-5", "sam altman"]),
    ("#Google", &["google", "deepmind", "gemini", "bard"]),
    ("#Microsoft", &["microsoft", "copilot", "azure"]),
    ("#Meta", &["meta", "llama", "facebook"]),
    ("#Anthropic", &["anthropic", "claude"]),
    ("#AIResearch", &["research", "study", "paper", "breakthrough"]),
    ("#Business", &["business", "enterprise", "company"]),
    ("#Funding", &["funding", "investment", "raises", "valuation"]),
    ("#Regulation", &["regulation", "law", "policy", "government"]),
];

pub const MAX_TAGS: usize = 3;
pub const DEFAULT_TAG: &str = "#AI";

fn mentions_any(lower_title: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| lower_title.contains(kw))
}

/// Tool keywords win over business keywords; everything else is news.
///
/// ```
/// use pulse_feed::{categorize, Category};
///
/// assert_eq!(categorize("Startup launches coding tool after funding round"), Category::Tools);
/// assert_eq!(categorize("Enterprise AI market heats up"), Category::Business);
/// assert_eq!(categorize("Scientists debate AGI timelines"), Category::News);
/// ```
pub fn categorize(title: &str) -> Category {
    let lower = title.to_lowercase();
    if mentions_any(&lower, TOOL_KEYWORDS) {
        Category::Tools
    } else if mentions_any(&lower, BUSINESS_KEYWORDS) {
        Category::Business
    } else {
        Category::News
    }
}

/// Matching tag labels in [`TAG_TABLE`] order, at most [`MAX_TAGS`]; a
/// title matching nothing gets [`DEFAULT_TAG`].
pub fn generate_tags(title: &str) -> Vec<&'static str> {
    let lower = title.to_lowercase();
    let mut tags: Vec<&'static str> = TAG_TABLE
        .iter()
        .filter(|(_, keywords)| mentions_any(&lower, keywords))
        .map(|(label, _)| *label)
        .take(MAX_TAGS)
        .collect();
    if tags.is_empty() {
        tags.push(DEFAULT_TAG);
    }
    tags
}

pub fn classify(item: FeedItem) -> ClassifiedItem {
    let category = categorize(&item.title);
    let tags = generate_tags(&item.title);
    ClassifiedItem::new(item, category, tags)
}
