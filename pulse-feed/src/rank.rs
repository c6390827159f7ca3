//! Merge, dedup, order and cut the items of all feeds.

use crate::model::FeedItem;
use std::collections::HashSet;

/// Items kept after ranking.
pub const DEFAULT_MAX_ITEMS: usize = 15;
/// Characters of the lowercased title compared for near-duplicates.
pub const DEFAULT_DEDUP_PREFIX_CHARS: usize = 50;

/// Lowercased title truncated to `prefix_chars` characters.
pub fn dedup_key(title: &str, prefix_chars: usize) -> String {
    title.to_lowercase().chars().take(prefix_chars).collect()
}

/// Keep the first item seen for each [`dedup_key`]; later ones are dropped
/// even when they are newer or carry more fields.
pub fn dedupe(items: Vec<FeedItem>, prefix_chars: usize) -> Vec<FeedItem> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(dedup_key(&item.title, prefix_chars)))
        .collect()
}

/// Newest first. Stable, so equal timestamps keep their input order; items
/// without a date go last.
pub fn rank(items: &mut [FeedItem]) {
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
}

/// Dedup, rank, then keep the first `max_items`.
pub fn curate(items: Vec<FeedItem>, prefix_chars: usize, max_items: usize) -> Vec<FeedItem> {
    let mut items = dedupe(items, prefix_chars);
    rank(&mut items);
    items.truncate(max_items);
    items
}
