//! Value types flowing through one pipeline run.

use chrono::{DateTime, Utc};
use std::fmt;

/// One entry pulled out of a feed, already normalized.
///
/// Extraction is lenient: any field the feed did not provide is left empty,
/// and an unparseable date becomes `None`, which ranks as the oldest entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    pub published_at: Option<DateTime<Utc>>,
    pub source_name: String,
}

/// Coarse bucket used by the page's filter buttons (`data-category`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    News,
    Tools,
    Business,
}

impl Category {
    /// Lowercase form written into the `data-category` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::News => "news",
            Category::Tools => "tools",
            Category::Business => "business",
        }
    }

    /// Capitalized form shown on the card.
    pub fn label(self) -> &'static str {
        match self {
            Category::News => "News",
            Category::Tools => "Tools",
            Category::Business => "Business",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A [`FeedItem`] with its derived category and tags. Built once by
/// [`crate::classify::classify`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedItem {
    item: FeedItem,
    category: Category,
    tags: Vec<&'static str>,
}

impl ClassifiedItem {
    pub(crate) fn new(item: FeedItem, category: Category, tags: Vec<&'static str>) -> Self {
        debug_assert!(!tags.is_empty());
        Self {
            item,
            category,
            tags,
        }
    }

    pub fn item(&self) -> &FeedItem {
        &self.item
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// One to three tag labels, in tag-table order.
    pub fn tags(&self) -> &[&'static str] {
        &self.tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_forms() {
        assert_eq!(Category::Tools.as_str(), "tools");
        assert_eq!(Category::Business.label(), "Business");
        assert_eq!(Category::News.to_string(), "news");
    }

    #[test]
    fn default_item_is_empty() {
        let item = FeedItem::default();
        assert!(item.title.is_empty());
        assert!(item.published_at.is_none());
    }
}
