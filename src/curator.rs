use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::config::TopicConfig;
use crate::models::Article;
use crate::text::{build_id, extract_primary_url, sanitize_description, smart_summary};

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_LINK: &str = "#";
pub const DEFAULT_SOURCE: &str = "Google News";

/// A feed entry as parsed, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub source_name: Option<String>,
}

/// Turns raw per-topic feed items into the final ordered article list.
#[derive(Debug, Clone)]
pub struct Curator {
    max_items: usize,
    freshness_window: Duration,
}

impl Curator {
    pub fn new(max_items: usize, freshness_window: Duration) -> Self {
        Self {
            max_items,
            freshness_window,
        }
    }

    pub fn is_fresh(&self, published: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        (now - published).num_minutes() <= self.freshness_window.num_minutes()
    }

    /// Normalize one topic's items: cap, resolve links, drop stale entries.
    pub fn normalize_topic(
        &self,
        topic: &TopicConfig,
        items: Vec<RawItem>,
        now: DateTime<Utc>,
    ) -> Vec<Article> {
        let mut articles = Vec::new();

        for item in items.into_iter().take(topic.limit) {
            let published = item.published.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
            if !self.is_fresh(published, now) {
                debug!("Dropping stale item for '{}': {:?}", topic.label, item.title);
                continue;
            }

            articles.push(normalize_item(item, published, &topic.label));
        }

        articles
    }

    /// Merge, order newest first, dedupe by link and cap.
    pub fn merge(&self, batches: Vec<Vec<Article>>, now: DateTime<Utc>) -> Vec<Article> {
        let mut merged: Vec<Article> = batches.into_iter().flatten().collect();
        merged.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        let mut seen = HashSet::new();
        merged
            .into_iter()
            .filter(|article| seen.insert(article.link.clone()))
            .take(self.max_items)
            .map(|article| article.with_relative_time(now))
            .collect()
    }

    /// Full pipeline over already-fetched items, one batch per topic.
    pub fn curate(
        &self,
        batches: Vec<(&TopicConfig, Vec<RawItem>)>,
        now: DateTime<Utc>,
    ) -> Vec<Article> {
        let normalized = batches
            .into_iter()
            .map(|(topic, items)| self.normalize_topic(topic, items, now))
            .collect();
        self.merge(normalized, now)
    }
}

/// Relative time is left empty here; `Curator::merge` fills it against the merge-time `now`.
fn normalize_item(item: RawItem, published: DateTime<Utc>, topic: &str) -> Article {
    let title = item.title.unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let raw_link = item
        .link
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| DEFAULT_LINK.to_string());
    let description = item.description.unwrap_or_default();
    let link = extract_primary_url(&description, &raw_link);

    let summary = smart_summary(&description, &title, item.source_name.as_deref());
    let snippet = sanitize_description(&description);

    Article {
        id: build_id(&link, topic),
        title,
        link,
        published_at: published,
        published_relative: String::new(),
        source_name: item
            .source_name
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
        summary,
        raw_snippet: (!snippet.is_empty()).then_some(snippet),
        topic: topic.to_string(),
    }
}
