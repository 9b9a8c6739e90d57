use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::text::format_relative_time;

/// A curated, normalized feed entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub link: String,
    pub published_at: DateTime<Utc>,
    pub published_relative: String,
    pub source_name: String,
    pub summary: String,
    pub raw_snippet: Option<String>,
    pub topic: String,
}

impl Article {
    /// Re-derive the relative timestamp against `now`.
    pub fn with_relative_time(mut self, now: DateTime<Utc>) -> Self {
        self.published_relative = format_relative_time(self.published_at, now);
        self
    }
}

/// The script package derived from a list of articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub youtube_title: String,
    pub narration_script: String,
    pub hashtags: Vec<String>,
    pub thumbnail_text: String,
    pub visual_ideas: Vec<String>,
    pub voice_over_prompt: String,
}

/// One render: the curated articles plus the content generated from them.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Briefing {
    pub articles: Vec<Article>,
    pub content: GeneratedContent,
    pub generated_at: DateTime<Utc>,
}
