//! Deterministic script-package generation.
//!
//! [`ContentGenerator`] is a pure template engine: the same article list
//! always yields the same [`GeneratedContent`].

use std::collections::HashSet;

use crate::models::{Article, GeneratedContent};
use crate::text::{format_timestamp, strip_dash_segment, strip_publisher_suffix, truncate_chars, ELLIPSIS};

const TITLE_MAX_CHARS: usize = 55;
const TITLE_CUT_CHARS: usize = 52;
const MAX_HASHTAGS: usize = 6;

/// Fixed phrase lists and labels used by the generator.
///
/// An empty `intro_hooks` or `transitions` list is allowed: segments then
/// open directly with the headline.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub brand: String,
    pub fallback_title: String,
    pub intro_hooks: Vec<String>,
    pub transitions: Vec<String>,
    pub standby_script: Vec<String>,
    pub closing: String,
    pub base_hashtags: Vec<String>,
    pub multi_topic_label: String,
    pub thumbnail_tagline: String,
    pub fallback_visual_ideas: Vec<String>,
    pub voice_direction: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let closing = "Follow TechSpace AI for your next daily launch into the future!";

        Self {
            brand: "TechSpace AI".to_string(),
            fallback_title: "TechSpace AI: Breaking Tech & Space News".to_string(),
            intro_hooks: strings(&[
                "Quick tech-and-space blast incoming!",
                "Did you catch this cosmic tech update?",
                "TechSpace AI scanning the latest headlines!",
            ]),
            transitions: strings(&["Meanwhile", "On the launch pad", "Back on Earth", "In orbit"]),
            standby_script: strings(&[
                "Scanning the feeds… no major tech or space shakeups in the last orbit.",
                "TechSpace AI stays on standby so you never miss the next breakthrough!",
                closing,
            ]),
            closing: closing.to_string(),
            base_hashtags: strings(&["#TechNews", "#SpaceExploration", "#TechSpaceAI"]),
            multi_topic_label: "Tech + Space".to_string(),
            thumbnail_tagline: "Flash Briefing".to_string(),
            fallback_visual_ideas: strings(&[
                "Looping animation of radar HUD scanning over Earth with text \"Standing by for fresh intel\".",
                "Countdown-inspired motion graphics signaling the next update window.",
            ]),
            voice_direction: strings(&[
                "Voice-over prompt:",
                "Energetic, youthful presenter speaking quickly but clearly.",
                "Pacing suitable for a 55-second short with slight emphasis on key buzzwords.",
            ]),
        }
    }
}

fn pick(items: &[String], index: usize) -> Option<&str> {
    if items.is_empty() {
        return None;
    }
    Some(&items[index % items.len()])
}

fn topic_hashtag(topic: &str) -> &'static str {
    match topic {
        "Space Exploration" => "#SpaceUpdate",
        "Technology" => "#FutureTech",
        _ => "#SpaceX",
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContentGenerator {
    config: GeneratorConfig,
}

impl ContentGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self, articles: &[Article]) -> GeneratedContent {
        let narration_script = self.build_narration(articles);

        GeneratedContent {
            youtube_title: self.build_title(articles),
            voice_over_prompt: self.build_voice_over_prompt(&narration_script),
            narration_script,
            hashtags: self.build_hashtags(articles),
            thumbnail_text: self.build_thumbnail_text(articles),
            visual_ideas: self.build_visual_ideas(articles),
        }
    }

    fn build_title(&self, articles: &[Article]) -> String {
        let Some(first) = articles.first() else {
            return self.config.fallback_title.clone();
        };

        let trimmed = strip_publisher_suffix(&first.title);
        if trimmed.chars().count() > TITLE_MAX_CHARS {
            format!(
                "{}: {}{}",
                self.config.brand,
                truncate_chars(trimmed, TITLE_CUT_CHARS).trim(),
                ELLIPSIS
            )
        } else {
            format!("{}: {}", self.config.brand, trimmed)
        }
    }

    fn build_narration(&self, articles: &[Article]) -> String {
        if articles.is_empty() {
            return self.config.standby_script.join(" ");
        }

        let mut segments: Vec<String> = articles
            .iter()
            .enumerate()
            .map(|(index, article)| {
                let transition = if index == 0 {
                    pick(&self.config.intro_hooks, articles.len())
                } else {
                    pick(&self.config.transitions, index)
                };

                let headline = strip_dash_segment(&article.title);
                let highlight = match transition {
                    Some(transition) => format!("{}, {}.", transition, headline),
                    None => format!("{}.", headline),
                };

                format!("{} {} Source: {}.", highlight, article.summary, article.source_name)
            })
            .collect();

        segments.push(self.config.closing.clone());
        segments.join(" ")
    }

    fn build_hashtags(&self, articles: &[Article]) -> Vec<String> {
        let mut seen = HashSet::new();
        let topic_tags = articles.iter().map(|article| topic_hashtag(&article.topic));

        self.config
            .base_hashtags
            .iter()
            .map(String::as_str)
            .chain(topic_tags)
            .filter(|tag| seen.insert(*tag))
            .take(MAX_HASHTAGS)
            .map(str::to_string)
            .collect()
    }

    fn build_thumbnail_text(&self, articles: &[Article]) -> String {
        let label = match articles {
            [] => self.config.brand.as_str(),
            [only] => only.topic.as_str(),
            _ => self.config.multi_topic_label.as_str(),
        };
        format!("{}\n{}", label, self.config.thumbnail_tagline)
    }

    fn build_visual_ideas(&self, articles: &[Article]) -> Vec<String> {
        if articles.is_empty() {
            return self.config.fallback_visual_ideas.clone();
        }

        articles
            .iter()
            .map(|article| {
                format!(
                    "Overlay article title \"{}\" with animated HUD graphics, timestamp {}, and B-roll themed around {}.",
                    article.title,
                    format_timestamp(article.published_at),
                    article.topic.to_lowercase()
                )
            })
            .collect()
    }

    fn build_voice_over_prompt(&self, narration: &str) -> String {
        let mut lines = self.config.voice_direction.clone();
        lines.push(format!("Script: {}", narration));
        lines.join("\n")
    }
}

/// Generate with the built-in phrase lists.
pub fn generate_content(articles: &[Article]) -> GeneratedContent {
    ContentGenerator::default().generate(articles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn article(title: &str, topic: &str, hour: u32) -> Article {
        Article {
            id: format!("{}-abcdef0123", topic.to_lowercase()),
            title: title.to_string(),
            link: format!("https://example.com/{}", hour),
            published_at: Utc.with_ymd_and_hms(2024, 3, 5, hour, 7, 0).unwrap(),
            published_relative: "1 hour ago".to_string(),
            source_name: "Space News".to_string(),
            summary: "Engineers confirmed the result.".to_string(),
            raw_snippet: None,
            topic: topic.to_string(),
        }
    }

    mod empty_input_tests {
        use super::*;

        #[test]
        fn test_fallbacks() {
            let content = generate_content(&[]);

            assert_eq!(content.youtube_title, "TechSpace AI: Breaking Tech & Space News");
            assert!(content.narration_script.starts_with("Scanning the feeds…"));
            assert_eq!(content.visual_ideas.len(), 2);
            assert_eq!(content.hashtags, vec!["#TechNews", "#SpaceExploration", "#TechSpaceAI"]);
            assert_eq!(content.thumbnail_text, "TechSpace AI\nFlash Briefing");
        }

        #[test]
        fn test_standby_script_has_three_sentences() {
            let content = generate_content(&[]);
            assert_eq!(
                content.narration_script,
                "Scanning the feeds… no major tech or space shakeups in the last orbit. \
                 TechSpace AI stays on standby so you never miss the next breakthrough! \
                 Follow TechSpace AI for your next daily launch into the future!"
            );
        }
    }

    mod title_tests {
        use super::*;

        #[test]
        fn test_long_title_truncated() {
            let title = "x".repeat(80);
            let content = generate_content(&[article(&title, "SpaceX", 9)]);
            assert_eq!(content.youtube_title, format!("TechSpace AI: {}…", "x".repeat(52)));
        }

        #[test]
        fn test_publisher_suffix_removed() {
            let content = generate_content(&[article("Rocket lands | Space.com", "SpaceX", 9)]);
            assert_eq!(content.youtube_title, "TechSpace AI: Rocket lands");
        }

        #[test]
        fn test_55_chars_not_truncated() {
            let title = "y".repeat(55);
            let content = generate_content(&[article(&title, "SpaceX", 9)]);
            assert_eq!(content.youtube_title, format!("TechSpace AI: {}", title));
        }
    }

    mod narration_tests {
        use super::*;

        #[test]
        fn test_single_article_segment() {
            let content = generate_content(&[article("Starship flies - Reuters", "SpaceX", 9)]);
            assert_eq!(
                content.narration_script,
                "Did you catch this cosmic tech update?, Starship flies. Engineers confirmed the result. \
                 Source: Space News. Follow TechSpace AI for your next daily launch into the future!"
            );
        }

        #[test]
        fn test_hook_rotates_by_article_count_and_transitions_by_index() {
            let articles = vec![
                article("One", "Technology", 9),
                article("Two", "SpaceX", 8),
                article("Three", "Space Exploration", 7),
            ];
            let content = generate_content(&articles);

            assert!(content.narration_script.starts_with("Quick tech-and-space blast incoming!, One."));
            assert!(content.narration_script.contains("On the launch pad, Two."));
            assert!(content.narration_script.contains("Back on Earth, Three."));
            assert!(content
                .voice_over_prompt
                .ends_with(&format!("Script: {}", content.narration_script)));
        }
    }

    mod hashtag_tests {
        use super::*;

        #[test]
        fn test_topic_tags_deduplicated_in_order() {
            let articles = vec![
                article("A", "SpaceX", 9),
                article("B", "Technology", 8),
                article("C", "SpaceX", 7),
            ];
            let content = generate_content(&articles);
            assert_eq!(
                content.hashtags,
                vec!["#TechNews", "#SpaceExploration", "#TechSpaceAI", "#SpaceX", "#FutureTech"]
            );
        }

        #[test]
        fn test_base_tags_not_repeated_by_topic_tags() {
            let config = GeneratorConfig {
                base_hashtags: vec!["#SpaceX".to_string(), "#TechNews".to_string()],
                ..GeneratorConfig::default()
            };
            let articles = vec![article("A", "SpaceX", 9), article("B", "Technology", 8)];

            let content = ContentGenerator::new(config).generate(&articles);
            assert_eq!(content.hashtags, vec!["#SpaceX", "#TechNews", "#FutureTech"]);
        }

        #[test]
        fn test_duplicate_base_tags_collapsed() {
            let config = GeneratorConfig {
                base_hashtags: vec!["#TechNews".to_string(), "#TechNews".to_string()],
                ..GeneratorConfig::default()
            };

            let content = ContentGenerator::new(config).generate(&[]);
            assert_eq!(content.hashtags, vec!["#TechNews"]);
        }

        #[test]
        fn test_capped_at_six() {
            let articles = vec![
                article("A", "Space Exploration", 9),
                article("B", "Technology", 8),
                article("C", "SpaceX", 7),
            ];
            let mut config = GeneratorConfig::default();
            config.base_hashtags.push("#Extra".to_string());

            let content = ContentGenerator::new(config).generate(&articles);
            assert_eq!(content.hashtags.len(), 6);
            assert_eq!(content.hashtags[5], "#FutureTech");
        }
    }

    mod phrase_list_tests {
        use super::*;

        #[test]
        fn test_empty_phrase_lists_open_with_headline() {
            let config = GeneratorConfig {
                intro_hooks: Vec::new(),
                transitions: Vec::new(),
                ..GeneratorConfig::default()
            };
            let articles = vec![article("One - Wire", "SpaceX", 9), article("Two", "SpaceX", 8)];

            let content = ContentGenerator::new(config).generate(&articles);
            assert!(content
                .narration_script
                .starts_with("One. Engineers confirmed the result. Source: Space News. Two. "));
            assert!(!content.narration_script.contains(", One."));
        }
    }

    mod thumbnail_and_visual_tests {
        use super::*;

        #[test]
        fn test_single_topic_label() {
            let content = generate_content(&[article("A", "Space Exploration", 9)]);
            assert_eq!(content.thumbnail_text, "Space Exploration\nFlash Briefing");
        }

        #[test]
        fn test_multi_topic_label() {
            let content =
                generate_content(&[article("A", "SpaceX", 9), article("B", "SpaceX", 8)]);
            assert_eq!(content.thumbnail_text, "Tech + Space\nFlash Briefing");
        }

        #[test]
        fn test_visual_idea_per_article() {
            let content = generate_content(&[article("Starship flies", "Space Exploration", 9)]);
            assert_eq!(
                content.visual_ideas,
                vec![
                    "Overlay article title \"Starship flies\" with animated HUD graphics, timestamp Mar 5, 09:07, \
                     and B-roll themed around space exploration."
                        .to_string()
                ]
            );
        }
    }

    #[test]
    fn test_deterministic() {
        let articles = vec![article("A", "SpaceX", 9), article("B", "Technology", 8)];
        assert_eq!(generate_content(&articles), generate_content(&articles));
    }
}
