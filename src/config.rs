use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Seconds between background refreshes of the article snapshot
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    /// Per-topic request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Maximum number of curated articles
    #[serde(default = "default_max_items")]
    pub max_items: usize,
    /// Maximum article age in hours
    #[serde(default = "default_freshness_hours")]
    pub freshness_hours: i64,
    #[serde(default)]
    pub endpoint: FeedEndpoint,
    #[serde(default = "default_topics")]
    pub topics: Vec<TopicConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedEndpoint {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_hl")]
    pub hl: String,
    #[serde(default = "default_gl")]
    pub gl: String,
    #[serde(default = "default_ceid")]
    pub ceid: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TopicConfig {
    pub label: String,
    pub query: String,
    #[serde(default = "default_per_topic_limit")]
    pub limit: usize,
}

fn default_refresh_interval() -> u64 {
    120
}

fn default_request_timeout() -> u64 {
    10
}

fn default_max_items() -> usize {
    3
}

fn default_freshness_hours() -> i64 {
    26
}

fn default_per_topic_limit() -> usize {
    12
}

fn default_base_url() -> String {
    "https://news.google.com/rss/search".to_string()
}

fn default_hl() -> String {
    "en-US".to_string()
}

fn default_gl() -> String {
    "US".to_string()
}

fn default_ceid() -> String {
    "US:en".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; TechSpaceAI/1.0)".to_string()
}

fn default_topics() -> Vec<TopicConfig> {
    vec![
        TopicConfig::new("Technology", "technology", 12),
        TopicConfig::new("Space Exploration", "\"space exploration\"", 12),
        TopicConfig::new("SpaceX", "SpaceX", 8),
    ]
}

impl TopicConfig {
    pub fn new(label: &str, query: &str, limit: usize) -> Self {
        Self {
            label: label.to_string(),
            query: query.to_string(),
            limit,
        }
    }

    /// Search query restricted to the last day
    pub fn search_query(&self) -> String {
        format!("{} when:1d", self.query)
    }
}

impl Default for FeedEndpoint {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            hl: default_hl(),
            gl: default_gl(),
            ceid: default_ceid(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval(),
            request_timeout_secs: default_request_timeout(),
            max_items: default_max_items(),
            freshness_hours: default_freshness_hours(),
            endpoint: FeedEndpoint::default(),
            topics: default_topics(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to the built-in defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn freshness_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.freshness_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config_matches_reference_topics() {
        let config = Config::default();

        assert_eq!(config.max_items, 3);
        assert_eq!(config.freshness_hours, 26);
        assert_eq!(config.refresh_interval_secs, 120);
        assert_eq!(
            config.topics,
            vec![
                TopicConfig::new("Technology", "technology", 12),
                TopicConfig::new("Space Exploration", "\"space exploration\"", 12),
                TopicConfig::new("SpaceX", "SpaceX", 8),
            ]
        );
    }

    #[test]
    fn test_search_query_appends_time_restriction() {
        let topic = TopicConfig::new("SpaceX", "SpaceX", 8);
        assert_eq!(topic.search_query(), "SpaceX when:1d");
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
            refresh_interval_secs = 60
            max_items = 5

            [endpoint]
            base_url = "http://localhost:9999/rss/search"

            [[topics]]
            label = "Robotics"
            query = "robotics"
            limit = 4

            [[topics]]
            label = "Rockets"
            query = "rockets"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.refresh_interval_secs, 60);
        assert_eq!(config.max_items, 5);
        assert_eq!(config.freshness_hours, 26);
        assert_eq!(config.endpoint.base_url, "http://localhost:9999/rss/search");
        assert_eq!(config.endpoint.hl, "en-US");
        assert_eq!(config.topics.len(), 2);
        assert_eq!(config.topics[0].limit, 4);
        assert_eq!(config.topics[1].limit, 12);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();

        assert_eq!(config.topics.len(), 3);
        assert_eq!(config.endpoint.ceid, "US:en");
        assert_eq!(config.freshness_window(), chrono::Duration::hours(26));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = Config::load("/nonexistent/path/config.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = Config::load_or_default("/nonexistent/path/config.toml").unwrap();
        assert_eq!(config.topics.len(), 3);
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let content = "this is not valid toml {{{";

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();

        let result = Config::load(temp_file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_missing_required_topic_fields() {
        let content = r#"
            [[topics]]
            label = "Test Topic"
            # Missing query field
        "#;

        let result = Config::from_str(content);
        assert!(result.is_err());
    }
}
