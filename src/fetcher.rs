use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use feed_rs::parser;
use futures::future::join_all;
use reqwest::{Client, StatusCode};
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::config::{Config, TopicConfig};
use crate::curator::{Curator, RawItem};
use crate::models::Article;
use crate::text::{decode_entities, truncate_chars};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to parse feed: {0}")]
    Parse(#[from] parser::ParseFeedError),
}

pub struct Fetcher {
    client: Client,
    config: Arc<Config>,
    curator: Curator,
    latest: RwLock<Vec<Article>>,
}

impl Fetcher {
    pub fn new(config: Arc<Config>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.endpoint.user_agent.as_str())
            .build()?;

        let curator = Curator::new(config.max_items, config.freshness_window());

        Ok(Self {
            client,
            config,
            curator,
            latest: RwLock::new(Vec::new()),
        })
    }

    /// Articles from the most recent refresh.
    pub async fn latest(&self) -> Vec<Article> {
        self.latest.read().await.clone()
    }

    pub async fn store(&self, articles: Vec<Article>) {
        *self.latest.write().await = articles;
    }

    /// Fetch all topics and store the curated result as the latest snapshot.
    pub async fn refresh(&self) -> usize {
        let articles = self.fetch_latest_articles().await;
        let count = articles.len();
        self.store(articles).await;
        count
    }

    pub async fn fetch_latest_articles(&self) -> Vec<Article> {
        self.fetch_latest_articles_at(Utc::now()).await
    }

    /// Query every topic concurrently and curate the combined result.
    ///
    /// A topic that fails for any reason contributes no items.
    pub async fn fetch_latest_articles_at(&self, now: DateTime<Utc>) -> Vec<Article> {
        let tasks = self.config.topics.iter().map(|topic| async move {
            match self.fetch_topic(topic).await {
                Ok(items) => {
                    info!("Fetched {} items for topic '{}'", items.len(), topic.label);
                    (topic, items)
                }
                Err(e) => {
                    error!("Failed to fetch {} feed: {}", topic.label, e);
                    (topic, Vec::new())
                }
            }
        });

        let batches = join_all(tasks).await;
        let articles = self.curator.curate(batches, now);
        info!("Curated {} articles", articles.len());
        articles
    }

    async fn fetch_topic(&self, topic: &TopicConfig) -> Result<Vec<RawItem>, FetchError> {
        let endpoint = &self.config.endpoint;
        let query = topic.search_query();

        let response = self
            .client
            .get(&endpoint.base_url)
            .query(&[
                ("q", query.as_str()),
                ("hl", endpoint.hl.as_str()),
                ("gl", endpoint.gl.as_str()),
                ("ceid", endpoint.ceid.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status,
                body: truncate_chars(&body, 200).to_string(),
            });
        }

        let bytes = response.bytes().await?;
        Self::parse_items(&bytes)
    }

    /// Parse an RSS body into raw items, in feed order.
    pub fn parse_items(bytes: &[u8]) -> Result<Vec<RawItem>, FetchError> {
        // feed_rs doesn't expose the RSS <source> element text
        let sources = Self::extract_sources_from_xml(bytes);

        let parsed = parser::parse(bytes)?;

        let items = parsed
            .entries
            .into_iter()
            .map(|entry| {
                let link = entry.links.first().map(|l| l.href.clone());
                let source_name = link.as_ref().and_then(|l| sources.get(l)).cloned();

                RawItem {
                    title: entry.title.map(|t| t.content),
                    link,
                    published: entry.published,
                    description: entry.summary.map(|s| s.content),
                    source_name,
                }
            })
            .collect();

        Ok(items)
    }

    /// Map each item's <link> to the text of its <source> element
    pub fn extract_sources_from_xml(xml_bytes: &[u8]) -> HashMap<String, String> {
        let mut sources = HashMap::new();
        let xml_str = match std::str::from_utf8(xml_bytes) {
            Ok(s) => s,
            Err(_) => return sources,
        };

        for item_block in xml_str.split("<item>").skip(1) {
            let item_end = item_block.find("</item>").unwrap_or(item_block.len());
            let item = &item_block[..item_end];

            let link = Self::extract_xml_element(item, "link");
            let source = Self::extract_xml_element(item, "source");

            if let (Some(link), Some(source)) = (link, source) {
                if !source.is_empty() {
                    sources.insert(decode_entities(&link), decode_entities(&source));
                }
            }
        }

        sources
    }

    /// Text content of the first `tag` element, tolerating attributes and CDATA.
    pub fn extract_xml_element(xml: &str, tag: &str) -> Option<String> {
        let open_tag = format!("<{}", tag);
        let end_tag = format!("</{}>", tag);

        let mut search_from = 0;
        let open_end = loop {
            let pos = xml[search_from..].find(&open_tag)? + search_from + open_tag.len();
            match xml[pos..].chars().next()? {
                '>' | ' ' | '\t' | '\r' | '\n' => break xml[pos..].find('>')? + pos,
                _ => search_from = pos,
            }
        };

        if xml[..open_end].ends_with('/') {
            return Some(String::new());
        }

        let start = open_end + 1;
        let end = xml[start..].find(&end_tag)? + start;
        let content = xml[start..end].trim();
        let content = content
            .strip_prefix("<![CDATA[")
            .and_then(|c| c.strip_suffix("]]>"))
            .unwrap_or(content);

        Some(content.trim().to_string())
    }
}

pub async fn start_background_refresh(fetcher: Arc<Fetcher>, interval_secs: u64) {
    let interval = Duration::from_secs(interval_secs);

    info!("Starting initial feed fetch");
    let count = fetcher.refresh().await;
    info!("Initial fetch stored {} articles", count);

    loop {
        tokio::time::sleep(interval).await;
        info!("Starting scheduled feed refresh");
        let count = fetcher.refresh().await;
        info!("Scheduled refresh stored {} articles", count);
    }
}
