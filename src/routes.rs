use std::sync::Arc;

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};

use crate::fetcher::Fetcher;
use crate::generator::ContentGenerator;
use crate::models::{Article, Briefing, GeneratedContent};

pub struct AppState {
    pub fetcher: Arc<Fetcher>,
    pub generator: ContentGenerator,
    pub refresh_interval_secs: u64,
}

impl AppState {
    /// Snapshot articles with relative times and content derived at `now`.
    pub async fn briefing_at(&self, now: DateTime<Utc>) -> Briefing {
        let articles: Vec<Article> = self
            .fetcher
            .latest()
            .await
            .into_iter()
            .map(|article| article.with_relative_time(now))
            .collect();
        let content = self.generator.generate(&articles);

        Briefing {
            articles,
            content,
            generated_at: now,
        }
    }
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub content: GeneratedContent,
    pub articles: Vec<Article>,
    pub generated_at: String,
    pub refresh_minutes: u64,
}

// Wrapper for HTML responses
struct HtmlTemplate<T>(T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/briefing", get(briefing))
        .route("/health", get(health))
        .with_state(state)
}

// Route handlers
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let briefing = state.briefing_at(Utc::now()).await;

    HtmlTemplate(IndexTemplate {
        content: briefing.content,
        articles: briefing.articles,
        generated_at: briefing
            .generated_at
            .format("%b %-d, %Y at %H:%M UTC")
            .to_string(),
        refresh_minutes: (state.refresh_interval_secs / 60).max(1),
    })
}

pub async fn briefing(State(state): State<Arc<AppState>>) -> Json<Briefing> {
    Json(state.briefing_at(Utc::now()).await)
}

pub async fn health() -> impl IntoResponse {
    Html("OK")
}
