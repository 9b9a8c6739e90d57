use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use techspace_ai::config::Config;
use techspace_ai::fetcher::{start_background_refresh, Fetcher};
use techspace_ai::generator::ContentGenerator;
use techspace_ai::routes::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "techspace_ai=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::load_or_default("techspace.toml")?);
    info!("Loaded {} topics from configuration", config.topics.len());

    let fetcher = Arc::new(Fetcher::new(config.clone())?);

    // Start background refresh task
    let bg_fetcher = fetcher.clone();
    let refresh_interval = config.refresh_interval_secs;
    tokio::spawn(async move {
        start_background_refresh(bg_fetcher, refresh_interval).await;
    });

    let state = Arc::new(AppState {
        fetcher,
        generator: ContentGenerator::default(),
        refresh_interval_secs: config.refresh_interval_secs,
    });

    let app = routes::router(state).layer(TraceLayer::new_for_http());

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server starting on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
