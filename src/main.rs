mod catalog;
mod config;
mod error;
mod models;
mod query;
mod routes;

use std::sync::Arc;

use anyhow::Context;
use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{catalog::Catalog, config::Config};

pub struct AppState {
    pub catalog: Arc<Catalog>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,streamlib=debug".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    // Load failures are fatal: no query can be served without a catalog.
    let catalog = Catalog::load(&config.data_dir)
        .with_context(|| format!("loading catalog from {}", config.data_dir.display()))?;

    let state = Arc::new(AppState { catalog: Arc::new(catalog) });

    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/api/platform-counts", get(routes::platform_counts))
        .route("/api/top-rated", get(routes::top_rated))
        .route("/api/most-recent", get(routes::most_recent))
        .route("/api/top-genres", get(routes::top_genres))
        .route("/api/genre-platform", get(routes::genre_platform))
        .route("/api/filter-options", get(routes::filter_options))
        .route("/api/search", get(routes::search))
        .with_state(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
