mod auth;
mod config;
mod db;
mod error;
mod models;
mod repositories;
mod routes;
mod services;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use config::Config;
use routes::{create_router, AppState};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (from repo root)
    dotenvy::from_filename("../../.env").ok();
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("moneybuddy_server=debug,tower_http=debug")),
        )
        .init();

    let config = Config::from_env()?;
    let port = config.server_port;

    // Create database pool and run migrations
    let pool = db::create_pool(&config.sqlite_path, config.db_pool_size)?;
    tracing::info!("Database initialized at {}", config.sqlite_path);

    let cors_origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .context("CORS_ORIGIN must be a valid header value")?;
    let state = AppState::new(config, pool);

    let cors = CorsLayer::new()
        .allow_origin(cors_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!("moneybuddy-server listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
