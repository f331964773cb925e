//! Honeypot Attack Analyzer - Web Dashboard Server
//!
//! Upload a honeypot log CSV, get back clusters and anomalies.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 HONEYPOT ATTACK ANALYZER                    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────────────────────────────┐  │
//! │  │  Web UI   │   │  Analysis Core (blocking worker)     │  │
//! │  │  + JSON   │──▶│  ingest → features → KMeans →        │  │
//! │  │  (Axum)   │   │  isolation forest → report           │  │
//! │  └───────────┘   └──────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod handlers;
mod views;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::net::SocketAddr;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env()?;

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "honeypot_analyzer_server=debug,honeypot_analyzer_core=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Honeypot Attack Analyzer starting ({})", config.environment);
    tracing::info!(
        "Analyzer: k={}, contamination={}, trees={}, seed={}",
        config.analyzer.clusters,
        config.analyzer.contamination,
        config.analyzer.trees,
        config.analyzer.seed
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = create_router(AppState { config });

    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;
    let production = state.config.is_production();

    let router = Router::new()
        .route("/health", get(handlers::health::check))
        // Browser dashboard
        .route("/", get(handlers::dashboard::index).post(handlers::dashboard::upload))
        // Programmatic access
        .route("/api/v1/analyze", post(handlers::analyze::analyze_csv))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    let router = if production {
        router
    } else {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    };

    router.with_state(state)
}
