//! Housing Price Prediction Server
//!
//! Serves the housing form and prediction API over a pipeline context that is
//! loaded once at startup.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     HOUSING SERVER                           │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────┐   ┌─────────────────────┐  │
//! │  │ Feature   │──▶│ Outlier      │──▶│ Inference Adapter   │  │
//! │  │ Collector │   │ Guard        │   │ (scaler + model)    │  │
//! │  └───────────┘   └──────────────┘   └─────────────────────┘  │
//! │        ▲                                                     │
//! │  ┌─────┴──────────────────────┐                              │
//! │  │  API (Axum)  /  HTML form  │                              │
//! │  └────────────────────────────┘                              │
//! └──────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod models;
mod handlers;
mod error;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use housing_core::PipelineContext;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    // Initialize logging
    let default_filter = if config.is_production() {
        "housing_server=info,housing_core=info,tower_http=info"
    } else {
        "housing_server=debug,housing_core=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    if config.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Housing prediction server starting ({})...", config.environment);
    tracing::info!(
        "Artifacts: model={} scaler={} dataset={}",
        config.pipeline.model_path.display(),
        config.pipeline.scaler_path.display(),
        config.pipeline.dataset_path.display()
    );

    // Artifacts must load before we accept traffic
    let pipeline = config.pipeline.clone();
    let context = tokio::task::spawn_blocking(move || PipelineContext::load(&pipeline))
        .await
        .context("artifact loader panicked")?
        .context("Failed to load prediction artifacts")?;

    // Build application state
    let state = AppState {
        context: Arc::new(context),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub context: Arc<PipelineContext>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::form::page))
        .route("/health", get(handlers::health::check))
        .route("/api/v1/form", get(handlers::form::schema))
        .route("/api/v1/model", get(handlers::model::status))
        .route("/api/v1/review", post(handlers::predict::review))
        .route("/api/v1/predict", post(handlers::predict::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

// ============================================================================
// TESTS
// ============================================================================
