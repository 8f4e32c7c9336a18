//! Health check handler

use axum::{extract::State, Json};
use housing_core::logic::model::EngineKind;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
    engine: EngineKind,
    timestamp: i64,
}

/// The server only starts once artifacts are loaded, so reaching this means ready
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
        engine: state.context.metadata().engine,
        timestamp: chrono::Utc::now().timestamp(),
    })
}
