//! Model status handler

use axum::{extract::State, Json};
use housing_core::logic::pipeline::ModelMetadata;

use crate::AppState;

/// Loaded artifacts, checksum and feature layout
pub async fn status(State(state): State<AppState>) -> Json<ModelMetadata> {
    Json(state.context.metadata().clone())
}
