//! Review / prediction handlers

use axum::{extract::{rejection::JsonRejection, State}, Json};

use crate::{AppState, AppResult, AppError};
use crate::models::{PredictRequest, PredictResponse, ReviewResponse};

/// Validate a submission and return outlier advisories without predicting
pub async fn review(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<ReviewResponse>> {
    let Json(req) = payload?;
    let review = state.context.review(&req.inputs)?;
    Ok(Json(review.into()))
}

/// Validate, check for outliers, and run the model
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<PredictResponse>> {
    let Json(req) = payload?;
    let context = state.context.clone();

    // Model call is blocking; keep it off the async workers
    let evaluation = tokio::task::spawn_blocking(move || context.evaluate(&req.inputs))
        .await
        .map_err(|e| AppError::InternalError(format!("prediction task failed: {}", e)))??;

    tracing::info!(
        request_id = %evaluation.prediction.request_id,
        price = %evaluation.prediction.formatted_price,
        advisories = evaluation.advisories.len(),
        "Prediction served"
    );

    Ok(Json(evaluation.into()))
}
