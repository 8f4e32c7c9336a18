//! Error handling

use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use housing_core::logic::features::FieldError;
use housing_core::logic::model::InferenceError;
use housing_core::PipelineError;
use serde_json::json;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Validation errors
    #[error("invalid input ({} field(s))", .0.len())]
    InvalidInput(Vec<FieldError>),

    #[error("malformed request body: {0}")]
    BadRequest(String),

    // Model errors
    #[error("inference error: {0}")]
    InferenceError(String),

    // Generic errors
    #[error("internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, fields) = match self {
            AppError::InvalidInput(fields) => (StatusCode::BAD_REQUEST, "Invalid input", fields),
            AppError::BadRequest(msg) => {
                tracing::debug!("Rejected request body: {}", msg);
                (StatusCode::BAD_REQUEST, "Malformed request body", Vec::new())
            }
            AppError::InferenceError(msg) => {
                tracing::error!("Inference error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Prediction failed", Vec::new())
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", Vec::new())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
            "fields": fields,
        }));

        (status, body).into_response()
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::InvalidInput(e) => AppError::InvalidInput(e.errors),
            PipelineError::Inference(InferenceError::OutOfRange { feature, value }) => {
                AppError::InvalidInput(vec![FieldError {
                    feature,
                    reason: format!("value {} is too large for the model", value),
                }])
            }
            PipelineError::Inference(e) => AppError::InferenceError(e.to_string()),
            PipelineError::Baseline(e) => AppError::InternalError(e.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
