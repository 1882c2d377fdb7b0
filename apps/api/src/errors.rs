use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Upstream completion failures never reach this type: pipelines fold them
/// into the documents they return.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{}", .0.body_text())]
    PayloadRejected(#[from] JsonRejection),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match &self {
            AppError::Validation(_) => tracing::debug!("Rejected request: {message}"),
            AppError::PayloadRejected(_) => tracing::warn!("Malformed request body: {message}"),
        }

        (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
    }
}
