//! Axum route handlers for the requirement form.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Html,
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::requirements::processor::ProcessOutput;
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

pub const NO_REQUIREMENT: &str = "No requirement provided";

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub requirement: Option<String>,
}

/// GET /
pub async fn handle_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// POST /process
///
/// Runs the configured processor over one requirement, passed through verbatim.
/// Always 200 once the requirement is accepted; upstream failures show up inside
/// the documents.
pub async fn handle_process(
    State(state): State<AppState>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<ProcessOutput>, AppError> {
    let Json(request) = payload?;

    let requirement = request
        .requirement
        .as_deref()
        .filter(|r| !r.is_empty())
        .ok_or_else(|| AppError::Validation(NO_REQUIREMENT.to_string()))?;

    Ok(Json(state.processor.process(requirement).await))
}
