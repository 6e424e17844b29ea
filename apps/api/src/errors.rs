use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Construction and parsing failures for layout value objects.
///
/// These only surface from a caller defect (inverted window, corrupt interchange
/// JSON). The engine itself never produces one.
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("section name is empty")]
    EmptySectionName,

    #[error("maxTotalSec ({max}) < minTotalSec ({min})")]
    InvertedWindow { min: u32, max: u32 },

    #[error("section '{name}' has end {end} < start {start}")]
    InvertedTiming { name: String, start: u32, end: u32 },

    #[error("timeline is not contiguous at index {index}")]
    NonContiguous { index: usize },

    #[error("timeline must open with HOOK and close with END (missing {expected})")]
    MissingBracket { expected: &'static str },

    #[error("totalSec {declared} does not match timeline end {actual}")]
    TotalMismatch { declared: u32, actual: u32 },

    #[error("unknown layout preset '{0}'")]
    UnknownPreset(String),

    #[error("invalid timeline JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Structural problems found by `VideoPlan::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("invalid segment range for id={id}")]
    InvalidRange { id: String },

    #[error("overlap detected before id={id}")]
    Overlap { id: String },

    #[error("segment exceeds totalSeconds for id={id}")]
    ExceedsTotal { id: String },
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Layout(e) => (StatusCode::BAD_REQUEST, "LAYOUT_ERROR", e.to_string()),
            AppError::Plan(e) => {
                // The allocator should never emit an invalid plan.
                tracing::error!("Plan validation failed: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "PLAN_ERROR",
                    e.to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
