//! Axum route handlers for the Allocate API.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::allocator::engine::allocate;
use crate::allocator::plan::{PlanMeta, VideoPlan};
use crate::allocator::spec::AllocSpec;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocateRequest {
    pub total_seconds: i64,
    #[serde(default)]
    pub specs: Vec<AllocSpec>,
    pub trailing: Option<AllocSpec>,
    /// Falls back to the configured `ALLOCATOR_SNAP`.
    pub snap: Option<i64>,
    #[serde(default)]
    pub meta: PlanMeta,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/allocate
///
/// Splits `totalSeconds` across the specs and returns the plan.
pub async fn handle_allocate(
    State(state): State<AppState>,
    Json(request): Json<AllocateRequest>,
) -> Result<Json<VideoPlan>, AppError> {
    let plan = build_plan(&state, request)?;
    Ok(Json(plan))
}

/// POST /api/v1/allocate/srt
///
/// Same allocation as `/allocate`, rendered as an SRT caption file.
/// Rejects plans that fail validation, since overlapping cues are unusable.
pub async fn handle_allocate_srt(
    State(state): State<AppState>,
    Json(request): Json<AllocateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let plan = build_plan(&state, request)?;
    plan.validate()?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        plan.to_srt(),
    ))
}

fn build_plan(state: &AppState, request: AllocateRequest) -> Result<VideoPlan, AppError> {
    if let Some(bad) = request
        .specs
        .iter()
        .chain(request.trailing.as_ref())
        .find(|s| s.id.trim().is_empty())
    {
        return Err(AppError::Validation(format!(
            "spec id cannot be blank (type {})",
            bad.segment_type
        )));
    }

    let snap = request
        .snap
        .unwrap_or_else(|| i64::from(state.config.allocator_snap));
    let plan = allocate(
        request.total_seconds,
        &request.specs,
        request.trailing.as_ref(),
        snap,
    )
    .with_meta(request.meta);

    info!(
        total = plan.total_seconds(),
        specs = request.specs.len(),
        segments = plan.segments().len(),
        snap,
        "plan allocated"
    );
    Ok(plan)
}
