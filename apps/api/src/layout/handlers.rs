//! Axum route handlers for the Layout API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::layout::engine::layout;
use crate::layout::markers::TimelineConfig;
use crate::layout::rule::{LayoutPreset, LayoutRule};
use crate::layout::spec::SectionSpec;
use crate::layout::timing::LayoutResult;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRequest {
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
    pub rule: Option<LayoutRule>,
    pub preset: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkersRequest {
    /// Label for the exported config. Defaults to `<preset>-preset`.
    pub name: Option<String>,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
    pub rule: Option<LayoutRule>,
    pub preset: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PresetEntry {
    pub name: &'static str,
    pub rule: LayoutRule,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/layout/presets
///
/// Lists the named rule presets a request may reference.
pub async fn handle_list_presets() -> Json<Vec<PresetEntry>> {
    Json(
        LayoutPreset::all()
            .into_iter()
            .map(|p| PresetEntry {
                name: p.name(),
                rule: p.rule(),
            })
            .collect(),
    )
}

/// POST /api/v1/layout
///
/// Fits the ordered sections into the requested window and returns the
/// `{totalSec, timeline}` interchange shape.
pub async fn handle_layout(
    State(state): State<AppState>,
    Json(request): Json<LayoutRequest>,
) -> Result<Json<LayoutResult>, AppError> {
    let (rule, label) = resolve_rule(&state, request.rule, request.preset.as_deref())?;

    let result = layout(&request.sections, &rule);
    info!(
        sections = request.sections.len(),
        total = result.total_sec(),
        rule = %label,
        "layout fitted"
    );

    Ok(Json(result))
}

/// POST /api/v1/layout/markers
///
/// Same fit as `/layout`, exported as a named marker config.
pub async fn handle_layout_markers(
    State(state): State<AppState>,
    Json(request): Json<MarkersRequest>,
) -> Result<Json<TimelineConfig>, AppError> {
    if request.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::Validation("name cannot be blank".to_string()));
    }

    let (rule, label) = resolve_rule(&state, request.rule, request.preset.as_deref())?;
    let result = layout(&request.sections, &rule);
    let name = request
        .name
        .map(|n| n.trim().to_string())
        .unwrap_or_else(|| format!("{label}-preset"));

    Ok(Json(TimelineConfig::from_result(name, &result)))
}

/// Picks the rule for a request: an explicit rule, a named preset, or the
/// configured default. Returns the rule with a label for logging and naming.
fn resolve_rule(
    state: &AppState,
    rule: Option<LayoutRule>,
    preset: Option<&str>,
) -> Result<(LayoutRule, String), AppError> {
    match (rule, preset) {
        (Some(_), Some(_)) => Err(AppError::Validation(
            "specify either rule or preset, not both".to_string(),
        )),
        (Some(rule), None) => Ok((rule, "custom".to_string())),
        (None, Some(name)) => {
            let preset: LayoutPreset = name.parse()?;
            Ok((preset.rule(), preset.name().to_string()))
        }
        (None, None) => Ok((
            state.default_rule,
            state.config.layout_preset.name().to_string(),
        )),
    }
}
