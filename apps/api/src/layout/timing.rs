//! Fitted timeline output: per-section timings and the assembled result.
//!
//! The JSON shape `{"totalSec":N,"timeline":[{"name":..,"start":..,"end":..}]}` is
//! the interchange contract for presentation and persistence collaborators.
//! Parsing re-checks every invariant the engine guarantees.
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use crate::errors::LayoutError;
use crate::layout::rule::LayoutRule;
use crate::layout::spec::{END_NAME, HOOK_NAME};

// ────────────────────────────────────────────────────────────────────────────
// SectionTiming
// ────────────────────────────────────────────────────────────────────────────

/// Timing of a single section after fitting. `start` is inclusive, `end` exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSectionTiming")]
pub struct SectionTiming {
    name: String,
    #[serde(rename = "start")]
    start_sec: u32,
    #[serde(rename = "end")]
    end_sec: u32,
}

#[derive(Debug, Deserialize)]
struct RawSectionTiming {
    name: String,
    start: u32,
    end: u32,
}

impl TryFrom<RawSectionTiming> for SectionTiming {
    type Error = LayoutError;

    fn try_from(raw: RawSectionTiming) -> Result<Self, Self::Error> {
        SectionTiming::new(raw.name, raw.start, raw.end)
    }
}

impl SectionTiming {
    pub fn new(name: impl Into<String>, start_sec: u32, end_sec: u32) -> Result<Self, LayoutError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(LayoutError::EmptySectionName);
        }
        if end_sec < start_sec {
            return Err(LayoutError::InvertedTiming {
                name,
                start: start_sec,
                end: end_sec,
            });
        }
        Ok(Self {
            name,
            start_sec,
            end_sec,
        })
    }

    /// Engine-side constructor for timings whose name and range are already known
    /// to be valid.
    pub(super) fn assembled(name: String, start_sec: u32, end_sec: u32) -> Self {
        debug_assert!(end_sec >= start_sec);
        Self {
            name,
            start_sec,
            end_sec,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_sec(&self) -> u32 {
        self.start_sec
    }

    pub fn end_sec(&self) -> u32 {
        self.end_sec
    }

    pub fn duration(&self) -> u32 {
        self.end_sec - self.start_sec
    }

    pub fn with_bounds(&self, start_sec: u32, end_sec: u32) -> Result<Self, LayoutError> {
        Self::new(self.name.clone(), start_sec, end_sec)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// LayoutResult
// ────────────────────────────────────────────────────────────────────────────

/// Total length plus the ordered, contiguous timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLayoutResult", rename_all = "camelCase")]
pub struct LayoutResult {
    total_sec: u32,
    timeline: Vec<SectionTiming>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLayoutResult {
    total_sec: u32,
    timeline: Vec<SectionTiming>,
}

impl TryFrom<RawLayoutResult> for LayoutResult {
    type Error = LayoutError;

    fn try_from(raw: RawLayoutResult) -> Result<Self, Self::Error> {
        let result = LayoutResult::from_timeline(raw.timeline)?;
        if result.total_sec != raw.total_sec {
            return Err(LayoutError::TotalMismatch {
                declared: raw.total_sec,
                actual: result.total_sec,
            });
        }
        Ok(result)
    }
}

impl LayoutResult {
    /// Builds a result from an ordered timeline, checking that it starts at zero,
    /// has no gaps or overlaps, and is bracketed by `HOOK` and `END`. The total is
    /// the last section's end.
    pub fn from_timeline(timeline: Vec<SectionTiming>) -> Result<Self, LayoutError> {
        let mut cursor = 0;
        for (index, timing) in timeline.iter().enumerate() {
            if timing.start_sec != cursor {
                return Err(LayoutError::NonContiguous { index });
            }
            cursor = timing.end_sec;
        }
        if timeline.first().map(SectionTiming::name) != Some(HOOK_NAME) {
            return Err(LayoutError::MissingBracket {
                expected: HOOK_NAME,
            });
        }
        if timeline.len() < 2 || timeline.last().map(SectionTiming::name) != Some(END_NAME) {
            return Err(LayoutError::MissingBracket { expected: END_NAME });
        }
        Ok(Self {
            total_sec: cursor,
            timeline,
        })
    }

    /// Engine-side constructor; the caller laid the timeline out contiguously.
    pub(super) fn assembled(timeline: Vec<SectionTiming>) -> Self {
        let total_sec = timeline.last().map_or(0, |t| t.end_sec);
        Self {
            total_sec,
            timeline,
        }
    }

    pub fn total_sec(&self) -> u32 {
        self.total_sec
    }

    pub fn timeline(&self) -> &[SectionTiming] {
        &self.timeline
    }

    /// Case-insensitive lookup by section name; first match wins.
    pub fn find(&self, name: &str) -> Option<&SectionTiming> {
        self.timeline
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Whether the fitted total landed inside the rule's window. The engine returns
    /// a best-effort result when bounds conflict, so callers that need a hard
    /// guarantee check this.
    pub fn is_within(&self, rule: &LayoutRule) -> bool {
        rule.contains(self.total_sec)
    }

    pub fn to_json(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        Ok(serde_json::from_str(json)?)
    }
}
