//! Section descriptors: the input side of the layout fitter.
//!
//! A `SectionSpec` is immutable once built. Malformed numeric fields coming from
//! free-form input are normalized rather than rejected:
//! - non-finite or non-positive weight → 1.0
//! - negative bounds → absent
//! - `max < min` → max dropped
//!
//! Only an empty name is a construction error.
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use crate::errors::LayoutError;

pub const HOOK_NAME: &str = "HOOK";
pub const END_NAME: &str = "END";

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Where a section sits in the timeline bracket.
///
/// `Hook` and `End` are locked: the fitter never prunes them and only places
/// them first and last respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionRole {
    Hook,
    Body,
    End,
}

impl SectionRole {
    /// Role implied by a section name. Only the exact bracket names are special.
    pub fn from_name(name: &str) -> Self {
        match name {
            HOOK_NAME => SectionRole::Hook,
            END_NAME => SectionRole::End,
            _ => SectionRole::Body,
        }
    }

    pub fn is_locked(self) -> bool {
        !matches!(self, SectionRole::Body)
    }

    /// Bounds applied when a spec leaves min or max unset.
    pub fn default_bounds(self) -> (u32, u32) {
        match self {
            SectionRole::Hook => (3, 10),
            SectionRole::Body => (3, 15),
            SectionRole::End => (2, 6),
        }
    }

    /// Weight given to a bracket section the fitter has to synthesize.
    pub fn synthesized_weight(self) -> f64 {
        match self {
            SectionRole::Hook => 2.0,
            SectionRole::Body => 1.0,
            SectionRole::End => 0.7,
        }
    }
}

/// Describes one section before fitting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSectionSpec", rename_all = "camelCase")]
pub struct SectionSpec {
    name: String,
    #[serde(skip_serializing)]
    role: SectionRole,
    weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    min_sec: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_sec: Option<u32>,
}

/// Wire form accepted from callers; normalized through `SectionSpec::new`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSectionSpec {
    name: String,
    #[serde(default = "default_weight")]
    weight: f64,
    #[serde(default)]
    min_sec: Option<i64>,
    #[serde(default)]
    max_sec: Option<i64>,
}

fn default_weight() -> f64 {
    1.0
}

impl TryFrom<RawSectionSpec> for SectionSpec {
    type Error = LayoutError;

    fn try_from(raw: RawSectionSpec) -> Result<Self, Self::Error> {
        SectionSpec::new(raw.name, raw.weight, raw.min_sec, raw.max_sec)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Construction
// ────────────────────────────────────────────────────────────────────────────

impl SectionSpec {
    pub fn new(
        name: impl Into<String>,
        weight: f64,
        min_sec: Option<i64>,
        max_sec: Option<i64>,
    ) -> Result<Self, LayoutError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(LayoutError::EmptySectionName);
        }

        let min_sec = min_sec.and_then(non_negative);
        let mut max_sec = max_sec.and_then(non_negative);
        if let (Some(mn), Some(mx)) = (min_sec, max_sec) {
            if mx < mn {
                max_sec = None;
            }
        }

        Ok(Self {
            role: SectionRole::from_name(&name),
            name,
            weight: normalize_weight(weight),
            min_sec,
            max_sec,
        })
    }

    /// Unbounded section with the given weight.
    pub fn weighted(name: impl Into<String>, weight: f64) -> Result<Self, LayoutError> {
        Self::new(name, weight, None, None)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> SectionRole {
        self.role
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn min_sec(&self) -> Option<u32> {
        self.min_sec
    }

    pub fn max_sec(&self) -> Option<u32> {
        self.max_sec
    }

    pub fn with_name(&self, name: impl Into<String>) -> Result<Self, LayoutError> {
        Self::new(
            name,
            self.weight,
            self.min_sec.map(i64::from),
            self.max_sec.map(i64::from),
        )
    }

    pub fn with_weight(&self, weight: f64) -> Self {
        Self {
            weight: normalize_weight(weight),
            ..self.clone()
        }
    }

    pub fn with_bounds(&self, min_sec: Option<i64>, max_sec: Option<i64>) -> Self {
        let min_sec = min_sec.and_then(non_negative);
        let mut max_sec = max_sec.and_then(non_negative);
        if let (Some(mn), Some(mx)) = (min_sec, max_sec) {
            if mx < mn {
                max_sec = None;
            }
        }
        Self {
            min_sec,
            max_sec,
            ..self.clone()
        }
    }
}

fn normalize_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        1.0
    }
}

fn non_negative(v: i64) -> Option<u32> {
    u32::try_from(v).ok()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
