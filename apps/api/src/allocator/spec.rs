//! Input descriptors for the fixed/percent/weighted splitter.
#![allow(dead_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a segment is for. Carried through to the plan untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentType {
    Hook,
    Step,
    Cta,
    Other,
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SegmentType::Hook => "HOOK",
            SegmentType::Step => "STEP",
            SegmentType::Cta => "CTA",
            SegmentType::Other => "OTHER",
        })
    }
}

/// How `AllocSpec::value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocMode {
    /// `value` is seconds.
    Fixed,
    /// `value` is a percentage (0–100) of the total.
    Percent,
    /// `value` is a relative weight over whatever time is left.
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    #[serde(default)]
    pub text: String,
    pub mode: AllocMode,
    pub value: f64,
}

impl AllocSpec {
    pub fn new(
        id: impl Into<String>,
        segment_type: SegmentType,
        text: impl Into<String>,
        mode: AllocMode,
        value: f64,
    ) -> Self {
        Self {
            id: id.into(),
            segment_type,
            text: text.into(),
            mode,
            value,
        }
    }

    pub fn fixed(id: impl Into<String>, segment_type: SegmentType, seconds: f64) -> Self {
        Self::new(id, segment_type, "", AllocMode::Fixed, seconds)
    }

    pub fn percent(id: impl Into<String>, segment_type: SegmentType, percent: f64) -> Self {
        Self::new(id, segment_type, "", AllocMode::Percent, percent)
    }

    pub fn auto(id: impl Into<String>, segment_type: SegmentType, weight: f64) -> Self {
        Self::new(id, segment_type, "", AllocMode::Auto, weight)
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}
