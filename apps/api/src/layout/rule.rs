//! Global window constraints for the layout fitter.
#![allow(dead_code)]

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::LayoutError;

/// Allowed total-duration window plus the auto-add policy.
///
/// Both bounds are inclusive. `max_total_sec >= min_total_sec` holds for every
/// value of this type; derivations return new rules and never mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawLayoutRule", rename_all = "camelCase")]
pub struct LayoutRule {
    min_total_sec: u32,
    max_total_sec: u32,
    allow_auto_add: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLayoutRule {
    min_total_sec: u32,
    max_total_sec: u32,
    #[serde(default)]
    allow_auto_add: bool,
}

impl TryFrom<RawLayoutRule> for LayoutRule {
    type Error = LayoutError;

    fn try_from(raw: RawLayoutRule) -> Result<Self, Self::Error> {
        LayoutRule::new(raw.min_total_sec, raw.max_total_sec, raw.allow_auto_add)
    }
}

impl LayoutRule {
    pub fn new(
        min_total_sec: u32,
        max_total_sec: u32,
        allow_auto_add: bool,
    ) -> Result<Self, LayoutError> {
        if max_total_sec < min_total_sec {
            return Err(LayoutError::InvertedWindow {
                min: min_total_sec,
                max: max_total_sec,
            });
        }
        Ok(Self {
            min_total_sec,
            max_total_sec,
            allow_auto_add,
        })
    }

    /// Vertical short-form window: 30–59s, auto-add enabled.
    pub const fn shorts() -> Self {
        Self {
            min_total_sec: 30,
            max_total_sec: 59,
            allow_auto_add: true,
        }
    }

    /// Two-minute long-form window: 90–120s, auto-add enabled.
    pub const fn long_form() -> Self {
        Self {
            min_total_sec: 90,
            max_total_sec: 120,
            allow_auto_add: true,
        }
    }

    pub fn min_total_sec(&self) -> u32 {
        self.min_total_sec
    }

    pub fn max_total_sec(&self) -> u32 {
        self.max_total_sec
    }

    pub fn allow_auto_add(&self) -> bool {
        self.allow_auto_add
    }

    /// Integer midpoint of the window, rounded toward the minimum.
    pub fn midpoint(&self) -> u32 {
        self.min_total_sec + (self.max_total_sec - self.min_total_sec) / 2
    }

    pub fn contains(&self, total_sec: u32) -> bool {
        (self.min_total_sec..=self.max_total_sec).contains(&total_sec)
    }

    pub fn with_window(&self, min_total_sec: u32, max_total_sec: u32) -> Result<Self, LayoutError> {
        Self::new(min_total_sec, max_total_sec, self.allow_auto_add)
    }

    pub fn with_auto_add(&self, allow_auto_add: bool) -> Self {
        Self {
            allow_auto_add,
            ..*self
        }
    }
}

impl fmt::Display for LayoutRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}–{}s (auto-add {})",
            self.min_total_sec,
            self.max_total_sec,
            if self.allow_auto_add { "on" } else { "off" }
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Presets
// ────────────────────────────────────────────────────────────────────────────

/// Named rule presets, addressable from config and request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutPreset {
    Shorts,
    LongForm,
}

impl LayoutPreset {
    pub const fn all() -> [LayoutPreset; 2] {
        [LayoutPreset::Shorts, LayoutPreset::LongForm]
    }

    pub const fn name(self) -> &'static str {
        match self {
            LayoutPreset::Shorts => "shorts",
            LayoutPreset::LongForm => "long-form",
        }
    }

    pub const fn rule(self) -> LayoutRule {
        match self {
            LayoutPreset::Shorts => LayoutRule::shorts(),
            LayoutPreset::LongForm => LayoutRule::long_form(),
        }
    }
}

impl FromStr for LayoutPreset {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shorts" => Ok(LayoutPreset::Shorts),
            "long-form" | "long_form" | "longform" => Ok(LayoutPreset::LongForm),
            other => Err(LayoutError::UnknownPreset(other.to_string())),
        }
    }
}

impl fmt::Display for LayoutPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
