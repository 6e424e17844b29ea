//! Marker export model: the preset-labelled shape editors and persistence
//! collaborators exchange for a fitted timeline.
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

use crate::layout::timing::LayoutResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub section_name: String,
    pub start_sec: u32,
    pub end_sec: u32,
    pub duration_sec: u32,
}

/// A named, ordered set of markers (e.g. `"shorts-preset"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineConfig {
    pub name: String,
    pub markers: Vec<Marker>,
}

impl TimelineConfig {
    pub fn from_result(name: impl Into<String>, result: &LayoutResult) -> Self {
        let markers = result
            .timeline()
            .iter()
            .map(|t| Marker {
                section_name: t.name().to_string(),
                start_sec: t.start_sec(),
                end_sec: t.end_sec(),
                duration_sec: t.duration(),
            })
            .collect();

        Self {
            name: name.into(),
            markers,
        }
    }

    pub fn total_sec(&self) -> u32 {
        self.markers.last().map_or(0, |m| m.end_sec)
    }
}
