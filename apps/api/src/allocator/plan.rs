//! Allocated video plan: ordered segments over a fixed total.
#![allow(dead_code)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::allocator::spec::SegmentType;
use crate::errors::PlanError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: String,
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    #[serde(rename = "start")]
    pub start_sec: u32,
    #[serde(rename = "end")]
    pub end_sec: u32,
    pub text: String,
}

impl Segment {
    pub fn duration(&self) -> u32 {
        self.end_sec.saturating_sub(self.start_sec)
    }
}

/// Display-only metadata a caller may attach to a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub niche: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cta: Option<String>,
}

impl PlanMeta {
    pub fn is_empty(&self) -> bool {
        self.topic.is_none()
            && self.niche.is_none()
            && self.style.is_none()
            && self.hook.is_none()
            && self.cta.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPlan {
    total_seconds: u32,
    segments: Vec<Segment>,
    #[serde(default, skip_serializing_if = "PlanMeta::is_empty")]
    meta: PlanMeta,
}

impl VideoPlan {
    /// Empty plan; the total is floored to one second.
    pub fn new(total_seconds: u32) -> Self {
        Self {
            total_seconds: total_seconds.max(1),
            segments: Vec::new(),
            meta: PlanMeta::default(),
        }
    }

    pub fn with_meta(mut self, meta: PlanMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn meta(&self) -> &PlanMeta {
        &self.meta
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// Checks ranges, ordering and the total. Reports the first offending segment.
    pub fn validate(&self) -> Result<(), PlanError> {
        let mut last_end = 0;
        for s in &self.segments {
            if s.start_sec >= s.end_sec {
                return Err(PlanError::InvalidRange { id: s.id.clone() });
            }
            if s.start_sec < last_end {
                return Err(PlanError::Overlap { id: s.id.clone() });
            }
            if s.end_sec > self.total_seconds {
                return Err(PlanError::ExceedsTotal { id: s.id.clone() });
            }
            last_end = s.end_sec;
        }
        Ok(())
    }

    /// SRT-style caption file, one cue per segment.
    pub fn to_srt(&self) -> String {
        let mut out = String::new();
        for (index, s) in self.segments.iter().enumerate() {
            out.push_str(&format!(
                "{}\n{} --> {}\n{}\n\n",
                index + 1,
                srt_timestamp(s.start_sec),
                srt_timestamp(s.end_sec),
                s.text
            ));
        }
        out
    }
}

fn srt_timestamp(sec: u32) -> String {
    let h = sec / 3600;
    let m = (sec % 3600) / 60;
    let s = sec % 60;
    format!("{h:02}:{m:02}:{s:02},000")
}

impl fmt::Display for VideoPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Video Plan Draft")?;
        let labelled = [
            ("Topic", &self.meta.topic),
            ("Niche", &self.meta.niche),
            ("Style", &self.meta.style),
            ("Hook", &self.meta.hook),
            ("CTA", &self.meta.cta),
        ];
        for (label, value) in labelled {
            if let Some(value) = value {
                writeln!(f, "{label}: {value}")?;
            }
        }
        writeln!(f, "Total: {}s", self.total_seconds)?;
        writeln!(f)?;

        for s in &self.segments {
            writeln!(
                f,
                "{:02}-{:02} [{}] {}: {}",
                s.start_sec, s.end_sec, s.id, s.segment_type, s.text
            )?;
        }
        Ok(())
    }
}
