//! Fixed / percent / weighted-remainder splitter.
//!
//! FIXED specs take their value in seconds, PERCENT specs a share of the total,
//! and AUTO specs split whatever is left by weight. Durations snap to a grid and a
//! single correction pass nudges them toward the exact grid total. An optional
//! trailing spec (usually the CTA) is pinned to the end of the plan.

use tracing::{debug, warn};

use crate::allocator::plan::{Segment, VideoPlan};
use crate::allocator::spec::{AllocMode, AllocSpec};

/// Builds a plan over `total_seconds`. Both `total_seconds` and `snap` are
/// floored to 1.
pub fn allocate(
    total_seconds: i64,
    specs: &[AllocSpec],
    trailing: Option<&AllocSpec>,
    snap: i64,
) -> VideoPlan {
    let total = total_seconds.clamp(1, i64::from(u32::MAX));
    let snap = snap.clamp(1, i64::from(u32::MAX));
    let total_f = total as f64;

    let mut fixed_sum = 0.0;
    let mut percent_sum = 0.0;
    let mut auto_weight = 0.0;
    for spec in specs {
        match spec.mode {
            AllocMode::Fixed => fixed_sum += spec.value,
            AllocMode::Percent => percent_sum += spec.value,
            AllocMode::Auto => auto_weight += spec.value.max(0.0),
        }
    }

    let trailing_seconds = trailing.map_or(0.0, |t| t.value);
    let percent_seconds = percent_sum / 100.0 * total_f;
    let remainder = (total_f - fixed_sum - percent_seconds - trailing_seconds).max(0.0);

    let mut durations: Vec<i64> = specs
        .iter()
        .map(|spec| {
            let raw = match spec.mode {
                AllocMode::Fixed => spec.value,
                AllocMode::Percent => spec.value / 100.0 * total_f,
                AllocMode::Auto if auto_weight <= 0.0 => 0.0,
                AllocMode::Auto => spec.value / auto_weight * remainder,
            };
            snap_to_grid(raw, snap)
        })
        .collect();

    let target = (total / snap * snap).saturating_sub(snap_to_grid(trailing_seconds, snap));
    let drift = correct_drift(&mut durations, target, snap);
    if drift != 0 {
        debug!(drift, target, "snap drift left after correction pass");
    }

    let mut plan = VideoPlan::new(total as u32);
    let mut cursor = 0i64;
    for (spec, &duration) in specs.iter().zip(&durations) {
        if duration <= 0 {
            continue;
        }
        let start = cursor;
        let end = cursor.saturating_add(duration).min(total);
        if end <= start {
            continue;
        }
        plan.push(segment(spec, start, end));
        cursor = end;
    }

    if let Some(spec) = trailing {
        let duration = snap_to_grid(trailing_seconds, snap);
        if trailing_seconds > 0.0 && duration > 0 {
            let start = total.saturating_sub(duration).max(0);
            if start < cursor {
                warn!(
                    id = %spec.id,
                    start,
                    body_end = cursor,
                    "trailing segment overlaps the body; plan will fail validation"
                );
            }
            plan.push(segment(spec, start, total));
        }
    }

    plan
}

/// Rounds to the nearest multiple of `snap`; halves round up. Out-of-range values
/// saturate and NaN snaps to zero.
fn snap_to_grid(seconds: f64, snap: i64) -> i64 {
    let units = (seconds / snap as f64 + 0.5).floor() as i64;
    units.saturating_mul(snap)
}

/// Walks the durations once in order, moving each by one `snap` toward `target`
/// while drift remains. A step that would make a duration negative is skipped.
/// Returns the drift left over.
fn correct_drift(durations: &mut [i64], target: i64, snap: i64) -> i64 {
    let used = durations.iter().fold(0i64, |acc, &d| acc.saturating_add(d));
    let mut diff = target.saturating_sub(used);
    for duration in durations.iter_mut() {
        if diff == 0 {
            break;
        }
        let adjust = if diff > 0 { snap } else { -snap };
        if let Some(candidate) = duration.checked_add(adjust).filter(|&c| c >= 0) {
            *duration = candidate;
            diff -= adjust;
        }
    }
    diff
}

fn segment(spec: &AllocSpec, start: i64, end: i64) -> Segment {
    Segment {
        id: spec.id.clone(),
        segment_type: spec.segment_type,
        start_sec: start as u32,
        end_sec: end as u32,
        text: spec.text.clone(),
    }
}
