//! Weight-proportional timeline fitter.
//!
//! # Phases
//! 1. Bracket: ensure a locked HOOK first and a locked END last.
//! 2. Allocate toward the midpoint of the rule's window, proportional to weight,
//!    clamped to each section's bounds.
//! 3. Grow round-robin (+1s per step) while under the minimum.
//! 4. Shrink unlocked sections round-robin while over the maximum, then prune whole
//!    unlocked sections by lowest value density.
//! 5. If still short and the rule allows it, insert one `SECTIONk` before END,
//!    re-allocate toward the minimum and grow again.
//! 6. Assemble a contiguous timeline from t=0.
//!
//! `layout` never fails. When bounds contradict the window the closest achievable
//! timeline is returned; callers check `LayoutResult::is_within` if they need more.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::layout::rule::LayoutRule;
use crate::layout::spec::{SectionRole, SectionSpec, END_NAME, HOOK_NAME};
use crate::layout::timing::{LayoutResult, SectionTiming};

/// Upper bound on round-robin passes; only reached when every candidate saturates.
const MAX_PASSES: u32 = 10_000;

const AUTO_SECTION_PREFIX: &str = "SECTION";

// ────────────────────────────────────────────────────────────────────────────
// Working state
// ────────────────────────────────────────────────────────────────────────────

/// Per-call mutable record for one section. Lives in a local `Vec` for the
/// duration of a single `layout` call.
#[derive(Debug, Clone)]
struct WorkingSection {
    name: String,
    role: SectionRole,
    weight: f64,
    min: u32,
    max: u32,
    alloc: u32,
}

impl WorkingSection {
    fn from_spec(spec: &SectionSpec, role: SectionRole) -> Self {
        let (default_min, default_max) = role.default_bounds();
        Self::bounded(
            spec.name().to_string(),
            role,
            spec.weight(),
            spec.min_sec().unwrap_or(default_min),
            spec.max_sec().unwrap_or(default_max),
        )
    }

    fn synthesized(name: impl Into<String>, role: SectionRole) -> Self {
        let (min, max) = role.default_bounds();
        Self::bounded(name.into(), role, role.synthesized_weight(), min, max)
    }

    fn bounded(name: String, role: SectionRole, weight: f64, min: u32, max: u32) -> Self {
        Self {
            name,
            role,
            weight,
            min,
            // A spec minimum above the role default maximum wins.
            max: max.max(min),
            alloc: 0,
        }
    }

    fn locked(&self) -> bool {
        self.role.is_locked()
    }

    fn can_grow(&self) -> bool {
        self.alloc < self.max
    }

    fn can_shrink(&self) -> bool {
        !self.locked() && self.alloc > self.min
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry point
// ────────────────────────────────────────────────────────────────────────────

/// Fits the ordered specs into the rule's window.
pub fn layout(specs: &[SectionSpec], rule: &LayoutRule) -> LayoutResult {
    let min_total = u64::from(rule.min_total_sec());
    let max_total = u64::from(rule.max_total_sec());

    let mut sections = bracket(specs);
    allocate_proportional(&mut sections, rule.midpoint());
    let mut sum = total_alloc(&sections);
    debug!(sections = sections.len(), sum, target = rule.midpoint(), "initial allocation");

    if sum < min_total {
        let left = grow(&mut sections, min_total - sum);
        sum = total_alloc(&sections);
        debug!(sum, unfilled = left, "grew toward minimum");
    }

    if sum > max_total {
        let over = shrink(&mut sections, sum - max_total);
        if over > 0 {
            prune(&mut sections, over);
        }
        sum = total_alloc(&sections);
        debug!(sum, sections = sections.len(), "shrank toward maximum");
    }

    if sum < min_total && rule.allow_auto_add() {
        let name = next_auto_section_name(&sections);
        debug!(section = %name, sum, "auto-adding section before END");
        // bracket() guarantees END is the last element.
        let end_index = sections.len() - 1;
        sections.insert(end_index, WorkingSection::synthesized(name, SectionRole::Body));

        allocate_proportional(&mut sections, rule.min_total_sec());
        let sum = total_alloc(&sections);
        if sum < min_total {
            grow(&mut sections, min_total - sum);
        }
    }

    let result = assemble(sections);
    if !result.is_within(rule) {
        warn!(
            total = result.total_sec(),
            min = rule.min_total_sec(),
            max = rule.max_total_sec(),
            "section bounds saturated; returning best-effort timeline outside window"
        );
    }
    result
}

// ────────────────────────────────────────────────────────────────────────────
// Phases
// ────────────────────────────────────────────────────────────────────────────

/// Copies the specs into working sections with a locked HOOK first and a locked
/// END last, synthesizing either when the input does not supply it in place.
fn bracket(specs: &[SectionSpec]) -> Vec<WorkingSection> {
    let has_leading_hook = specs.first().is_some_and(|s| s.role() == SectionRole::Hook);
    let has_trailing_end = specs.last().is_some_and(|s| s.role() == SectionRole::End);
    let last = specs.len().saturating_sub(1);

    let mut sections = Vec::with_capacity(specs.len() + 2);
    if !has_leading_hook {
        sections.push(WorkingSection::synthesized(HOOK_NAME, SectionRole::Hook));
    }
    for (i, spec) in specs.iter().enumerate() {
        let role = match spec.role() {
            SectionRole::Hook if i == 0 => SectionRole::Hook,
            SectionRole::End if i == last => SectionRole::End,
            _ => SectionRole::Body,
        };
        sections.push(WorkingSection::from_spec(spec, role));
    }
    if !has_trailing_end {
        sections.push(WorkingSection::synthesized(END_NAME, SectionRole::End));
    }
    sections
}

/// Sets every allocation to its weight share of `target`, clamped to bounds.
fn allocate_proportional(sections: &mut [WorkingSection], target: u32) {
    let mut total_weight: f64 = sections.iter().map(|s| s.weight).sum();
    if total_weight <= 0.0 {
        total_weight = 1.0;
    }
    for s in sections.iter_mut() {
        let desired = (s.weight / total_weight * f64::from(target)).round();
        s.alloc = desired.clamp(f64::from(s.min), f64::from(s.max)) as u32;
    }
}

/// Adds one second at a time to any section below its max. Returns the unabsorbed
/// deficit.
fn grow(sections: &mut [WorkingSection], deficit: u64) -> u64 {
    round_robin(
        sections,
        deficit,
        |_| true,
        WorkingSection::can_grow,
        |s| s.alloc += 1,
    )
}

/// Removes one second at a time from unlocked sections above their minimum.
/// Returns the unabsorbed overage.
fn shrink(sections: &mut [WorkingSection], over: u64) -> u64 {
    round_robin(
        sections,
        over,
        |s| !s.locked(),
        WorkingSection::can_shrink,
        |s| s.alloc -= 1,
    )
}

/// Steps through the seeded candidates with a single running cursor. Each time the
/// cursor completes a lap of the current list, saturated candidates are dropped;
/// the cursor is not reset, so the next lap may start mid-list.
fn round_robin(
    sections: &mut [WorkingSection],
    mut remaining: u64,
    seed: impl Fn(&WorkingSection) -> bool,
    eligible: impl Fn(&WorkingSection) -> bool,
    step: impl Fn(&mut WorkingSection),
) -> u64 {
    let mut candidates: Vec<usize> = (0..sections.len())
        .filter(|&i| seed(&sections[i]))
        .collect();
    let mut cursor = 0usize;
    let mut passes = 0;

    while remaining > 0 && !candidates.is_empty() {
        let i = candidates[cursor % candidates.len()];
        if eligible(&sections[i]) {
            step(&mut sections[i]);
            remaining -= 1;
        }
        cursor += 1;
        if cursor % candidates.len() == 0 {
            passes += 1;
            candidates.retain(|&i| eligible(&sections[i]));
        }
        if passes > MAX_PASSES {
            break;
        }
    }
    remaining
}

/// Drops whole unlocked sections, lowest value density first, until the overage
/// is absorbed or nothing prunable is left.
fn prune(sections: &mut Vec<WorkingSection>, mut over: u64) {
    while over > 0 {
        let Some(victim) = lowest_value_density(sections) else {
            break;
        };
        let removed = sections.remove(victim);
        debug!(section = %removed.name, alloc = removed.alloc, "pruned section");
        over = over.saturating_sub(u64::from(removed.alloc));
    }
}

/// Index of the unlocked, non-empty section with the smallest `weight / alloc`.
/// The first minimum in order wins ties.
fn lowest_value_density(sections: &[WorkingSection]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, s) in sections.iter().enumerate() {
        if s.locked() || s.alloc == 0 {
            continue;
        }
        let density = s.weight / f64::from(s.alloc.max(1));
        if best.map_or(true, |(_, lowest)| density < lowest) {
            best = Some((i, density));
        }
    }
    best.map(|(i, _)| i)
}

fn next_auto_section_name(sections: &[WorkingSection]) -> String {
    let taken: HashSet<&str> = sections.iter().map(|s| s.name.as_str()).collect();
    (1u32..)
        .map(|k| format!("{AUTO_SECTION_PREFIX}{k}"))
        .find(|name| !taken.contains(name.as_str()))
        .unwrap_or_else(|| AUTO_SECTION_PREFIX.to_string())
}

fn assemble(sections: Vec<WorkingSection>) -> LayoutResult {
    let mut cursor = 0u32;
    let timeline = sections
        .into_iter()
        .map(|s| {
            let start = cursor;
            cursor = cursor.saturating_add(s.alloc);
            SectionTiming::assembled(s.name, start, cursor)
        })
        .collect();
    LayoutResult::assembled(timeline)
}

fn total_alloc(sections: &[WorkingSection]) -> u64 {
    sections.iter().map(|s| u64::from(s.alloc)).sum()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, weight: f64) -> SectionSpec {
        SectionSpec::weighted(name, weight).unwrap()
    }

    fn bounded(name: &str, weight: f64, min: Option<i64>, max: Option<i64>) -> SectionSpec {
        SectionSpec::new(name, weight, min, max).unwrap()
    }

    fn rule(min: u32, max: u32, auto_add: bool) -> LayoutRule {
        LayoutRule::new(min, max, auto_add).unwrap()
    }

    fn shape(result: &LayoutResult) -> Vec<(&str, u32, u32)> {
        result
            .timeline()
            .iter()
            .map(|t| (t.name(), t.start_sec(), t.end_sec()))
            .collect()
    }

    fn assert_well_formed(result: &LayoutResult) {
        let timeline = result.timeline();
        assert!(timeline.len() >= 2, "timeline must hold HOOK and END");
        assert_eq!(timeline[0].name(), "HOOK");
        assert_eq!(timeline[timeline.len() - 1].name(), "END");
        assert_eq!(timeline[0].start_sec(), 0);
        for pair in timeline.windows(2) {
            assert_eq!(pair[0].end_sec(), pair[1].start_sec(), "gap in {timeline:?}");
        }
        assert_eq!(result.total_sec(), timeline[timeline.len() - 1].end_sec());
    }

    // ── bracket ───────────────────────────────────────────────────────────────

    #[test]
    fn test_empty_input_gets_hook_and_end() {
        let result = layout(&[], &rule(5, 12, false));
        assert_well_formed(&result);
        assert_eq!(result.timeline().len(), 2);
    }

    #[test]
    fn test_existing_hook_and_end_are_adopted() {
        let specs = vec![
            bounded("HOOK", 1.0, Some(4), None),
            spec("BODY", 1.0),
            bounded("END", 1.0, None, Some(3)),
        ];
        let result = layout(&specs, &rule(10, 20, false));
        assert_well_formed(&result);
        assert_eq!(result.timeline().len(), 3);
        let hook = result.find("HOOK").unwrap().duration();
        let end = result.find("END").unwrap().duration();
        assert!((4..=10).contains(&hook), "hook {hook} outside adopted bounds");
        assert!((2..=3).contains(&end), "end {end} outside adopted bounds");
    }

    #[test]
    fn test_misplaced_bracket_names_stay_in_order() {
        let specs = vec![spec("INTRO", 1.0), spec("END", 1.0), spec("OUTRO", 1.0)];
        let result = layout(&specs, &rule(10, 40, false));
        assert_well_formed(&result);
        let names: Vec<&str> = result.timeline().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["HOOK", "INTRO", "END", "OUTRO", "END"]);
    }

    // ── scenarios ─────────────────────────────────────────────────────────────

    #[test]
    fn test_shorts_preset_three_sections() {
        let specs = vec![spec("HOOK", 2.0), spec("SECTION1", 1.0), spec("END", 0.7)];
        let result = layout(&specs, &LayoutRule::shorts());

        assert_well_formed(&result);
        assert!((30..=59).contains(&result.total_sec()));
        assert_eq!(
            shape(&result),
            vec![("HOOK", 0, 10), ("SECTION1", 10, 24), ("END", 24, 30)]
        );
    }

    #[test]
    fn test_single_section_with_fixed_window() {
        let result = layout(&[spec("X", 1.0)], &rule(10, 10, false));
        assert_well_formed(&result);
        assert_eq!(
            shape(&result),
            vec![("HOOK", 0, 5), ("X", 5, 8), ("END", 8, 10)]
        );
    }

    #[test]
    fn test_saturated_growth_is_best_effort() {
        let specs: Vec<SectionSpec> = (1..=20)
            .map(|i| bounded(&format!("S{i}"), 1.0, None, Some(3)))
            .collect();
        let result = layout(&specs, &rule(100, 100, false));

        assert_well_formed(&result);
        let body: u32 = result.timeline()[1..21].iter().map(|t| t.duration()).sum();
        assert_eq!(body, 60, "every body section saturates at its max");
        assert_eq!(result.find("HOOK").unwrap().duration(), 10);
        assert_eq!(result.find("END").unwrap().duration(), 6);
        assert_eq!(result.total_sec(), 76);
        assert!(!result.is_within(&rule(100, 100, false)));
    }

    // ── round-robin ───────────────────────────────────────────────────────────

    fn working(name: &str, min: u32, max: u32, alloc: u32) -> WorkingSection {
        WorkingSection {
            alloc,
            ..WorkingSection::bounded(name.to_string(), SectionRole::Body, 1.0, min, max)
        }
    }

    fn allocs(sections: &[WorkingSection]) -> Vec<u32> {
        sections.iter().map(|s| s.alloc).collect()
    }

    #[test]
    fn test_grow_cursor_continues_after_dropping_saturated() {
        let mut sections = vec![
            working("A", 0, 10, 0),
            working("B", 0, 10, 0),
            working("C", 0, 0, 0),
        ];
        let left = grow(&mut sections, 3);
        assert_eq!(left, 0);
        // First lap: A and B take one each, C is dropped. The cursor then sits at
        // index 1 of [A, B], so B takes the last second.
        assert_eq!(allocs(&sections), vec![1, 2, 0]);
    }

    #[test]
    fn test_shrink_cursor_continues_after_dropping_floored() {
        let mut sections = vec![
            working("A", 0, 10, 5),
            working("B", 0, 10, 5),
            working("C", 2, 10, 2),
        ];
        let left = shrink(&mut sections, 3);
        assert_eq!(left, 0);
        assert_eq!(allocs(&sections), vec![4, 3, 2]);
    }

    #[test]
    fn test_grow_reports_unabsorbed_deficit() {
        let mut sections = vec![working("A", 0, 2, 0), working("B", 0, 1, 0)];
        assert_eq!(grow(&mut sections, 10), 7);
        assert_eq!(allocs(&sections), vec![2, 1]);
    }

    #[test]
    fn test_shrink_never_touches_locked() {
        let mut sections = vec![
            WorkingSection {
                alloc: 8,
                ..WorkingSection::bounded("HOOK".to_string(), SectionRole::Hook, 1.0, 3, 10)
            },
            working("A", 3, 15, 5),
        ];
        assert_eq!(shrink(&mut sections, 5), 3);
        assert_eq!(allocs(&sections), vec![8, 3]);
    }

    // ── shrink / prune ────────────────────────────────────────────────────────

    #[test]
    fn test_shrink_spares_locked_sections() {
        let specs = vec![
            bounded("HOOK", 1.0, Some(10), Some(10)),
            spec("A", 4.0),
            spec("B", 4.0),
            spec("END", 1.0),
        ];
        let result = layout(&specs, &rule(20, 24, false));
        assert_eq!(
            shape(&result),
            vec![("HOOK", 0, 10), ("A", 10, 16), ("B", 16, 22), ("END", 22, 24)]
        );
    }

    #[test]
    fn test_prune_removes_lowest_value_density() {
        let specs = vec![
            spec("HOOK", 2.0),
            bounded("A", 1.0, Some(8), Some(8)),
            bounded("B", 3.0, Some(8), Some(8)),
            spec("END", 0.7),
        ];
        let result = layout(&specs, &rule(10, 20, false));
        assert_eq!(
            shape(&result),
            vec![("HOOK", 0, 4), ("B", 4, 12), ("END", 12, 14)]
        );
    }

    #[test]
    fn test_prune_tie_removes_first() {
        let specs = vec![
            spec("HOOK", 2.0),
            bounded("A", 1.0, Some(8), Some(8)),
            bounded("B", 1.0, Some(8), Some(8)),
            spec("END", 0.7),
        ];
        let result = layout(&specs, &rule(10, 20, false));
        let names: Vec<&str> = result.timeline().iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["HOOK", "B", "END"]);
    }

    #[test]
    fn test_prune_never_touches_locked() {
        let specs = vec![
            bounded("HOOK", 1.0, Some(30), Some(30)),
            spec("A", 1.0),
            bounded("END", 1.0, Some(30), Some(30)),
        ];
        let result = layout(&specs, &rule(0, 20, false));
        assert_eq!(shape(&result), vec![("HOOK", 0, 30), ("END", 30, 60)]);
    }

    // ── auto-add ──────────────────────────────────────────────────────────────

    #[test]
    fn test_auto_add_fills_short_timeline() {
        let result = layout(&[], &LayoutRule::shorts());
        assert_eq!(
            shape(&result),
            vec![("HOOK", 0, 10), ("SECTION1", 10, 24), ("END", 24, 30)]
        );
    }

    #[test]
    fn test_auto_add_picks_unused_name() {
        let specs = vec![bounded("SECTION1", 1.0, None, Some(3))];
        let result = layout(&specs, &LayoutRule::shorts());
        assert_eq!(
            shape(&result),
            vec![
                ("HOOK", 0, 10),
                ("SECTION1", 10, 13),
                ("SECTION2", 13, 24),
                ("END", 24, 30)
            ]
        );
    }

    #[test]
    fn test_auto_add_disabled_leaves_short_result() {
        let result = layout(&[], &LayoutRule::shorts().with_auto_add(false));
        assert_well_formed(&result);
        assert_eq!(result.timeline().len(), 2);
        assert_eq!(result.total_sec(), 16);
    }

    #[test]
    fn test_auto_add_inserts_at_most_once() {
        let result = layout(&[], &rule(200, 300, true));
        assert_well_formed(&result);
        assert_eq!(result.timeline().len(), 3);
        assert_eq!(result.timeline()[1].name(), "SECTION1");
        assert_eq!(result.timeline()[1].duration(), 15);
    }

    // ── properties ────────────────────────────────────────────────────────────

    #[test]
    fn test_invariants_across_inputs() {
        let rules = [
            LayoutRule::shorts(),
            LayoutRule::long_form(),
            rule(0, 0, false),
            rule(0, 5, true),
            rule(45, 45, true),
            rule(500, 900, false),
        ];
        let inputs: Vec<Vec<SectionSpec>> = vec![
            vec![],
            vec![spec("HOOK", 2.0)],
            vec![spec("END", 0.7)],
            vec![spec("HOOK", 1.0), spec("END", 1.0)],
            (1..=7).map(|i| spec(&format!("P{i}"), i as f64)).collect(),
            vec![
                bounded("HOOK", 5.0, Some(0), Some(1)),
                bounded("Z", 0.01, Some(40), None),
                spec("END", 9.0),
            ],
        ];
        for r in &rules {
            for specs in &inputs {
                let result = layout(specs, r);
                assert_well_formed(&result);
                assert_eq!(result, layout(specs, r), "layout must be deterministic");
            }
        }
    }

    #[test]
    fn test_result_json_round_trip() {
        let specs = vec![spec("HOOK", 2.0), spec("Tips", 1.2), spec("Demo", 1.1), spec("END", 0.7)];
        let result = layout(&specs, &LayoutRule::shorts());
        let parsed = LayoutResult::from_json(&result.to_json().unwrap()).unwrap();
        assert_eq!(shape(&parsed), shape(&result));
    }
}
