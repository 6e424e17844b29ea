// Timeline allocator: splits a fixed total across FIXED / PERCENT / AUTO specs.
// Implements: snap-to-grid rounding, single-pass drift correction, trailing CTA
// pinned to the end, plan validation and SRT export.

pub mod engine;
pub mod handlers;
pub mod plan;
pub mod spec;
