// Layout fitter: spreads a total-duration window across weighted sections.
// Implements: HOOK/END bracketing, proportional allocation, grow/shrink/prune,
// auto-added filler section, and the `{totalSec, timeline}` interchange shape.
// Everything below `handlers` is pure and synchronous.

pub mod engine;
pub mod handlers;
pub mod markers;
pub mod rule;
pub mod spec;
pub mod timing;

// Re-export the public API consumed by other modules (config, state, routes).
pub use rule::{LayoutPreset, LayoutRule};
