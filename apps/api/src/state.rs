use crate::config::Config;
use crate::layout::LayoutRule;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Read-only after startup; every allocator call works on its own copies.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Config,
    /// Rule resolved from `config.layout_preset`.
    pub default_rule: LayoutRule,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let default_rule = config.layout_preset.rule();
        Self {
            config,
            default_rule,
        }
    }
}
