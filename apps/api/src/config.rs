use anyhow::{Context, Result};

use crate::layout::LayoutPreset;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Rule preset applied when a layout request names neither a rule nor a preset.
    pub layout_preset: LayoutPreset,
    /// Snap granularity (seconds) applied when an allocate request omits `snap`.
    pub allocator_snap: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "8080".to_string())
            .parse::<u16>()
            .context("PORT must be a valid port number")?;

        let layout_preset = lookup("LAYOUT_PRESET")
            .unwrap_or_else(|| "shorts".to_string())
            .parse::<LayoutPreset>()
            .context("LAYOUT_PRESET must be 'shorts' or 'long-form'")?;

        let allocator_snap = lookup("ALLOCATOR_SNAP")
            .unwrap_or_else(|| "1".to_string())
            .parse::<u32>()
            .context("ALLOCATOR_SNAP must be a positive integer")?;
        if allocator_snap == 0 {
            anyhow::bail!("ALLOCATOR_SNAP must be at least 1");
        }

        Ok(Config {
            port,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            layout_preset,
            allocator_snap,
        })
    }
}
