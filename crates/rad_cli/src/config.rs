//! Run configuration loaded from JSON.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rad_core::SubdivisionConfig;
use rad_solver::{DebugView, RadiosityConfig};
use serde::Deserialize;

/// Everything one invocation of `rad` needs.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub radiosity: RadiosityConfig,
    pub subdivision: SubdivisionConfig,
    /// Emit the smooth-shaded vertex stream instead of flat patches
    pub interpolate: bool,
    /// Where to write raw vertex records
    pub vertex_output: Option<PathBuf>,
    /// Where to write the timing report
    pub timing_report: Option<PathBuf>,
    /// Paint a debug view instead of solving
    pub debug_view: Option<DebugView>,
}

impl RunConfig {
    /// Load a configuration file. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("Failed to parse config {}", path.display()))
    }
}
