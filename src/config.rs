//! Editor configuration: a single optional TOML file.
//!
//! Stock defaults match the interactive editor this engine grew out of:
//! JPEG quality 90, shortest-side target 800, standard display density.
//! Every field is optional in the file; unknown keys are an error so typos
//! fail loudly instead of silently using a default.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Lossy encoding quality for all outputs (1-100).
    pub quality: u32,
    /// Default shortest-side target for batch resize.
    pub shortest_side: u32,
    /// Default device-pixel-ratio multiplier for crops.
    pub pixel_ratio: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            quality: 90,
            shortest_side: 800,
            pixel_ratio: 1.0,
        }
    }
}

impl EditorConfig {
    /// Load from a TOML file, or stock defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }
}

/// A documented stock config, printed by `pixtray gen-config`.
pub fn stock_config_toml() -> String {
    let stock = EditorConfig::default();
    format!(
        "\
# pixtray configuration. Every key is optional; these are the stock values.

# Lossy encoding quality for all outputs (1-100).
quality = {}

# Default shortest-side target for batch resize, in pixels.
shortest_side = {}

# Default device-pixel-ratio multiplier for crops. Set to 2.0 when crop
# rectangles come from a high-density display.
pixel_ratio = {:.1}
",
        stock.quality, stock.shortest_side, stock.pixel_ratio
    )
}
