use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Smallest tile edge the adaptive threshold will accept.
pub const MIN_TILE_SIZE: u32 = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tuning knobs for [`crate::preprocess::binarize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BinarizationConfig {
    /// Images wider than this are downscaled (aspect preserved) first.
    pub max_width: u32,
    /// Applied to luminance as `255 * (y / 255) ^ gamma`; 1.0 disables it.
    pub gamma: f32,
    pub unsharp_amount: f32,
    pub tile_size: u32,
    /// A pixel is white when it is no darker than its tile mean minus this.
    pub tile_offset: i32,
    pub morph_close: bool,
}

impl Default for BinarizationConfig {
    fn default() -> Self {
        Self {
            max_width: 2000,
            gamma: 1.0,
            unsharp_amount: 0.6,
            tile_size: 32,
            tile_offset: 10,
            morph_close: true,
        }
    }
}

impl BinarizationConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_content)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Copy with out-of-range values pulled back into range.
    pub(crate) fn sanitized(&self) -> Self {
        let mut cfg = self.clone();
        if cfg.tile_size < MIN_TILE_SIZE {
            tracing::warn!(tile_size = cfg.tile_size, "tile_size below minimum, using {MIN_TILE_SIZE}");
            cfg.tile_size = MIN_TILE_SIZE;
        }
        if cfg.max_width == 0 {
            tracing::warn!("max_width of 0 is not usable, using 1");
            cfg.max_width = 1;
        }
        if !cfg.gamma.is_finite() || cfg.gamma <= 0.0 {
            tracing::warn!(gamma = cfg.gamma, "gamma must be positive, disabling");
            cfg.gamma = 1.0;
        }
        if !cfg.unsharp_amount.is_finite() {
            tracing::warn!("unsharp_amount is not finite, disabling sharpening");
            cfg.unsharp_amount = 0.0;
        }
        cfg
    }
}
