#![forbid(unsafe_code)]

//! Combined layout and viewport configuration.

use orbit_layout::{LayoutConfig, LayoutConfigError};
use orbit_viewport::{ViewportConfig, ViewportConfigError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level configuration document.
///
/// ```json
/// { "layout": { "bubble_radius": 60 }, "viewport": { "zoom_max": 3 } }
/// ```
///
/// Every field is optional and falls back to its default.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrbitConfig {
    pub layout: LayoutConfig,
    pub viewport: ViewportConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("layout: {0}")]
    Layout(#[from] LayoutConfigError),
    #[error("viewport: {0}")]
    Viewport(#[from] ViewportConfigError),
}

impl OrbitConfig {
    /// Parse and validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        self.viewport.validate()?;
        Ok(())
    }
}
