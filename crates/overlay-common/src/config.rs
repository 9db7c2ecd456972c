//! Overlay configuration surface.
//!
//! A config can be loaded from JSON or YAML:
//!
//! ```yaml
//! colorScale: viridis
//! domain: [250.0, 310.0]
//! clampLow: false
//! noDataValue: -9999
//! renderMode: sequential
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::Domain;
use crate::error::OverlayResult;

/// How frames are composited. Chosen once when a context is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Stateless per-pixel kernel evaluated over a worker pool.
    #[default]
    Parallel,
    /// Row-major scalar loop on the calling thread.
    Sequential,
}

/// A single gradient stop as it appears in config files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorStopSpec {
    /// Normalized position in `[0, 1]`
    pub position: f64,
    /// CSS hex color (`#rgb`, `#rrggbb` or `#rrggbbaa`)
    pub color: String,
}

/// How the color scale is specified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorScaleSpec {
    /// Name of a registered scale
    Name(String),
    /// Explicit gradient stops
    Stops(Vec<ColorStopSpec>),
    /// Precomputed 256-entry RGBA table (1024 bytes)
    Lut(Vec<u8>),
}

impl Default for ColorScaleSpec {
    fn default() -> Self {
        ColorScaleSpec::Name(default_color_scale())
    }
}

fn default_color_scale() -> String {
    "viridis".to_string()
}

fn default_domain() -> Vec<f64> {
    vec![0.0, 1.0]
}

fn default_clamp_low() -> bool {
    true
}

/// Overlay rendering options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayConfig {
    #[serde(default)]
    pub color_scale: ColorScaleSpec,

    #[serde(default = "default_domain")]
    pub domain: Vec<f64>,

    #[serde(default = "default_clamp_low")]
    pub clamp_low: bool,

    /// Defaults to `clamp_low` when absent.
    #[serde(default)]
    pub clamp_high: Option<bool>,

    #[serde(default)]
    pub no_data_value: Option<f64>,

    #[serde(default)]
    pub render_mode: RenderMode,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            color_scale: ColorScaleSpec::default(),
            domain: default_domain(),
            clamp_low: default_clamp_low(),
            clamp_high: None,
            no_data_value: None,
            render_mode: RenderMode::default(),
        }
    }
}

impl OverlayConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> OverlayResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a config from a YAML string.
    pub fn from_yaml(yaml: &str) -> OverlayResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a config file; `.yaml`/`.yml` are read as YAML, anything else as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> OverlayResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Resolved upper clamp flag.
    pub fn clamp_high(&self) -> bool {
        self.clamp_high.unwrap_or(self.clamp_low)
    }

    /// Validated domain including clamp flags.
    pub fn domain(&self) -> OverlayResult<Domain> {
        Ok(Domain::from_slice(&self.domain)?.with_clamp(self.clamp_low, self.clamp_high()))
    }
}
