use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Where a dragged panel is allowed to go.
///
/// One policy applies to every panel type; `Viewport` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragBounds {
    /// Clamp the panel origin into `[0, viewport - panel_size]` on each axis.
    #[default]
    Viewport,
    /// Free dragging, including fully off-screen.
    Unbounded,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Gap between the tooltip's anchored edge and the target.
    pub offset: f64,
    /// Minimum distance kept between the tooltip and the viewport edges.
    pub margin: f64,
    /// Minimum distance between the arrow and the tooltip's corners.
    pub arrow_margin: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            offset: 12.0,
            margin: 16.0,
            arrow_margin: 16.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub min_width: f64,
    pub min_height: f64,
    pub drag_bounds: DragBounds,
    /// Edge length of the square resize grip in the bottom-right corner.
    pub grip_size: f64,
    /// Height of the draggable header strip.
    pub header_height: f64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            min_width: 200.0,
            min_height: 150.0,
            drag_bounds: DragBounds::Viewport,
            grip_size: 16.0,
            header_height: 32.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    /// Delay between a step change and measuring the new target, letting the
    /// target's own layout settle.
    pub settle_delay_ms: u64,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 100,
        }
    }
}

/// Engine configuration. Every field has a default, so partial JSON files
/// are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub placement: PlacementConfig,
    pub panel: PanelConfig,
    pub tour: TourConfig,
    /// Enables debug-level logging in hosts that honour it.
    pub debug: bool,
}

impl EngineConfig {
    /// Load from a JSON file. A missing or empty file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("placement.offset", self.placement.offset),
            ("placement.margin", self.placement.margin),
            ("placement.arrow_margin", self.placement.arrow_margin),
            ("panel.grip_size", self.panel.grip_size),
            ("panel.header_height", self.panel.header_height),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a finite, non-negative number (got {value})"),
                });
            }
        }
        let positive = [
            ("panel.min_width", self.panel.min_width),
            ("panel.min_height", self.panel.min_height),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be a finite, positive number (got {value})"),
                });
            }
        }
        Ok(())
    }
}
