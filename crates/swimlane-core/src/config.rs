//! Board configuration.

use crate::error::{SwimlaneError, SwimlaneResult};
use kurbo::Vec2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default distance from a viewport edge that starts autoscrolling.
pub const DEFAULT_EDGE_THRESHOLD: f64 = 100.0;
/// Default distance moved by one autoscroll animation.
pub const DEFAULT_SCROLL_STEP: f64 = 100.0;
/// Default duration of one autoscroll animation.
pub const DEFAULT_SCROLL_DURATION_MS: u64 = 200;
/// Default hold time before a long press activates a drag.
pub const DEFAULT_LONG_PRESS_DELAY_MS: u64 = 500;

/// Distances from each viewport edge at which autoscrolling kicks in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeThresholds {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

impl Default for EdgeThresholds {
    fn default() -> Self {
        Self {
            top: DEFAULT_EDGE_THRESHOLD,
            bottom: DEFAULT_EDGE_THRESHOLD,
            left: DEFAULT_EDGE_THRESHOLD,
            right: DEFAULT_EDGE_THRESHOLD,
        }
    }
}

impl EdgeThresholds {
    /// Same threshold on all four edges.
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            bottom: value,
            left: value,
            right: value,
        }
    }
}

/// What turns an armed press into an active drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragTrigger {
    /// Hold the pointer down for `long_press_delay_ms`.
    #[default]
    LongPress,
    /// Activate on the first pan sample after arming.
    PanStart,
}

/// Configuration for a swimlane board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwimlaneConfig {
    /// Trailing empty rows rendered under every expanded section.
    pub empty_rows: usize,
    /// Fixed column width handed to renderers, if any.
    pub column_width: Option<f64>,
    /// Near-edge distances for autoscrolling.
    pub edge_thresholds: EdgeThresholds,
    /// Constant correction added to the pointer before hit-testing.
    pub enter_cursor_offset: Vec2,
    /// How a press becomes a drag.
    pub drag_trigger: DragTrigger,
    /// Hold time for [`DragTrigger::LongPress`].
    pub long_press_delay_ms: u64,
    /// Distance moved by one autoscroll animation.
    pub scroll_step: f64,
    /// Duration of one autoscroll animation.
    pub scroll_duration_ms: u64,
}

impl Default for SwimlaneConfig {
    fn default() -> Self {
        Self {
            empty_rows: 1,
            column_width: None,
            edge_thresholds: EdgeThresholds::default(),
            enter_cursor_offset: Vec2::ZERO,
            drag_trigger: DragTrigger::default(),
            long_press_delay_ms: DEFAULT_LONG_PRESS_DELAY_MS,
            scroll_step: DEFAULT_SCROLL_STEP,
            scroll_duration_ms: DEFAULT_SCROLL_DURATION_MS,
        }
    }
}

impl SwimlaneConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> SwimlaneResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| SwimlaneError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the config to pretty-printed JSON.
    pub fn to_json(&self) -> SwimlaneResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SwimlaneError::Serialization(e.to_string()))
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> SwimlaneResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| SwimlaneError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: &Path) -> SwimlaneResult<()> {
        fs::write(path, self.to_json()?)
            .map_err(|e| SwimlaneError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    /// Check that every numeric field is usable.
    pub fn validate(&self) -> SwimlaneResult<()> {
        let t = &self.edge_thresholds;
        for (name, value) in [
            ("top", t.top),
            ("bottom", t.bottom),
            ("left", t.left),
            ("right", t.right),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SwimlaneError::InvalidConfig(format!(
                    "edge threshold `{}` must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if !self.scroll_step.is_finite() || self.scroll_step <= 0.0 {
            return Err(SwimlaneError::InvalidConfig(format!(
                "scroll_step must be positive, got {}",
                self.scroll_step
            )));
        }
        if let Some(width) = self.column_width {
            if !width.is_finite() || width <= 0.0 {
                return Err(SwimlaneError::InvalidConfig(format!(
                    "column_width must be positive, got {}",
                    width
                )));
            }
        }
        if !self.enter_cursor_offset.is_finite() {
            return Err(SwimlaneError::InvalidConfig(
                "enter_cursor_offset must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
