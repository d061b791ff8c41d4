//! Scenario files: a board plus a scripted gesture.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use swimlane_core::{Axis, CellAddress, Column, ItemInput, Section, SwimlaneConfig, SwimlaneError};
use thiserror::Error;

/// Scenario errors.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid scenario: {0}")]
    Invalid(String),
    #[error(transparent)]
    Board(#[from] SwimlaneError),
}

/// Result type for scenario operations.
pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// Board contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSpec {
    pub columns: Vec<Column>,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub items: Vec<ItemInput<Value>>,
    #[serde(default)]
    pub config: SwimlaneConfig,
}

/// Size of the scroll container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// Press on a cell.
    Press {
        section: usize,
        column: usize,
        row: usize,
    },
    /// Pan recognised.
    PanStart,
    /// Pointer at `(dx, dy)` from where the press began.
    Move { dx: f64, dy: f64 },
    /// Let time pass, ticking every frame.
    Wait { ms: u64 },
    Release,
    Cancel,
    ToggleSection { section: usize },
    /// User scroll, only honoured while not dragging.
    Scroll { axis: Axis, offset: f64 },
}

impl Step {
    pub fn press(cell: CellAddress) -> Self {
        Step::Press {
            section: cell.section,
            column: cell.column,
            row: cell.row,
        }
    }
}

/// A board and the gesture to replay on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub board: BoardSpec,
    #[serde(default)]
    pub viewport: Viewport,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn from_json(json: &str) -> ScenarioResult<Self> {
        let scenario: Self =
            serde_json::from_str(json).map_err(|e| ScenarioError::Parse(e.to_string()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn to_json(&self) -> ScenarioResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ScenarioError::Parse(e.to_string()))
    }

    /// Load a scenario from a JSON file.
    pub fn load(path: &Path) -> ScenarioResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| ScenarioError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: &Path) -> ScenarioResult<()> {
        fs::write(path, self.to_json()?)
            .map_err(|e| ScenarioError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn validate(&self) -> ScenarioResult<()> {
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return Err(ScenarioError::Invalid(format!(
                "viewport must have a positive size, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        self.board.config.validate()?;
        Ok(())
    }
}
