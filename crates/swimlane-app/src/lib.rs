//! Swimlane Application
//!
//! Headless harness around the swimlane engine: loads a board and a
//! scripted gesture from JSON, replays it against a uniform layout with a
//! virtual clock, and reports the resulting order.

mod layout;
mod replay;
mod scenario;
mod text;

pub use layout::UniformLayout;
pub use replay::{BucketSnapshot, FRAME, Replay, ReplayReport};
pub use scenario::{BoardSpec, Scenario, ScenarioError, ScenarioResult, Step, Viewport};
pub use text::{CellMark, TextRenderer, format_board};
