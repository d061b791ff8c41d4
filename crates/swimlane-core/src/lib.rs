//! Swimlane Core Library
//!
//! Platform-agnostic drag-and-drop reordering for a grid of sections and
//! columns. The host feeds layout, gesture and scroll events in; the board
//! keeps the item list ordered and tells the host what to draw.

pub mod autoscroll;
pub mod config;
pub mod error;
pub mod geometry;
pub mod model;
pub mod render;
pub mod reorder;
pub mod session;
pub mod shared;
pub mod swimlane;

pub use autoscroll::{AutoScroller, Axis, AxisScroller, ScrollSink, ScrollUpdate};
pub use config::{DragTrigger, EdgeThresholds, SwimlaneConfig};
pub use error::{SwimlaneError, SwimlaneResult};
pub use geometry::{GeometryRegistry, SectionRowKey};
pub use model::{CellAddress, Column, GridModel, GridSection, Item, ItemId, ItemInput, Section};
pub use render::{RenderStrategy, RenderedBoard, RenderedCell, RenderedSection};
pub use reorder::{Anchor, MoveEvent};
pub use session::{DragPhase, DragSession, TargetPosition};
pub use shared::{Shared, SubscriptionId};
pub use swimlane::{DragOverlay, Swimlane};

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
pub use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
pub use std::time::Instant;
