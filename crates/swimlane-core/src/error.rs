//! Error types for the swimlane engine.

use crate::model::ItemId;
use thiserror::Error;

/// Errors raised by the configuration and session surfaces.
///
/// Gesture handling on [`crate::Swimlane`] never returns these; they are
/// logged and absorbed there.
#[derive(Debug, Error)]
pub enum SwimlaneError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("A drag is already in progress")]
    AlreadyDragging,
    #[error("Cell ({section}, {column}, {row}) holds no item")]
    EmptyCell {
        section: usize,
        column: usize,
        row: usize,
    },
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for swimlane operations.
pub type SwimlaneResult<T> = Result<T, SwimlaneError>;
