//! Error types.
//!
//! Geometry that cannot be placed is not an error: controllers report it as an
//! unchanged or rejected outcome. These cover API misuse and persistence.

use crate::widget::WidgetId;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage quota exceeded writing {key} ({bytes} bytes)")]
    QuotaExceeded { key: String, bytes: usize },
    #[error("storage write failed: {0}")]
    Write(String),
    #[error("failed to serialize layout: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("widget not found: {0}")]
    UnknownWidget(WidgetId),
    #[error("another gesture is already in progress")]
    GestureInProgress,
    #[error(transparent)]
    Store(#[from] StoreError),
}
