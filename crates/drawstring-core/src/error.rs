//! Error types for the core engine.

use thiserror::Error;

/// Core engine errors.
///
/// Event handlers never return these: malformed input is dropped at the
/// boundary. They surface from store mutations, color parsing and
/// configuration loading.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Shape has no points")]
    EmptyShape,
    #[error("Non-finite coordinate ({x}, {y})")]
    NonFinitePoint { x: f64, y: f64 },
    #[error("Invalid brush size: {0}")]
    InvalidSize(f64),
    #[error("Unrecognized color: {0}")]
    InvalidColor(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
