//! Error types for the contouring pipeline.

use thiserror::Error;

/// Result type alias using ContourError.
pub type ContourResult<T> = Result<T, ContourError>;

/// Primary error type for contouring operations.
///
/// None of these are fatal to a draw call: the pipeline logs them and moves
/// on to the next contour or level.
#[derive(Debug, Error)]
pub enum ContourError {
    // === Input Errors ===
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Invalid contour level {level}: {message}")]
    InvalidLevel { level: f64, message: String },

    #[error("Degenerate contour: {points} points (need at least {required})")]
    DegenerateContour { points: usize, required: usize },

    // === Rendering Errors ===
    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Entity not found: {0}")]
    EntityNotFound(u64),

    // === Infrastructure Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl ContourError {
    /// Whether the error describes bad input rather than a renderer fault.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ContourError::InvalidGrid(_)
                | ContourError::InvalidLevel { .. }
                | ContourError::DegenerateContour { .. }
        )
    }
}

// Conversion from common error types
impl From<std::io::Error> for ContourError {
    fn from(err: std::io::Error) -> Self {
        ContourError::Io(err.to_string())
    }
}
