//! Error types for the collision system

use thiserror::Error;

/// Collision system errors
#[derive(Debug, Error)]
pub enum CollisionError {
    /// Static body not found
    #[error("Static body not found: {0}")]
    BodyNotFound(usize),

    /// Degenerate or inverted shape
    #[error("Invalid collision shape: {0}")]
    InvalidShape(String),
}

/// Result type for collision operations
pub type Result<T> = std::result::Result<T, CollisionError>;
