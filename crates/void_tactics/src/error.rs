//! Error types for the tactics AI

use crate::agent::AgentId;
use thiserror::Error;

/// Tactics AI errors.
///
/// The per-tick path never produces these; they surface only when building
/// grids, validating settings, loading configuration, or addressing agents
/// through the checked accessors.
#[derive(Debug, Error)]
pub enum AiError {
    /// Grid dimensions must be positive
    #[error("Invalid grid dimensions: {width}x{height}")]
    InvalidGrid { width: i32, height: i32 },

    /// Cell size must be positive and finite
    #[error("Invalid cell size: {0}")]
    InvalidCellSize(f32),

    /// A tunable is out of range
    #[error("Invalid agent settings: {0}")]
    InvalidSettings(String),

    /// No agent with this id
    #[error("Agent not found: {0}")]
    AgentNotFound(AgentId),

    /// Configuration file could not be parsed
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration file could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tactics AI operations
pub type Result<T> = std::result::Result<T, AiError>;
