//! # Engine Error Types
//!
//! Only construction, configuration and spawning can fail. Out-of-range ids
//! and tags never produce errors; they degrade to default values.

use thiserror::Error;

/// Errors that can occur in the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Spawn requested while every entity slot is occupied.
    #[error("entity capacity exhausted: all {capacity} slots are active")]
    CapacityExhausted {
        /// Number of entity slots.
        capacity: usize,
    },

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file is not valid TOML for [`crate::EngineConfig`].
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
