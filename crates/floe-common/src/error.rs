//! Error types for Floe Arena.

use thiserror::Error;

/// Top-level error type for Floe operations.
#[derive(Debug, Error)]
pub enum FloeError {
    /// Configuration could not be parsed or applied
    #[error("Config error: {0}")]
    Config(String),

    /// Snapshot encoding/decoding errors
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// Simulation lookup errors
    #[error("Simulation error: {0}")]
    Simulation(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Expected version
        expected: String,
        /// Actual version found
        actual: String,
    },
}

/// Result type alias for Floe operations.
pub type FloeResult<T> = Result<T, FloeError>;
