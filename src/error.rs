//! Error types for the pursuit crate

use thiserror::Error;

use crate::maze::{Position, Role};

/// Main error type for the pursuit crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid maze dimensions {length}x{height} (both must be at least 1)")]
    InvalidDimensions { length: i32, height: i32 },

    #[error("{what} {position} lies outside the {length}x{height} maze")]
    PositionOutOfBounds {
        what: &'static str,
        position: Position,
        length: i32,
        height: i32,
    },

    #[error("invalid wall range {min}..={max} (min must not exceed max)")]
    InvalidWallRange { min: i32, max: i32 },

    #[error("{role} action set is empty")]
    EmptyActionSet { role: Role },

    #[error("unknown action '{input}'. Expected one of: {expected}")]
    ParseAction { input: String, expected: String },

    #[error("unknown maze preset '{input}'. Expected one of: {expected}")]
    ParsePreset { input: String, expected: String },

    #[error("{role} has not been placed in the simulation")]
    MissingAgent { role: Role },

    #[error("{role} has no feasible action at {position}")]
    NoFeasibleActions { role: Role, position: Position },

    #[error("time step {step} exceeds the solved horizon {horizon}")]
    HorizonExceeded { step: usize, horizon: usize },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
