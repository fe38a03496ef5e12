//! Error types for the melodiq crate

use thiserror::Error;

/// Main error type for the melodiq crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("action index {index} is out of bounds for track of length {len}")]
    ActionIndexOutOfBounds { index: usize, len: usize },

    #[error("track has no notes left to mutate")]
    EmptyMelody,

    #[error("no Q-table saved for user '{user_id}'")]
    UserNotFound { user_id: String },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("session is not in a state that allows {operation}")]
    InvalidSessionState { operation: String },

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
