//! Error types for locus.

use thiserror::Error;

/// locus error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("Query failed for '{pattern}': {message}")]
    Query { pattern: String, message: String },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for locus operations.
pub type Result<T> = std::result::Result<T, Error>;
