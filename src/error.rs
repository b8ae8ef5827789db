//! Crate-wide error taxonomy.
//!
//! Validation and not-found errors are recoverable and surfaced (or
//! deliberately dropped) by the UI layer; storage failures are reported but
//! never invalidate the in-memory state.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A required field was empty or whitespace-only.
    #[error("{0}")]
    Validation(String),

    /// The referenced deck or card does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// An imported deck document does not have the expected shape.
    #[error("invalid deck document: {0}")]
    InvalidFormat(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
