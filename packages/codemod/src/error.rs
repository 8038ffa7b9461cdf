//! Transform Errors
//!
//! Fatal conditions that abort processing of a single file. Validation
//! problems are not errors: they are collected as `ValidationError`s and
//! only block the definition they belong to.

use std::path::PathBuf;
use thiserror::Error;

/// An unrecoverable error while transforming one file.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The input source could not be parsed.
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A node did not have the shape an earlier check guaranteed.
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// The rewritten source no longer parses.
    #[error("generated output for {path} does not parse: {message}")]
    OutputParse { path: PathBuf, message: String },

    /// The runtime usage data file is malformed.
    #[error("invalid runtime data in {path}: {source}")]
    RuntimeData {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransformError {
    pub fn invariant(message: impl Into<String>) -> Self {
        TransformError::Invariant(message.into())
    }
}

/// Result type for transform operations.
pub type Result<T> = std::result::Result<T, TransformError>;
