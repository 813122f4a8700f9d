//! Error types for the benchmark harness
//!
//! These are run-level errors. Per-instance outcomes of a validation engine
//! (`Invalid`, `InfraError`) are [`crate::Verdict`] values and schema setup
//! failures are [`crate::SetupError`]; neither is an `Error` until the runner
//! decides the whole run cannot continue.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for benchmark harness operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during benchmark operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Schema text could not be loaded or parsed
    #[error("Invalid schema '{name}': {reason}")]
    InvalidSchema { name: String, reason: String },

    /// Schema file not found
    #[error("Schema file not found: {0}")]
    SchemaNotFound(PathBuf),

    /// A corpus file line could not be decoded
    #[error("Invalid corpus at line {line}: {reason}")]
    InvalidCorpus { line: usize, reason: String },

    /// Requested adapter is not registered
    #[error("Adapter not registered: {0}")]
    AdapterNotFound(String),

    /// An adapter with the same name is already registered
    #[error("Adapter already registered: {0}")]
    DuplicateAdapter(String),

    /// An engine disagreed with the generator's ground truth
    #[error("Correctness mismatch in '{case}' at instance {index}: expected valid={expected}, got valid={actual}")]
    CorrectnessMismatch {
        case: String,
        index: usize,
        expected: bool,
        actual: bool,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Benchmark execution error
    #[error("Benchmark error: {0}")]
    Benchmark(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correctness_mismatch_message() {
        let err = Error::CorrectnessMismatch {
            case: "boon/realistic 10".to_string(),
            index: 3,
            expected: false,
            actual: true,
        };

        let message = err.to_string();
        assert!(message.contains("boon/realistic 10"));
        assert!(message.contains("instance 3"));
        assert!(message.contains("expected valid=false"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
