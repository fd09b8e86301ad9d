//! Unified error types for gridplan
//!
//! [`GridplanError`] is the single error type crossing crate boundaries.
//! Loading and configuration problems are reported through it before any
//! graph work starts; the network construction itself has no failure path.
//!
//! # Example
//!
//! ```ignore
//! use gridplan_core::{GridplanError, GridplanResult};
//!
//! fn plan(path: &str) -> GridplanResult<()> {
//!     let nodes = load_demand_nodes(path)?;
//!     build_network(&nodes)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all gridplan operations.
#[derive(Error, Debug)]
pub enum GridplanError {
    /// I/O errors (file access, archive extraction, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Input data validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration errors (bad parameters, missing existing-network archive)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network structure errors
    #[error("Network error: {0}")]
    Network(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using GridplanError.
pub type GridplanResult<T> = Result<T, GridplanError>;

impl From<anyhow::Error> for GridplanError {
    fn from(err: anyhow::Error) -> Self {
        GridplanError::Other(err.to_string())
    }
}

impl From<String> for GridplanError {
    fn from(s: String) -> Self {
        GridplanError::Other(s)
    }
}

impl From<&str> for GridplanError {
    fn from(s: &str) -> Self {
        GridplanError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for GridplanError {
    fn from(err: serde_json::Error) -> Self {
        GridplanError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GridplanError::Config("existing network archive not found".into());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("archive not found"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GridplanError = io_err.into();
        assert!(matches!(err, GridplanError::Io(_)));
    }

    #[test]
    fn test_json_error_is_parse() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: GridplanError = json_err.into();
        assert!(matches!(err, GridplanError::Parse(_)));
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> GridplanResult<()> {
            Err(GridplanError::Validation("test".into()))
        }

        fn outer() -> GridplanResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
