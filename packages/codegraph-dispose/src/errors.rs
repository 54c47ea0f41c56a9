//! Error types for codegraph-dispose
//!
//! Provides unified error handling across the crate.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for dispose analysis operations
#[derive(Debug, Error)]
pub enum DisposeError {
    /// None of the supplied operation blocks carries a control flow graph
    #[error("No analysis possible for '{procedure}': no operation block with a control flow graph")]
    NoAnalysisPossible { procedure: String },

    /// A type the analysis cannot work without is missing from the compilation
    #[error("Well-known type '{0}' not found in compilation")]
    MissingWellKnownType(String),

    /// Cooperative cancellation was requested
    #[error("Analysis cancelled")]
    Cancelled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Internal error (broken collaborator input)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DisposeError {
    /// Create a "no analysis possible" error for a procedure
    pub fn no_analysis_possible(procedure: impl Into<String>) -> Self {
        DisposeError::NoAnalysisPossible {
            procedure: procedure.into(),
        }
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        DisposeError::Internal(msg.into())
    }
}

/// Result type alias for dispose analysis operations
pub type Result<T> = std::result::Result<T, DisposeError>;
