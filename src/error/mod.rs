//! Error handling for the simulation library.

use std::io;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Errors that can occur while generating data, fitting models or writing results
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// Error opening, reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error processing Parquet data
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// Error converting records to or from a serialized representation
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Input failed validation (shape, range, or content)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A model referenced a column the table does not have
    #[error("Column not found: {0}")]
    MissingColumn(String),

    /// The normal equations of a regression could not be solved
    #[error("Singular system: {0}")]
    SingularSystem(String),

    /// Iteratively reweighted least squares did not converge
    #[error("Model fit did not converge after {iterations} iterations (last deviance change {change:e})")]
    NonConvergence {
        /// Number of iterations performed
        iterations: usize,
        /// Relative deviance change in the final iteration
        change: f64,
    },
}

impl SimulationError {
    /// Create a validation error from any displayable message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a serialization error, preserving the source message
    pub fn serialization<E: std::fmt::Display>(context: &str, error: E) -> Self {
        Self::Serialization(format!("{context}: {error}"))
    }
}

impl From<serde_json::Error> for SimulationError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization("JSON", error)
    }
}

/// Result type for simulation operations
pub type Result<T> = std::result::Result<T, SimulationError>;
