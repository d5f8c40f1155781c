//! Error types for minv

use thiserror::Error;

/// Result type alias using minv's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during matrix inversion
///
/// Structural errors (`NotSquare`, `ConflictingOptions`) are rejected before
/// any numeric work begins. Numerical errors (`Singular`,
/// `NotPositiveDefinite`) are reported after a strategy has run and failed;
/// no partial result is ever returned alongside them.
#[derive(Error, Debug)]
pub enum Error {
    /// Input matrix is not square
    #[error("{op}: given matrix must be square sized, got {rows}x{cols}")]
    NotSquare {
        /// The operation name
        op: &'static str,
        /// Row count of the offending matrix
        rows: usize,
        /// Column count of the offending matrix
        cols: usize,
    },

    /// Mutually exclusive option flags were combined
    #[error("{op}: options '{lhs}' and '{rhs}' are mutually exclusive")]
    ConflictingOptions {
        /// The operation name
        op: &'static str,
        /// First conflicting option
        lhs: &'static str,
        /// Second conflicting option
        rhs: &'static str,
    },

    /// Matrix is singular or near-singular
    #[error("{op}: matrix is singular")]
    Singular {
        /// The operation name
        op: &'static str,
    },

    /// Matrix is singular or not positive definite where positive
    /// definiteness is required
    #[error("{op}: matrix is singular or not positive definite")]
    NotPositiveDefinite {
        /// The operation name
        op: &'static str,
    },
}

impl Error {
    /// Create a non-square error
    pub fn not_square(op: &'static str, rows: usize, cols: usize) -> Self {
        Self::NotSquare { op, rows, cols }
    }

    /// Create a conflicting-options error
    pub fn conflicting_options(op: &'static str, lhs: &'static str, rhs: &'static str) -> Self {
        Self::ConflictingOptions { op, lhs, rhs }
    }
}
