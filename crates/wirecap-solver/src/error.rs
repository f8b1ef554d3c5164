//! Error types for the field solver.

use std::fmt;

use thiserror::Error;
use wirecap_core::StructureError;

/// Which matrix an inversion failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixKind {
    /// The segment coefficient matrix Y.
    Coefficient,
    /// The conductor capacitance matrix C.
    Capacitance,
}

impl fmt::Display for MatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixKind::Coefficient => f.write_str("coefficient matrix Y"),
            MatrixKind::Capacitance => f.write_str("capacitance matrix C"),
        }
    }
}

/// Errors that can occur during assembly, solving or extraction.
#[derive(Debug, Error)]
pub enum Error {
    /// The input structure was invalid.
    #[error(transparent)]
    Structure(#[from] StructureError),

    /// A dense inversion failed because the matrix is singular or too ill-conditioned.
    #[error("Singular {matrix} (reciprocal condition number {rcond:.3e}); check for coincident or degenerate conductors")]
    SingularSystem { matrix: MatrixKind, rcond: f64 },

    /// A vector or matrix did not have the expected size.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A solver parameter was out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for solver operations.
pub type Result<T> = std::result::Result<T, Error>;
