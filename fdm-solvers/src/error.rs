//! Error types for sparse matrix operations and iterative solvers.
//!
//! Structural preconditions (a diagonal entry per row, matching lengths,
//! builder capacity) are checked before any arithmetic and reported here.

use thiserror::Error;

/// Errors that can occur while building, decomposing or solving with a CSR matrix.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SolverError {
    /// A row has no stored entry with `col == row`.
    #[error("row {row} has no diagonal entry")]
    MissingDiagonalEntry {
        /// Row without a diagonal entry
        row: usize,
    },

    /// A row stores a diagonal entry whose value is exactly zero.
    #[error("row {row} has a zero diagonal entry")]
    ZeroDiagonal {
        /// Row with the zero diagonal
        row: usize,
    },

    /// The iteration budget was exhausted before the tolerance was met.
    #[error("no convergence after {iterations} iterations (residual: {residual:e})")]
    NonConvergence {
        /// Iterations performed
        iterations: usize,
        /// Convergence metric of the last iteration
        residual: f64,
    },

    /// A vector length does not match the matrix dimension.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Actual length provided
        got: usize,
    },

    /// The solvers require a square matrix.
    #[error("matrix is not square: {rows} x {cols}")]
    NotSquare {
        /// Number of rows
        rows: usize,
        /// Number of columns
        cols: usize,
    },

    /// A builder was asked to store more entries than its declared capacity.
    #[error("CSR capacity of {capacity} entries exceeded")]
    CapacityExceeded {
        /// Declared capacity
        capacity: usize,
    },

    /// A builder was finished with a different number of rows than declared.
    #[error("CSR row count mismatch: declared {expected}, built {got}")]
    RowCountMismatch {
        /// Declared number of rows
        expected: usize,
        /// Number of rows actually built
        got: usize,
    },

    /// Raw CSR components are inconsistent.
    #[error("invalid CSR structure: {0}")]
    InvalidStructure(String),

    /// The dense renderer requires strictly increasing column indices per row.
    #[error("row {row} has unsorted column indices")]
    UnsortedRow {
        /// First offending row
        row: usize,
    },
}

/// A specialized `Result` type for solver operations.
pub type Result<T> = std::result::Result<T, SolverError>;

impl SolverError {
    /// Returns `true` if the error comes from a missing or unusable diagonal.
    pub fn is_diagonal_error(&self) -> bool {
        matches!(
            self,
            SolverError::MissingDiagonalEntry { .. } | SolverError::ZeroDiagonal { .. }
        )
    }

    /// Returns `true` if this is a dimension-related error.
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            SolverError::DimensionMismatch { .. } | SolverError::NotSquare { .. }
        )
    }

    /// Returns `true` if this is a structural error in CSR construction.
    pub fn is_structure_error(&self) -> bool {
        matches!(
            self,
            SolverError::CapacityExceeded { .. }
                | SolverError::RowCountMismatch { .. }
                | SolverError::InvalidStructure(_)
                | SolverError::UnsortedRow { .. }
        )
    }

    /// Returns `true` if the iteration budget ran out.
    pub fn is_convergence_error(&self) -> bool {
        matches!(self, SolverError::NonConvergence { .. })
    }
}
