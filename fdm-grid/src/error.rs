//! Error types for grid construction, assembly and configuration

use solvers::SolverError;
use thiserror::Error;

/// Errors that can occur while building a grid or assembling a system on it.
#[derive(Debug, Error)]
pub enum GridError {
    /// Spacing is `extent / (n - 1)`, so each axis needs at least two points.
    #[error("invalid grid dimensions {nx} x {ny}: at least 2 points per axis are required")]
    InvalidGridDimensions {
        /// Points along x
        nx: usize,
        /// Points along y
        ny: usize,
    },

    /// Domain bounds are not finite or do not span a positive extent.
    #[error("invalid {axis} bounds [{lower}, {upper}]")]
    InvalidBounds {
        /// Axis name (`'x'` or `'y'`)
        axis: char,
        /// Lower bound
        lower: f64,
        /// Upper bound
        upper: f64,
    },

    /// A stencil reached a grid point that is not active.
    ///
    /// Coordinates are signed because the point may lie outside the grid.
    #[error("row {index} references inactive grid point ({i}, {j})")]
    InactiveNeighborReference {
        /// Active index of the row being assembled
        index: usize,
        /// Grid column of the missing neighbour
        i: isize,
        /// Grid row of the missing neighbour
        j: isize,
    },

    /// A per-active-point vector has the wrong length.
    #[error("length mismatch: expected {expected} values, got {got}")]
    LengthMismatch {
        /// Number of active points
        expected: usize,
        /// Length provided
        got: usize,
    },

    /// Error from the sparse matrix or solver layer.
    #[error(transparent)]
    Solver(#[from] SolverError),

    /// Configuration could not be parsed or validated.
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

impl GridError {
    /// Returns `true` if the grid geometry itself is invalid.
    pub fn is_geometry_error(&self) -> bool {
        matches!(
            self,
            GridError::InvalidGridDimensions { .. } | GridError::InvalidBounds { .. }
        )
    }

    /// Returns `true` if a stencil could not be formed.
    pub fn is_stencil_error(&self) -> bool {
        matches!(self, GridError::InactiveNeighborReference { .. })
    }

    /// Returns the underlying solver error, if any.
    pub fn as_solver_error(&self) -> Option<&SolverError> {
        match self {
            GridError::Solver(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        GridError::Config(err.to_string())
    }
}
