//! Sparse linear algebra for finite-difference systems
//!
//! This crate provides the CSR sparse matrix format, dense vector kernels and
//! the classical iterative solvers used on structured-grid discretizations.
//!
//! # Features
//!
//! - **Sparse Matrices**: CSR format, row-by-row builder with optional capacity bound,
//!   diagonal/lower/upper split
//! - **Iterative Solvers**: Jacobi, Gauss-Seidel, Conjugate Gradient
//! - **Generic Scalar Types**: Works with f64 and f32
//!
//! # Example
//!
//! ```
//! use fdm_solvers::{solve, CsrMatrix, IterativeConfig, SolverMethod};
//! use ndarray::{array, Array1};
//!
//! let a = CsrMatrix::from_dense(&array![[4.0, -1.0], [-1.0, 4.0]], 0.0);
//! let b = array![3.0, 3.0];
//! let mut x = Array1::zeros(2);
//!
//! let solution = solve(
//!     SolverMethod::ConjugateGradient,
//!     &a,
//!     &b,
//!     &mut x,
//!     &IterativeConfig::new(100, 1e-10),
//! )?;
//! assert!(solution.converged);
//! # Ok::<(), fdm_solvers::SolverError>(())
//! ```

pub mod error;
pub mod iterative;
pub mod sparse;
pub mod traits;
pub mod vector;

// Re-export main types
pub use error::{Result, SolverError};
pub use sparse::{split_diagonal_lower_upper, CsrBuilder, CsrMatrix, DiagonalSplit};
pub use traits::{LinearOperator, Scalar};

// Re-export iterative solvers
pub use iterative::{
    cg, gauss_seidel, jacobi, solve, IterativeConfig, IterativeSolution, SolverMethod,
};
