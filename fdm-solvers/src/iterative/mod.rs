//! Iterative solvers for linear systems
//!
//! This module provides the classical methods used on finite-difference systems:
//! - [`jacobi`]: Jacobi iteration - synchronous update, needs a full-length temporary
//! - [`gauss_seidel`]: Gauss-Seidel - in-place sweep in increasing row order
//! - [`cg`]: Conjugate Gradient - for symmetric positive definite systems
//!
//! All three take the initial guess in `x`, overwrite it with the approximate
//! solution, and run best-effort up to `max_iterations`. The returned
//! [`IterativeSolution`] tells whether the tolerance was met.

mod cg;
mod gauss_seidel;
mod jacobi;

pub use cg::cg;
pub use gauss_seidel::gauss_seidel;
pub use jacobi::jacobi;

use crate::error::{Result, SolverError};
use crate::sparse::CsrMatrix;
use crate::traits::Scalar;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Iterative solver configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterativeConfig<R> {
    /// Maximum number of iterations (sweeps for Jacobi/Gauss-Seidel)
    pub max_iterations: usize,
    /// Absolute tolerance on the method's convergence metric
    pub tolerance: R,
    /// Log progress every N iterations (0 = no output)
    pub print_interval: usize,
}

impl Default for IterativeConfig<f64> {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-6,
            print_interval: 0,
        }
    }
}

impl Default for IterativeConfig<f32> {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-4,
            print_interval: 0,
        }
    }
}

impl<R> IterativeConfig<R> {
    /// Configuration with the given budget and tolerance, no progress output
    pub fn new(max_iterations: usize, tolerance: R) -> Self {
        Self {
            max_iterations,
            tolerance,
            print_interval: 0,
        }
    }
}

/// Iterative solver result
///
/// The solution itself lives in the vector passed to the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterativeSolution<T: Scalar> {
    /// Number of iterations performed
    pub iterations: usize,
    /// Convergence metric of the last iteration
    ///
    /// Jacobi: ||x_new - x_old||, Gauss-Seidel: square root of the summed
    /// squared per-row updates of the last sweep, CG: ||r||.
    pub residual: T,
    /// Whether the metric dropped below the tolerance
    pub converged: bool,
}

impl<T: Scalar> IterativeSolution<T> {
    /// Turn a non-converged result into [`SolverError::NonConvergence`]
    pub fn ensure_converged(self) -> Result<Self> {
        if self.converged {
            Ok(self)
        } else {
            Err(SolverError::NonConvergence {
                iterations: self.iterations,
                residual: self.residual.to_f64().unwrap_or(f64::NAN),
            })
        }
    }
}

/// Iterative method selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverMethod {
    /// Jacobi iteration
    Jacobi,
    /// Gauss-Seidel iteration
    #[default]
    GaussSeidel,
    /// Unpreconditioned Conjugate Gradient
    ConjugateGradient,
}

impl SolverMethod {
    /// Human-readable name used in log output
    pub fn name(&self) -> &'static str {
        match self {
            SolverMethod::Jacobi => "Jacobi",
            SolverMethod::GaussSeidel => "Gauss-Seidel",
            SolverMethod::ConjugateGradient => "CG",
        }
    }
}

impl fmt::Display for SolverMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Solve `A x = b` with the selected method, `x` holding the initial guess
pub fn solve<T: Scalar>(
    method: SolverMethod,
    a: &CsrMatrix<T>,
    b: &Array1<T>,
    x: &mut Array1<T>,
    config: &IterativeConfig<T>,
) -> Result<IterativeSolution<T>> {
    match method {
        SolverMethod::Jacobi => jacobi(a, b, x, config),
        SolverMethod::GaussSeidel => gauss_seidel(a, b, x, config),
        SolverMethod::ConjugateGradient => cg(a, b, x, config),
    }
}

/// Check that `a` is square and `b`, `x` match its dimension
pub(crate) fn check_system<T: Scalar>(
    a: &CsrMatrix<T>,
    b: &Array1<T>,
    x: &Array1<T>,
) -> Result<usize> {
    if a.num_rows != a.num_cols {
        return Err(SolverError::NotSquare {
            rows: a.num_rows,
            cols: a.num_cols,
        });
    }
    let n = a.num_rows;
    for len in [b.len(), x.len()] {
        if len != n {
            return Err(SolverError::DimensionMismatch {
                expected: n,
                got: len,
            });
        }
    }
    Ok(n)
}

pub(crate) fn log_progress<T: Scalar>(
    method: SolverMethod,
    config: &IterativeConfig<T>,
    iteration: usize,
    residual: T,
) {
    if config.print_interval > 0 && iteration % config.print_interval == 0 {
        log::info!(
            "{} iteration {}: residual = {:.6e}",
            method,
            iteration,
            residual.to_f64().unwrap_or(f64::NAN)
        );
    }
}
