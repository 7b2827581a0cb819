//! Gauss-Seidel iteration
//!
//! Rows are visited in increasing index order and `x[i]` is overwritten
//! immediately, so later rows of a sweep see the updated earlier rows.

use super::{check_system, log_progress, IterativeConfig, IterativeSolution, SolverMethod};
use crate::error::Result;
use crate::sparse::CsrMatrix;
use crate::traits::Scalar;
use ndarray::Array1;

/// Solve `A x = b` with Gauss-Seidel sweeps, `x` holding the initial guess
///
/// The convergence metric is the square root of the per-row squared updates
/// accumulated over one sweep. Every row must store a non-zero diagonal entry.
pub fn gauss_seidel<T: Scalar>(
    a: &CsrMatrix<T>,
    b: &Array1<T>,
    x: &mut Array1<T>,
    config: &IterativeConfig<T>,
) -> Result<IterativeSolution<T>> {
    let n = check_system(a, b, x)?;
    let diag = a.checked_diagonal()?;
    let mut residual = T::infinity();

    for iter in 0..config.max_iterations {
        let mut norm_sq = T::zero();
        for i in 0..n {
            let mut sum = T::zero();
            for (j, v) in a.row_entries(i) {
                if j != i {
                    sum += v * x[j];
                }
            }
            let updated = (b[i] - sum) / diag[i];
            let d = updated - x[i];
            norm_sq += d * d;
            x[i] = updated;
        }
        residual = norm_sq.sqrt();

        log_progress(SolverMethod::GaussSeidel, config, iter + 1, residual);

        if residual < config.tolerance {
            return Ok(IterativeSolution {
                iterations: iter + 1,
                residual,
                converged: true,
            });
        }
    }

    log::debug!(
        "Gauss-Seidel stopped after {} sweeps without meeting tolerance",
        config.max_iterations
    );
    Ok(IterativeSolution {
        iterations: config.max_iterations,
        residual,
        converged: false,
    })
}
