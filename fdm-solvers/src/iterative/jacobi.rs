//! Jacobi iteration
//!
//! Every row is updated from the previous iterate only, so a full-length
//! temporary holds the new values until the sweep is complete.

use super::{check_system, log_progress, IterativeConfig, IterativeSolution, SolverMethod};
use crate::error::Result;
use crate::sparse::CsrMatrix;
use crate::traits::Scalar;
use ndarray::Array1;

/// Solve `A x = b` with Jacobi iteration, `x` holding the initial guess
///
/// The convergence metric is `||x_new - x_old||_2`. Every row must store a
/// non-zero diagonal entry; this is checked before iterating.
pub fn jacobi<T: Scalar>(
    a: &CsrMatrix<T>,
    b: &Array1<T>,
    x: &mut Array1<T>,
    config: &IterativeConfig<T>,
) -> Result<IterativeSolution<T>> {
    let n = check_system(a, b, x)?;
    let diag = a.checked_diagonal()?;
    let mut x_new = Array1::from_elem(n, T::zero());
    let mut residual = T::infinity();

    for iter in 0..config.max_iterations {
        for i in 0..n {
            let mut sum = T::zero();
            for (j, v) in a.row_entries(i) {
                if j != i {
                    sum += v * x[j];
                }
            }
            x_new[i] = (b[i] - sum) / diag[i];
        }

        let mut norm_sq = T::zero();
        for (xi, &xn) in x.iter_mut().zip(x_new.iter()) {
            let d = xn - *xi;
            norm_sq += d * d;
            *xi = xn;
        }
        residual = norm_sq.sqrt();

        log_progress(SolverMethod::Jacobi, config, iter + 1, residual);

        if residual < config.tolerance {
            return Ok(IterativeSolution {
                iterations: iter + 1,
                residual,
                converged: true,
            });
        }
    }

    log::debug!(
        "Jacobi stopped after {} iterations without meeting tolerance",
        config.max_iterations
    );
    Ok(IterativeSolution {
        iterations: config.max_iterations,
        residual,
        converged: false,
    })
}
