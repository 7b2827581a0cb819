//! CG (Conjugate Gradient) solver
//!
//! Unpreconditioned Conjugate Gradient for symmetric positive definite systems.
//! Symmetry and definiteness are not checked; on other matrices the iteration
//! may stagnate or diverge.

use super::{check_system, log_progress, IterativeConfig, IterativeSolution, SolverMethod};
use crate::error::Result;
use crate::sparse::CsrMatrix;
use crate::traits::Scalar;
use crate::vector::{add_assign, axpy, dot, scale_inplace};
use ndarray::Array1;

/// Solve `A x = b` using the Conjugate Gradient method, `x` holding the initial guess
///
/// Stops when `||b - A x||_2 < tolerance`. If the initial guess already meets
/// the tolerance no iteration is performed. A `(p, A p)` that vanishes relative
/// to `(r, r)` ends the iteration early with `converged: false`.
pub fn cg<T: Scalar>(
    a: &CsrMatrix<T>,
    b: &Array1<T>,
    x: &mut Array1<T>,
    config: &IterativeConfig<T>,
) -> Result<IterativeSolution<T>> {
    let n = check_system(a, b, x)?;
    let breakdown = T::from_f64_lossy(1e-30);

    // r = b - A x
    let mut r = a.matvec(x);
    for (ri, &bi) in r.iter_mut().zip(b.iter()) {
        *ri = bi - *ri;
    }
    let mut p = r.clone();
    let mut ap = Array1::from_elem(n, T::zero());
    let mut rs_old = dot(&r, &r);

    if rs_old.sqrt() < config.tolerance {
        return Ok(IterativeSolution {
            iterations: 0,
            residual: rs_old.sqrt(),
            converged: true,
        });
    }

    for iter in 0..config.max_iterations {
        a.matvec_into(&p, &mut ap);

        let pap = dot(&p, &ap);
        if pap.is_nan() || pap.abs() <= breakdown * rs_old {
            log::debug!("CG breakdown at iteration {}: (p, Ap) = {}", iter + 1, pap);
            return Ok(IterativeSolution {
                iterations: iter,
                residual: rs_old.sqrt(),
                converged: false,
            });
        }

        let alpha = rs_old / pap;
        axpy(alpha, &p, x);
        axpy(-alpha, &ap, &mut r);

        let rs_new = dot(&r, &r);
        let residual = rs_new.sqrt();

        log_progress(SolverMethod::ConjugateGradient, config, iter + 1, residual);

        if residual < config.tolerance {
            return Ok(IterativeSolution {
                iterations: iter + 1,
                residual,
                converged: true,
            });
        }

        // p = r + beta * p
        scale_inplace(&mut p, rs_new / rs_old);
        add_assign(&mut p, &r);
        rs_old = rs_new;
    }

    Ok(IterativeSolution {
        iterations: config.max_iterations,
        residual: rs_old.sqrt(),
        converged: false,
    })
}
