//! Assembled linear systems and their solution
//!
//! A [`LinearSystem`] pairs a CSR matrix with its right-hand side, both
//! indexed by active-point index.

use crate::error::{GridError, Result};
use crate::grid::StructuredGrid;
use ndarray::Array1;
use solvers::{CsrBuilder, CsrMatrix, IterativeConfig, SolverError, SolverMethod};
use std::time::Instant;

/// Matrix and right-hand side of a steady problem
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSystem {
    /// System matrix, one row per active point
    pub matrix: CsrMatrix<f64>,
    /// Right-hand side
    pub rhs: Array1<f64>,
}

/// Solution result from the solver
#[derive(Debug, Clone)]
pub struct Solution {
    /// Solution vector, indexed by active point
    pub values: Array1<f64>,
    /// Number of iterations
    pub iterations: usize,
    /// Final value of the method's convergence metric
    pub residual: f64,
    /// Whether the solver converged
    pub converged: bool,
}

impl Solution {
    /// Turn a non-converged result into an error
    pub fn ensure_converged(self) -> Result<Self> {
        if self.converged {
            Ok(self)
        } else {
            Err(SolverError::NonConvergence {
                iterations: self.iterations,
                residual: self.residual,
            }
            .into())
        }
    }
}

impl LinearSystem {
    /// Pair a square matrix with a right-hand side of matching length
    pub fn new(matrix: CsrMatrix<f64>, rhs: Array1<f64>) -> Result<Self> {
        if matrix.num_rows != matrix.num_cols {
            return Err(SolverError::NotSquare {
                rows: matrix.num_rows,
                cols: matrix.num_cols,
            }
            .into());
        }
        if rhs.len() != matrix.num_rows {
            return Err(GridError::LengthMismatch {
                expected: matrix.num_rows,
                got: rhs.len(),
            });
        }
        Ok(Self { matrix, rhs })
    }

    /// Number of unknowns
    pub fn len(&self) -> usize {
        self.rhs.len()
    }

    /// Returns `true` if the system has no unknowns
    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }

    /// Euclidean norm of `b - A x`
    pub fn residual_norm(&self, x: &Array1<f64>) -> Result<f64> {
        if x.len() != self.len() {
            return Err(GridError::LengthMismatch {
                expected: self.len(),
                got: x.len(),
            });
        }
        let ax = self.matrix.matvec(x);
        Ok(ax
            .iter()
            .zip(self.rhs.iter())
            .map(|(a, b)| (b - a) * (b - a))
            .sum::<f64>()
            .sqrt())
    }

    /// Solve the system iteratively
    ///
    /// Starts from `initial_guess`, or from zero when none is given. The solve
    /// is best-effort: a result that did not meet the tolerance is returned
    /// with `converged: false` rather than as an error.
    pub fn solve(
        &self,
        method: SolverMethod,
        config: &IterativeConfig<f64>,
        initial_guess: Option<&Array1<f64>>,
    ) -> Result<Solution> {
        let mut x = match initial_guess {
            Some(guess) if guess.len() != self.len() => {
                return Err(GridError::LengthMismatch {
                    expected: self.len(),
                    got: guess.len(),
                });
            }
            Some(guess) => guess.clone(),
            None => Array1::zeros(self.len()),
        };

        let start = Instant::now();
        let report = solvers::solve(method, &self.matrix, &self.rhs, &mut x, config)?;

        log::debug!(
            "{} {} after {} iterations (residual {:.2e}, {} unknowns, {:.1}ms)",
            method,
            if report.converged {
                "converged"
            } else {
                "did not converge"
            },
            report.iterations,
            report.residual,
            self.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(Solution {
            values: x,
            iterations: report.iterations,
            residual: report.residual,
            converged: report.converged,
        })
    }

    /// Move known boundary values out of the interior rows
    ///
    /// For every interior row `k` and every boundary column `c` whose row is
    /// an identity row (`u_c = rhs[c]`), the entry `A[k, c]` is removed and
    /// `A[k, c] * rhs[c]` is subtracted from `rhs[k]`. The solution is
    /// unchanged; for the Dirichlet Poisson operator the result is symmetric
    /// positive definite, as Conjugate Gradient requires.
    pub fn eliminate_boundary_columns(&mut self, grid: &StructuredGrid) -> Result<()> {
        grid.check_len(self.len())?;
        let n = self.len();

        let known: Vec<bool> = (0..n)
            .map(|c| !grid.is_interior(c) && self.is_identity_row(c))
            .collect();

        let mut rhs = self.rhs.clone();
        let mut builder = CsrBuilder::with_capacity(n, n, self.matrix.nnz());
        let mut removed = 0;
        for k in 0..n {
            if known[k] {
                builder.add_row_entries(self.matrix.row_entries(k))?;
                continue;
            }
            let mut entries = Vec::with_capacity(self.matrix.row_range(k).len());
            for (c, v) in self.matrix.row_entries(k) {
                if c != k && known[c] {
                    rhs[k] -= v * self.rhs[c];
                    removed += 1;
                } else {
                    entries.push((c, v));
                }
            }
            builder.add_row_entries(entries)?;
        }

        self.matrix = builder.finish()?;
        self.rhs = rhs;
        log::debug!("eliminated {} boundary couplings", removed);
        Ok(())
    }

    fn is_identity_row(&self, k: usize) -> bool {
        let mut entries = self.matrix.row_entries(k);
        matches!(
            (entries.next(), entries.next()),
            (Some((c, v)), None) if c == k && v == 1.0
        )
    }
}
