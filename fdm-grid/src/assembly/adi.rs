//! Peaceman-Rachford ADI splitting of the heat equation
//!
//! One time step of size `τ` alternates an explicit half-step in one
//! direction with an implicit half-step in the other:
//!
//! ```text
//! (I - τ/2 δx²) u*   = (I + τ/2 δy²) uⁿ  + b
//! (I - τ/2 δy²) uⁿ⁺¹ = (I + τ/2 δx²) u*  + b
//! ```
//!
//! With `μx = τ / hx²`, `μy = τ / hy²` the four operators are
//!
//! | operator   | center   | neighbours       | boundary rows |
//! |------------|----------|------------------|---------------|
//! | `plus_dy`  | `1 - μy` | down/up `μy/2`   | 0             |
//! | `minus_dx` | `1 + μx` | left/right `-μx/2` | identity    |
//! | `plus_dx`  | `1 - μx` | left/right `μx/2`  | 0           |
//! | `minus_dy` | `1 + μy` | down/up `-μy/2`  | identity      |
//!
//! The "plus" operators are applied by matrix-vector product, the "minus"
//! operators are solved against. Boundary values reach the solution through
//! the right-hand side, which is why the implicit operators carry identity
//! boundary rows.

use super::parabolic::diffusion_numbers;
use super::stencil::{assemble_stencil_operator, FivePointStencil};
use crate::error::Result;
use crate::grid::StructuredGrid;
use solvers::CsrMatrix;

/// The four split operators of one ADI step
#[derive(Debug, Clone, PartialEq)]
pub struct AdiOperators {
    /// Explicit half-step in y
    pub plus_dy: CsrMatrix<f64>,
    /// Implicit half-step in x
    pub minus_dx: CsrMatrix<f64>,
    /// Explicit half-step in x
    pub plus_dx: CsrMatrix<f64>,
    /// Implicit half-step in y
    pub minus_dy: CsrMatrix<f64>,
}

/// Assemble the four ADI operators for step size `tau`
pub fn assemble_adi_operators(grid: &StructuredGrid, tau: f64) -> Result<AdiOperators> {
    let (mu_x, mu_y) = diffusion_numbers(grid, tau);

    Ok(AdiOperators {
        plus_dy: assemble_stencil_operator(
            grid,
            "ADI plus_dy",
            &FivePointStencil::along_y(1.0 - mu_y, mu_y / 2.0),
            0.0,
        )?,
        minus_dx: assemble_stencil_operator(
            grid,
            "ADI minus_dx",
            &FivePointStencil::along_x(1.0 + mu_x, -mu_x / 2.0),
            1.0,
        )?,
        plus_dx: assemble_stencil_operator(
            grid,
            "ADI plus_dx",
            &FivePointStencil::along_x(1.0 - mu_x, mu_x / 2.0),
            0.0,
        )?,
        minus_dy: assemble_stencil_operator(
            grid,
            "ADI minus_dy",
            &FivePointStencil::along_y(1.0 + mu_y, -mu_y / 2.0),
            1.0,
        )?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Bounds, Direction};
    use approx::assert_relative_eq;

    #[test]
    fn test_operator_rows() {
        let grid = StructuredGrid::uniform(5, 3, Bounds::unit_square()).unwrap();
        let tau = 0.01;
        let (mu_x, mu_y) = (0.16, 0.04);
        let ops = assemble_adi_operators(&grid, tau).unwrap();

        let k = grid.index_of(2, 1).unwrap();
        let left = grid.index_of(1, 1).unwrap();
        let right = grid.index_of(3, 1).unwrap();
        let down = grid.index_of(2, 0).unwrap();
        let up = grid.index_of(2, 2).unwrap();

        let cols = |a: &CsrMatrix<f64>| a.row_entries(k).map(|(c, _)| c).collect::<Vec<_>>();
        assert_eq!(cols(&ops.plus_dy), vec![k, down, up]);
        assert_eq!(cols(&ops.minus_dx), vec![k, left, right]);
        assert_eq!(cols(&ops.plus_dx), vec![k, left, right]);
        assert_eq!(cols(&ops.minus_dy), vec![k, down, up]);

        assert_relative_eq!(ops.plus_dy.get(k, k), 1.0 - mu_y, epsilon = 1e-12);
        assert_relative_eq!(ops.plus_dy.get(k, up), mu_y / 2.0, epsilon = 1e-12);
        assert_relative_eq!(ops.minus_dx.get(k, k), 1.0 + mu_x, epsilon = 1e-12);
        assert_relative_eq!(ops.minus_dx.get(k, left), -mu_x / 2.0, epsilon = 1e-12);
        assert_relative_eq!(ops.plus_dx.get(k, right), mu_x / 2.0, epsilon = 1e-12);
        assert_relative_eq!(ops.minus_dy.get(k, down), -mu_y / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_boundary_rows() {
        let grid = StructuredGrid::uniform(4, 4, Bounds::unit_square()).unwrap();
        let ops = assemble_adi_operators(&grid, 0.001).unwrap();

        for k in (0..grid.n_active()).filter(|&k| !grid.is_interior(k)) {
            assert_eq!(ops.plus_dy.row_entries(k).collect::<Vec<_>>(), vec![(k, 0.0)]);
            assert_eq!(ops.plus_dx.row_entries(k).collect::<Vec<_>>(), vec![(k, 0.0)]);
            assert_eq!(ops.minus_dx.row_entries(k).collect::<Vec<_>>(), vec![(k, 1.0)]);
            assert_eq!(ops.minus_dy.row_entries(k).collect::<Vec<_>>(), vec![(k, 1.0)]);
        }
        assert_eq!(ops.minus_dx.nnz(), 3 * grid.interior_count() + grid.boundary_count());
    }

    #[test]
    fn test_half_steps_compose_to_explicit_operator_to_first_order() {
        // (I + τ/2 δx²)(I + τ/2 δy²) = I + τ/2 Δ + O(τ²) on interior rows
        let grid = StructuredGrid::uniform(7, 7, Bounds::unit_square()).unwrap();
        let tau = 1e-6;
        let ops = assemble_adi_operators(&grid, tau).unwrap();
        let half = super::super::parabolic::assemble_parabolic_matrix(&grid, tau / 2.0).unwrap();

        let u = grid.gather(|x, y| (x * 3.0).sin() + y * y);
        let composed = ops.plus_dx.matvec(&ops.plus_dy.matvec(&u));
        let explicit = half.matvec(&u);

        for p in grid.active_points() {
            let both_interior = p.is_interior()
                && Direction::ALL.iter().all(|&d| {
                    grid.neighbor(p.index, d).is_some_and(|n| grid.is_interior(n))
                });
            if both_interior {
                assert_relative_eq!(composed[p.index], explicit[p.index], epsilon = 1e-6);
            }
        }
    }
}
