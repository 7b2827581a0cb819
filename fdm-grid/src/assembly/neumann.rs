//! Poisson problem with Neumann boundary conditions
//!
//! Interior rows use the same five-point Laplacian as the Dirichlet problem.
//! A boundary row discretizes the outward normal derivative
//! `∂u/∂n = cos α ∂u/∂x + sin α ∂u/∂y` with one-sided differences towards
//! the inside of the domain:
//!
//! ```text
//! (|sin α| + |cos α|) u_c  ∓ sin α u_(i, j∓1)  ∓ cos α u_(i∓1, j)  =  g h
//! ```
//!
//! The y neighbour is below the point when `sin α > 0` and above it when
//! `sin α < 0`; likewise for x with `cos α`. Terms whose weight is below
//! `1e-12` in magnitude are left out.
//!
//! A pure Neumann problem only determines `u` up to a constant. With
//! [`NeumannAnchor::FirstInterior`] the first interior row is replaced by an
//! identity row whose value comes from the anchor callback.

use super::stencil::{push_stencil_row, warn_if_anisotropic, FivePointStencil};
use crate::error::Result;
use crate::grid::{Direction, StructuredGrid};
use crate::physics::{AnchorValue, BoundaryValue, NormalAngle, SourceTerm};
use crate::system::LinearSystem;
use ndarray::Array1;
use solvers::{CsrBuilder, CsrMatrix};
use std::fmt;

/// Trigonometric weights below this magnitude are omitted from boundary rows
pub const NORMAL_WEIGHT_EPS: f64 = 1e-12;

/// How the singular Neumann operator is made solvable
#[derive(Clone, Copy, Default)]
pub enum NeumannAnchor<'a> {
    /// Raw operator, determined only up to a constant
    #[default]
    None,
    /// Pin the first interior point to the callback's value
    FirstInterior(&'a dyn AnchorValue),
}

impl fmt::Debug for NeumannAnchor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NeumannAnchor::None => f.write_str("None"),
            NeumannAnchor::FirstInterior(_) => f.write_str("FirstInterior"),
        }
    }
}

impl NeumannAnchor<'_> {
    /// Active index of the pinned row, if any
    fn anchored_row(&self, grid: &StructuredGrid) -> Option<usize> {
        match self {
            NeumannAnchor::None => None,
            NeumannAnchor::FirstInterior(_) => grid.first_interior(),
        }
    }
}

/// Assemble the Neumann Poisson matrix
pub fn assemble_neumann_matrix(
    grid: &StructuredGrid,
    normal: &impl NormalAngle,
    anchor: NeumannAnchor<'_>,
) -> Result<CsrMatrix<f64>> {
    warn_if_anisotropic(grid, "Neumann");

    let n = grid.n_active();
    let anchored = anchor.anchored_row(grid);
    let laplacian = FivePointStencil::laplacian();
    let mut builder = CsrBuilder::with_capacity(n, n, laplacian.width() * n);

    for k in 0..n {
        if Some(k) == anchored {
            builder.add_row_entries([(k, 1.0)])?;
        } else if grid.is_interior(k) {
            push_stencil_row(&mut builder, grid, k, &laplacian)?;
        } else {
            let alpha = normal.angle(grid.region_of(k));
            push_normal_row(&mut builder, grid, k, alpha)?;
        }
    }

    let matrix = builder.finish()?;
    log::debug!(
        "assembled Neumann operator: {} rows, {} stored entries, anchor {:?}",
        matrix.num_rows,
        matrix.nnz(),
        anchor
    );
    Ok(matrix)
}

fn push_normal_row(
    builder: &mut CsrBuilder<f64>,
    grid: &StructuredGrid,
    k: usize,
    alpha: f64,
) -> Result<()> {
    let (sin, cos) = alpha.sin_cos();
    let mut entries = [(k, sin.abs() + cos.abs()); 3];
    let mut len = 1;

    if sin.abs() >= NORMAL_WEIGHT_EPS {
        let direction = if sin > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };
        entries[len] = (grid.require_neighbor(k, direction)?, -sin.abs());
        len += 1;
    }
    if cos.abs() >= NORMAL_WEIGHT_EPS {
        let direction = if cos > 0.0 {
            Direction::Left
        } else {
            Direction::Right
        };
        entries[len] = (grid.require_neighbor(k, direction)?, -cos.abs());
        len += 1;
    }

    builder.add_row_entries(entries[..len].iter().copied())?;
    Ok(())
}

/// Assemble the Neumann right-hand side
///
/// Interior rows get `f(x, y) · hx · hy`, boundary rows get the flux
/// `g(x, y, code) · hx`, and an anchored row gets the anchor value.
pub fn assemble_neumann_rhs(
    grid: &StructuredGrid,
    source: &impl SourceTerm,
    flux: &impl BoundaryValue,
    anchor: NeumannAnchor<'_>,
) -> Array1<f64> {
    let area = grid.hx() * grid.hy();
    let h = grid.hx();
    let anchored = anchor.anchored_row(grid);

    Array1::from_iter(grid.active_points().map(|p| match anchor {
        NeumannAnchor::FirstInterior(value) if Some(p.index) == anchored => value.anchor(p.x, p.y),
        _ if p.is_interior() => source.source(p.x, p.y) * area,
        _ => flux.value(p.x, p.y, p.code) * h,
    }))
}

/// Assemble matrix and right-hand side of the Neumann Poisson problem
pub fn assemble_neumann(
    grid: &StructuredGrid,
    source: &impl SourceTerm,
    flux: &impl BoundaryValue,
    normal: &impl NormalAngle,
    anchor: NeumannAnchor<'_>,
) -> Result<LinearSystem> {
    let matrix = assemble_neumann_matrix(grid, normal, anchor)?;
    let rhs = assemble_neumann_rhs(grid, source, flux, anchor);
    LinearSystem::new(matrix, rhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Bounds, INTERIOR};
    use crate::GridError;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    /// Unit square: left 2, right 3, bottom 4, top 5; corners belong to left/right
    fn square_sides(x: f64, y: f64, hx: f64, hy: f64) -> u32 {
        let eps = 1e-12;
        if x < hx / 2.0 - eps {
            2
        } else if x > 1.0 - hx / 2.0 + eps {
            3
        } else if y < hy / 2.0 - eps {
            4
        } else if y > 1.0 - hy / 2.0 + eps {
            5
        } else {
            INTERIOR
        }
    }

    fn square_normal(code: u32) -> f64 {
        match code {
            2 => PI,
            3 => 0.0,
            4 => -PI / 2.0,
            5 => PI / 2.0,
            _ => 0.0,
        }
    }

    #[test]
    fn test_boundary_rows_point_inwards() {
        let grid = StructuredGrid::build(4, 4, Bounds::unit_square(), square_sides).unwrap();
        let a = assemble_neumann_matrix(&grid, &square_normal, NeumannAnchor::None).unwrap();

        // Left side point (0, 1): normal π, neighbour to the right
        let k = grid.index_of(0, 1).unwrap();
        let right = grid.index_of(1, 1).unwrap();
        let row: Vec<_> = a.row_entries(k).collect();
        assert_eq!(row.len(), 2);
        assert_eq!(row[0].0, k);
        assert_relative_eq!(row[0].1, 1.0, epsilon = 1e-12);
        assert_eq!(row[1].0, right);
        assert_relative_eq!(row[1].1, -1.0, epsilon = 1e-12);

        // Top point (1, 3): normal π/2, neighbour below
        let k = grid.index_of(1, 3).unwrap();
        let below = grid.index_of(1, 2).unwrap();
        let row: Vec<_> = a.row_entries(k).collect();
        assert_eq!(row.len(), 2);
        assert_eq!(row[1].0, below);
    }

    #[test]
    fn test_rows_annihilate_constants() {
        let grid = StructuredGrid::build(6, 6, Bounds::unit_square(), square_sides).unwrap();
        let a = assemble_neumann_matrix(&grid, &square_normal, NeumannAnchor::None).unwrap();

        let ones = Array1::from_elem(grid.n_active(), 1.0);
        for v in a.matvec(&ones).iter() {
            assert!(v.abs() < 1e-12);
        }
    }

    #[test]
    fn test_oblique_normal_uses_both_neighbours() {
        let grid = StructuredGrid::uniform(3, 3, Bounds::unit_square()).unwrap();
        // Top-right corner with an outward normal at 45 degrees
        let k = grid.index_of(2, 2).unwrap();
        let a = assemble_neumann_matrix(&grid, &|_: u32| PI / 4.0, NeumannAnchor::None);

        // Other boundary points also use 45 degrees and some of them have no
        // left or lower neighbour
        assert!(a.is_err());

        let mut builder = CsrBuilder::new(1, grid.n_active());
        push_normal_row(&mut builder, &grid, k, PI / 4.0).unwrap();
        let row = builder.finish().unwrap();
        let s = (PI / 4.0).sin();
        assert_eq!(row.col_indices, vec![k, grid.index_of(2, 1).unwrap(), grid.index_of(1, 2).unwrap()]);
        assert_relative_eq!(row.values[0], 2.0 * s, epsilon = 1e-12);
        assert_relative_eq!(row.values[1], -s, epsilon = 1e-12);
        assert_relative_eq!(row.values[2], -s, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_inward_neighbour() {
        let grid = StructuredGrid::uniform(3, 3, Bounds::unit_square()).unwrap();
        // Normal pointing inwards at the left edge needs the point at i = -1
        let err = assemble_neumann_matrix(&grid, &|_: u32| 0.0, NeumannAnchor::None).unwrap_err();
        assert!(matches!(
            err,
            GridError::InactiveNeighborReference { index: 0, i: -1, j: 0 }
        ));
    }

    #[test]
    fn test_anchor_row_and_rhs() {
        let grid = StructuredGrid::build(5, 5, Bounds::unit_square(), square_sides).unwrap();
        let exact = |x: f64, y: f64| x * x + y;
        let anchor = NeumannAnchor::FirstInterior(&exact);
        let first = grid.first_interior().unwrap();

        let a = assemble_neumann_matrix(&grid, &square_normal, anchor).unwrap();
        assert_eq!(a.row_entries(first).collect::<Vec<_>>(), vec![(first, 1.0)]);

        let b = assemble_neumann_rhs(
            &grid,
            &|_: f64, _: f64| 2.0,
            &|_: f64, _: f64, _: u32| 1.0,
            anchor,
        );
        let (x, y) = grid.point(first);
        assert_relative_eq!(b[first], exact(x, y));

        let h = grid.hx();
        for p in grid.active_points().filter(|p| p.index != first) {
            if p.is_interior() {
                assert_relative_eq!(b[p.index], 2.0 * h * h);
            } else {
                assert_relative_eq!(b[p.index], h);
            }
        }
    }

    #[test]
    fn test_anchor_debug() {
        let value = |_: f64, _: f64| 0.0;
        assert_eq!(format!("{:?}", NeumannAnchor::FirstInterior(&value)), "FirstInterior");
        assert_eq!(format!("{:?}", NeumannAnchor::default()), "None");
    }
}
