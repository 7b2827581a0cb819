//! Poisson problem with Dirichlet boundary conditions
//!
//! Discretizes `-Δu = f` with the five-point stencil scaled by `h²`:
//! interior rows are `4 u_c - u_l - u_r - u_d - u_u = f h²`, boundary rows
//! are identity rows carrying the prescribed value.

use super::stencil::{assemble_stencil_operator, warn_if_anisotropic, FivePointStencil};
use crate::error::Result;
use crate::grid::StructuredGrid;
use crate::physics::{BoundaryValue, SourceTerm};
use crate::system::LinearSystem;
use ndarray::Array1;
use solvers::CsrMatrix;

/// Assemble the Dirichlet Poisson matrix
///
/// Interior rows use the five-point Laplacian and require all four
/// neighbours to be active; boundary rows are identity rows.
pub fn assemble_dirichlet_matrix(grid: &StructuredGrid) -> Result<CsrMatrix<f64>> {
    warn_if_anisotropic(grid, "Dirichlet");
    assemble_stencil_operator(grid, "Dirichlet", &FivePointStencil::laplacian(), 1.0)
}

/// Assemble the Dirichlet right-hand side
///
/// Interior rows get `f(x, y) · hx · hy`, boundary rows get
/// `boundary(x, y, code)`.
pub fn assemble_dirichlet_rhs(
    grid: &StructuredGrid,
    source: &impl SourceTerm,
    boundary: &impl BoundaryValue,
) -> Array1<f64> {
    let area = grid.hx() * grid.hy();
    Array1::from_iter(grid.active_points().map(|p| {
        if p.is_interior() {
            source.source(p.x, p.y) * area
        } else {
            boundary.value(p.x, p.y, p.code)
        }
    }))
}

/// Assemble matrix and right-hand side of the Dirichlet Poisson problem
pub fn assemble_dirichlet(
    grid: &StructuredGrid,
    source: &impl SourceTerm,
    boundary: &impl BoundaryValue,
) -> Result<LinearSystem> {
    let matrix = assemble_dirichlet_matrix(grid)?;
    let rhs = assemble_dirichlet_rhs(grid, source, boundary);
    LinearSystem::new(matrix, rhs)
}
