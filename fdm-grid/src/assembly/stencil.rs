//! Five-point stencil rows
//!
//! Every assembler walks the active points in index order and emits one CSR
//! row per point: a stencil row for interior points and a short boundary row
//! otherwise. Entries are emitted center first, then left, right, down, up.

use crate::error::Result;
use crate::grid::{Direction, StructuredGrid};
use solvers::{CsrBuilder, CsrMatrix};

/// Coefficients of a five-point stencil; `None` leaves the neighbour out of the row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FivePointStencil {
    /// Coefficient of the point itself
    pub center: f64,
    /// Coefficient of `(i - 1, j)`
    pub left: Option<f64>,
    /// Coefficient of `(i + 1, j)`
    pub right: Option<f64>,
    /// Coefficient of `(i, j - 1)`
    pub down: Option<f64>,
    /// Coefficient of `(i, j + 1)`
    pub up: Option<f64>,
}

impl FivePointStencil {
    /// Full stencil with separate x and y neighbour weights
    pub fn new(center: f64, x_weight: f64, y_weight: f64) -> Self {
        Self {
            center,
            left: Some(x_weight),
            right: Some(x_weight),
            down: Some(y_weight),
            up: Some(y_weight),
        }
    }

    /// Negative discrete Laplacian scaled by `h²`: 4 on the center, -1 on the neighbours
    pub fn laplacian() -> Self {
        Self::new(4.0, -1.0, -1.0)
    }

    /// Three-point stencil along x
    pub fn along_x(center: f64, weight: f64) -> Self {
        Self {
            center,
            left: Some(weight),
            right: Some(weight),
            down: None,
            up: None,
        }
    }

    /// Three-point stencil along y
    pub fn along_y(center: f64, weight: f64) -> Self {
        Self {
            center,
            left: None,
            right: None,
            down: Some(weight),
            up: Some(weight),
        }
    }

    /// Number of entries the stencil emits
    pub fn width(&self) -> usize {
        1 + self.neighbors().iter().filter(|(_, w)| w.is_some()).count()
    }

    fn neighbors(&self) -> [(Direction, Option<f64>); 4] {
        [
            (Direction::Left, self.left),
            (Direction::Right, self.right),
            (Direction::Down, self.down),
            (Direction::Up, self.up),
        ]
    }
}

/// Append the stencil row of active point `k`
///
/// Every neighbour the stencil uses must be active; otherwise
/// [`GridError::InactiveNeighborReference`](crate::GridError::InactiveNeighborReference)
/// is returned and nothing is appended.
pub(crate) fn push_stencil_row(
    builder: &mut CsrBuilder<f64>,
    grid: &StructuredGrid,
    k: usize,
    stencil: &FivePointStencil,
) -> Result<()> {
    let mut entries = [(k, stencil.center); 5];
    let mut len = 1;
    for (direction, weight) in stencil.neighbors() {
        if let Some(w) = weight {
            entries[len] = (grid.require_neighbor(k, direction)?, w);
            len += 1;
        }
    }
    builder.add_row_entries(entries[..len].iter().copied())?;
    Ok(())
}

/// Assemble an operator with one stencil for interior rows and a single
/// diagonal entry for boundary rows
///
/// The builder is capacity-bounded at `stencil.width()` entries per row.
pub(crate) fn assemble_stencil_operator(
    grid: &StructuredGrid,
    name: &str,
    stencil: &FivePointStencil,
    boundary_diagonal: f64,
) -> Result<CsrMatrix<f64>> {
    let n = grid.n_active();
    let mut builder = CsrBuilder::with_capacity(n, n, stencil.width() * n);

    for k in 0..n {
        if grid.is_interior(k) {
            push_stencil_row(&mut builder, grid, k, stencil)?;
        } else {
            builder.add_row_entries([(k, boundary_diagonal)])?;
        }
    }

    let matrix = builder.finish()?;
    log::debug!(
        "assembled {} operator: {} rows, {} stored entries",
        name,
        matrix.num_rows,
        matrix.nnz()
    );
    Ok(matrix)
}

/// Warn when an assembler that assumes `hx == hy` is used on a stretched grid
pub(crate) fn warn_if_anisotropic(grid: &StructuredGrid, name: &str) {
    let (hx, hy) = (grid.hx(), grid.hy());
    if (hx - hy).abs() > 1e-12 * hx.max(hy) {
        log::warn!(
            "{} assembly assumes hx == hy, got hx = {:.6e}, hy = {:.6e}",
            name,
            hx,
            hy
        );
    }
}
