//! Explicit (forward Euler) discretization of the heat equation
//!
//! `u_t = Δu + f` advanced by `u ← A u + b(t)` where, with `μx = τ / hx²`
//! and `μy = τ / hy²`, interior rows of `A` are
//! `(1 - 2(μx + μy)) u_c + μx (u_l + u_r) + μy (u_d + u_u)`.
//! Boundary rows of `A` are zero; the boundary value enters through `b`.
//!
//! The scheme is stable for `μx + μy <= 1/2`.

use super::stencil::{assemble_stencil_operator, FivePointStencil};
use crate::error::Result;
use crate::grid::StructuredGrid;
use crate::physics::{TimeBoundaryValue, TimeSourceTerm};
use ndarray::Array1;
use solvers::CsrMatrix;

/// Diffusion numbers `(μx, μy) = (τ / hx², τ / hy²)`
pub fn diffusion_numbers(grid: &StructuredGrid, tau: f64) -> (f64, f64) {
    (
        tau / (grid.hx() * grid.hx()),
        tau / (grid.hy() * grid.hy()),
    )
}

/// Assemble the explicit time-stepping matrix for step size `tau`
pub fn assemble_parabolic_matrix(grid: &StructuredGrid, tau: f64) -> Result<CsrMatrix<f64>> {
    let (mu_x, mu_y) = diffusion_numbers(grid, tau);
    if mu_x + mu_y > 0.5 {
        log::warn!(
            "explicit step tau = {:e} violates mu_x + mu_y <= 1/2 (got {:.3})",
            tau,
            mu_x + mu_y
        );
    }
    let stencil = FivePointStencil::new(1.0 - 2.0 * (mu_x + mu_y), mu_x, mu_y);
    assemble_stencil_operator(grid, "explicit parabolic", &stencil, 0.0)
}

/// Fill `rhs` with the parabolic right-hand side for the step ending at `t`
///
/// Interior rows get `f(x, y, t - τ/2, hx, hy) · τ`, boundary rows get
/// `g(x, y, t, code)`.
pub fn assemble_parabolic_rhs_into(
    grid: &StructuredGrid,
    source: &impl TimeSourceTerm,
    boundary: &impl TimeBoundaryValue,
    t: f64,
    tau: f64,
    rhs: &mut Array1<f64>,
) -> Result<()> {
    grid.check_len(rhs.len())?;
    fill_parabolic_rhs(grid, source, boundary, t, tau, rhs);
    Ok(())
}

fn fill_parabolic_rhs(
    grid: &StructuredGrid,
    source: &impl TimeSourceTerm,
    boundary: &impl TimeBoundaryValue,
    t: f64,
    tau: f64,
    rhs: &mut Array1<f64>,
) {
    let (hx, hy) = (grid.hx(), grid.hy());
    let t_mid = t - tau / 2.0;

    for (slot, p) in rhs.iter_mut().zip(grid.active_points()) {
        *slot = if p.is_interior() {
            source.source(p.x, p.y, t_mid, hx, hy) * tau
        } else {
            boundary.value(p.x, p.y, t, p.code)
        };
    }
}

/// Allocating variant of [`assemble_parabolic_rhs_into`]
pub fn assemble_parabolic_rhs(
    grid: &StructuredGrid,
    source: &impl TimeSourceTerm,
    boundary: &impl TimeBoundaryValue,
    t: f64,
    tau: f64,
) -> Array1<f64> {
    let mut rhs = Array1::zeros(grid.n_active());
    fill_parabolic_rhs(grid, source, boundary, t, tau, &mut rhs);
    rhs
}
