//! Validation of the steady assemblers against manufactured solutions
//!
//! Each test assembles a Poisson problem whose exact solution is known,
//! solves it and compares the discrete solution point by point.

use fdm_grid::solvers::{IterativeConfig, SolverMethod};
use fdm_grid::{
    assemble_dirichlet, assemble_neumann, Bounds, GridError, NeumannAnchor, StructuredGrid,
    INACTIVE, INTERIOR,
};
use std::f64::consts::PI;

mod common;
use common::{irregular_bounds, irregular_region, max_error};

fn irregular_normal(code: u32) -> f64 {
    match code {
        2 => 3.0 * PI / 4.0,
        3 => PI / 4.0,
        4 => PI,
        5 => -(0.5f64).atan(),
        6 => PI / 4.0,
        7 => -PI / 2.0,
        _ => 0.0,
    }
}

/// Solve `-Δu = f` with `u = exp(x + y)` on the unit square
fn exponential_dirichlet_error(n: usize) -> f64 {
    let grid = StructuredGrid::uniform(n, n, Bounds::unit_square()).unwrap();
    let exact = |x: f64, y: f64| (x + y).exp();

    let mut system = assemble_dirichlet(
        &grid,
        &|x: f64, y: f64| -2.0 * exact(x, y),
        &|x: f64, y: f64, _: u32| exact(x, y),
    )
    .unwrap();
    system.eliminate_boundary_columns(&grid).unwrap();

    let solution = system
        .solve(
            SolverMethod::ConjugateGradient,
            &IterativeConfig::new(5000, 1e-10),
            None,
        )
        .unwrap()
        .ensure_converged()
        .unwrap();

    max_error(&grid, &solution.values, exact)
}

#[test]
fn test_dirichlet_second_order_convergence() {
    let errors: Vec<f64> = [9, 17, 33]
        .iter()
        .map(|&n| exponential_dirichlet_error(n))
        .collect();

    assert!(errors[0] < 1e-3, "coarse error too large: {:e}", errors[0]);
    for pair in errors.windows(2) {
        let ratio = pair[0] / pair[1];
        assert!(
            ratio > 3.5 && ratio < 4.5,
            "halving h should divide the error by ~4, got {:.3} ({:?})",
            ratio,
            errors
        );
    }
}

#[test]
fn test_harmonic_solution_with_every_method() {
    let grid = StructuredGrid::uniform(11, 11, Bounds::unit_square()).unwrap();
    let exact = |x: f64, y: f64| x * x - y * y;
    let mut system = assemble_dirichlet(
        &grid,
        &|_: f64, _: f64| 0.0,
        &|x: f64, y: f64, _: u32| exact(x, y),
    )
    .unwrap();

    for method in [SolverMethod::Jacobi, SolverMethod::GaussSeidel] {
        let solution = system
            .solve(method, &IterativeConfig::new(20_000, 1e-10), None)
            .unwrap();
        assert!(solution.converged, "{} did not converge", method);
        let err = max_error(&grid, &solution.values, exact);
        assert!(err < 1e-7, "{}: error {:e}", method, err);
    }

    system.eliminate_boundary_columns(&grid).unwrap();
    let solution = system
        .solve(
            SolverMethod::ConjugateGradient,
            &IterativeConfig::new(1000, 1e-12),
            None,
        )
        .unwrap();
    assert!(solution.converged);
    assert!(max_error(&grid, &solution.values, exact) < 1e-10);
}

#[test]
fn test_dirichlet_on_irregular_region() {
    let exact = |x: f64, y: f64| (PI * x).sin() * (2.0 * PI * y).cos() / (5.0 * PI * PI);
    let mut errors = Vec::new();

    for (nx, ny, active) in [(11, 21, 160), (21, 41, 595)] {
        let grid = StructuredGrid::build(nx, ny, irregular_bounds(), irregular_region).unwrap();
        assert_eq!(grid.n_active(), active);
        assert_eq!(grid.region_at(nx - 1, ny - 1), INACTIVE);

        let system = assemble_dirichlet(
            &grid,
            &|x: f64, y: f64| (PI * x).sin() * (2.0 * PI * y).cos(),
            &|x: f64, y: f64, _: u32| exact(x, y),
        )
        .unwrap();

        let solution = system
            .solve(
                SolverMethod::GaussSeidel,
                &IterativeConfig::new(20_000, 1e-10),
                None,
            )
            .unwrap();
        assert!(solution.converged);
        errors.push(max_error(&grid, &solution.values, exact));
    }

    assert!(errors[0] < 1e-2, "errors {:?}", errors);
    assert!(errors[1] < 0.6 * errors[0], "errors {:?}", errors);
}

#[test]
fn test_neumann_on_irregular_region_needs_inward_neighbours() {
    // The slanted segments meet at the apex, where the inward neighbour
    // selected by the normal lies outside the region
    let grid = StructuredGrid::build(21, 41, irregular_bounds(), irregular_region).unwrap();
    let err = assemble_neumann(
        &grid,
        &|_: f64, _: f64| 0.0,
        &|_: f64, _: f64, _: u32| 0.0,
        &irregular_normal,
        NeumannAnchor::None,
    )
    .unwrap_err();

    assert!(err.is_stencil_error());
    assert!(matches!(err, GridError::InactiveNeighborReference { .. }));
}

/// Unit square sides: left 2, right 3, bottom 4, top 5 (corners go to the sides)
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

fn anchored_neumann_error(n: usize) -> f64 {
    let grid = StructuredGrid::build(n, n, Bounds::unit_square(), square_sides).unwrap();
    let exact = |x: f64, y: f64| (PI * x).cos() * (PI * y).cos();

    let system = assemble_neumann(
        &grid,
        &|x: f64, y: f64| 2.0 * PI * PI * exact(x, y),
        &|_: f64, _: f64, _: u32| 0.0,
        &square_normal,
        NeumannAnchor::FirstInterior(&exact),
    )
    .unwrap();

    let solution = system
        .solve(
            SolverMethod::GaussSeidel,
            &IterativeConfig::new(50_000, 1e-10),
            None,
        )
        .unwrap();
    assert!(solution.converged, "n = {}: {} iterations", n, solution.iterations);

    let first = grid.first_interior().unwrap();
    let (x, y) = grid.point(first);
    assert!((solution.values[first] - exact(x, y)).abs() < 1e-8);

    max_error(&grid, &solution.values, exact)
}

#[test]
fn test_anchored_neumann_converges_under_refinement() {
    let coarse = anchored_neumann_error(11);
    let fine = anchored_neumann_error(21);

    assert!(coarse < 0.6, "coarse error {:e}", coarse);
    assert!(fine < 0.7 * coarse, "coarse {:e}, fine {:e}", coarse, fine);
}

#[test]
fn test_derivative_of_discrete_solution() {
    let grid = StructuredGrid::uniform(17, 17, Bounds::unit_square()).unwrap();
    let exact = |x: f64, y: f64| x * x - y * y;
    let mut system = assemble_dirichlet(
        &grid,
        &|_: f64, _: f64| 0.0,
        &|x: f64, y: f64, _: u32| exact(x, y),
    )
    .unwrap();
    system.eliminate_boundary_columns(&grid).unwrap();
    let solution = system
        .solve(
            SolverMethod::ConjugateGradient,
            &IterativeConfig::new(1000, 1e-12),
            None,
        )
        .unwrap();

    let du_dx = grid.derivative(&solution.values, fdm_grid::Axis::X).unwrap();
    let du_dy = grid.derivative(&solution.values, fdm_grid::Axis::Y).unwrap();
    for p in grid.active_points().filter(|p| p.is_interior()) {
        // Central differences are exact for quadratics
        assert!((du_dx[p.index] - 2.0 * p.x).abs() < 1e-8);
        assert!((du_dy[p.index] + 2.0 * p.y).abs() < 1e-8);
    }
}
