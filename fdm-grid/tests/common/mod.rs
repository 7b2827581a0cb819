//! Fixtures shared by the integration tests

#![allow(dead_code)]

use fdm_grid::{Bounds, StructuredGrid, INACTIVE, INTERIOR};
use ndarray::Array1;

/// Maximum pointwise error over all active points
pub fn max_error(grid: &StructuredGrid, values: &Array1<f64>, exact: impl Fn(f64, f64) -> f64) -> f64 {
    grid.active_points()
        .map(|p| (values[p.index] - exact(p.x, p.y)).abs())
        .fold(0.0, f64::max)
}

/// Pentagon-like region in `[0, 2] × [-2, 2]` with six boundary segments
///
/// Segments: 2 upper-left slant, 3 upper-right slant, 4 left edge,
/// 5 right slope of the middle band, 6 lower-right slant, 7 bottom edge.
pub fn irregular_region(x: f64, y: f64, hx: f64, hy: f64) -> u32 {
    let eps = 1e-12;
    if y > 1.0 && y <= 2.0 + eps {
        if x >= y - 1.0 - eps && x <= 3.0 - y + eps {
            if x <= y - 1.0 + hx - 2.0 * eps {
                2
            } else if x >= 3.0 - y - hx + 2.0 * eps {
                3
            } else {
                INTERIOR
            }
        } else {
            INACTIVE
        }
    } else if y > -1.0 && y <= 1.0 {
        if x >= -eps && x <= 0.5 * y + 1.5 + eps {
            if x <= hx - 2.0 * eps {
                4
            } else if x >= 0.5 * y + 1.5 - hx + 2.0 * eps {
                5
            } else {
                INTERIOR
            }
        } else {
            INACTIVE
        }
    } else if y >= -2.0 - eps && y <= -1.0 {
        if x >= -eps && x <= -y + eps {
            if x <= hx - 2.0 * eps {
                4
            } else if x >= -y - hx + 2.0 * eps {
                if y <= -2.0 + hy - 2.0 * eps {
                    INACTIVE
                } else {
                    6
                }
            } else if y <= -2.0 + hy - 2.0 * eps {
                7
            } else {
                INTERIOR
            }
        } else {
            INACTIVE
        }
    } else {
        INACTIVE
    }
}

/// Bounding box of [`irregular_region`]
pub fn irregular_bounds() -> Bounds {
    Bounds::new(0.0, 2.0, -2.0, 2.0)
}
