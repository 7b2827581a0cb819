//! Structured 2D grid with an irregular active region
//!
//! A uniform `nx × ny` lattice over a rectangle is classified point by point
//! with a caller-supplied [`RegionDivider`]:
//!
//! - code `0`: inactive, not part of the linear system
//! - code `1`: interior, discretized with a full stencil
//! - code `>= 2`: boundary segment, meaning owned by the physics layer
//!
//! Active points (code > 0) are numbered sequentially in row-major order over
//! `i` (outer, x) then `j` (inner, y). The numbering is observable in every
//! assembled matrix and solution vector.

use crate::error::{GridError, Result};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Region code of a point outside the domain
pub const INACTIVE: u32 = 0;

/// Region code of an interior point
pub const INTERIOR: u32 = 1;

/// Rectangular domain `[x0, x1] × [y0, y1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower x bound
    pub x0: f64,
    /// Upper x bound
    pub x1: f64,
    /// Lower y bound
    pub y0: f64,
    /// Upper y bound
    pub y1: f64,
}

impl Bounds {
    /// Create bounds from the two axis intervals
    pub fn new(x0: f64, x1: f64, y0: f64, y1: f64) -> Self {
        Self { x0, x1, y0, y1 }
    }

    /// The unit square `[0, 1] × [0, 1]`
    pub fn unit_square() -> Self {
        Self::new(0.0, 1.0, 0.0, 1.0)
    }

    /// Check that both intervals are finite and non-empty
    pub fn validate(&self) -> Result<()> {
        for (axis, lower, upper) in [('x', self.x0, self.x1), ('y', self.y0, self.y1)] {
            if !lower.is_finite() || !upper.is_finite() || lower >= upper {
                return Err(GridError::InvalidBounds { axis, lower, upper });
            }
        }
        Ok(())
    }
}

/// Classifies a grid point from its coordinates and the grid spacing
pub trait RegionDivider {
    /// Region code of the point `(x, y)`
    fn classify(&self, x: f64, y: f64, hx: f64, hy: f64) -> u32;
}

impl<F> RegionDivider for F
where
    F: Fn(f64, f64, f64, f64) -> u32,
{
    fn classify(&self, x: f64, y: f64, hx: f64, hy: f64) -> u32 {
        self(x, y, hx, hy)
    }
}

/// Axis-aligned neighbour of a grid point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `(i - 1, j)`
    Left,
    /// `(i + 1, j)`
    Right,
    /// `(i, j - 1)`
    Down,
    /// `(i, j + 1)`
    Up,
}

impl Direction {
    /// All four directions in stencil order
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Down,
        Direction::Up,
    ];

    /// Index offset `(di, dj)`
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, -1),
            Direction::Up => (0, 1),
        }
    }
}

/// Coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Along `i`
    X,
    /// Along `j`
    Y,
}

/// An active grid point with its numbering and classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivePoint {
    /// Active index
    pub index: usize,
    /// Grid column
    pub i: usize,
    /// Grid row
    pub j: usize,
    /// x coordinate
    pub x: f64,
    /// y coordinate
    pub y: f64,
    /// Region code (>= 1)
    pub code: u32,
}

impl ActivePoint {
    /// Returns `true` for interior points (code 1)
    pub fn is_interior(&self) -> bool {
        self.code == INTERIOR
    }
}

/// Classified structured grid
///
/// Built once and immutable afterwards. Grid fields are stored as `(nx, ny)`
/// arrays indexed `[[i, j]]`.
#[derive(Debug, Clone)]
pub struct StructuredGrid {
    nx: usize,
    ny: usize,
    bounds: Bounds,
    hx: f64,
    hy: f64,
    x: Array1<f64>,
    y: Array1<f64>,
    region: Array2<u32>,
    id_map: Array2<Option<usize>>,
    coords: Vec<(usize, usize)>,
    n_interior: usize,
}

impl StructuredGrid {
    /// Build and classify a grid
    ///
    /// `divider` is called once per grid point with `(x[i], y[j], hx, hy)` in
    /// row-major order.
    pub fn build(nx: usize, ny: usize, bounds: Bounds, divider: impl RegionDivider) -> Result<Self> {
        Self::classify_with(nx, ny, bounds, |_, _, x, y, hx, hy| {
            divider.classify(x, y, hx, hy)
        })
    }

    /// Build a grid where every point of the rectangle is active
    ///
    /// Points on the four edges get boundary code 2, all others are interior.
    pub fn uniform(nx: usize, ny: usize, bounds: Bounds) -> Result<Self> {
        Self::classify_with(nx, ny, bounds, |i, j, _, _, _, _| {
            if i == 0 || j == 0 || i == nx - 1 || j == ny - 1 {
                2
            } else {
                INTERIOR
            }
        })
    }

    fn classify_with<F>(nx: usize, ny: usize, bounds: Bounds, code_of: F) -> Result<Self>
    where
        F: Fn(usize, usize, f64, f64, f64, f64) -> u32,
    {
        if nx < 2 || ny < 2 {
            return Err(GridError::InvalidGridDimensions { nx, ny });
        }
        bounds.validate()?;

        let hx = (bounds.x1 - bounds.x0) / (nx - 1) as f64;
        let hy = (bounds.y1 - bounds.y0) / (ny - 1) as f64;
        let x = Array1::from_iter((0..nx).map(|i| bounds.x0 + i as f64 * hx));
        let y = Array1::from_iter((0..ny).map(|j| bounds.y0 + j as f64 * hy));

        // Pass 1: classify and number
        let mut region = Array2::from_elem((nx, ny), INACTIVE);
        let mut id_map = Array2::from_elem((nx, ny), None);
        let mut n_active = 0;
        let mut n_interior = 0;
        for i in 0..nx {
            for j in 0..ny {
                let code = code_of(i, j, x[i], y[j], hx, hy);
                if code > INACTIVE {
                    region[[i, j]] = code;
                    id_map[[i, j]] = Some(n_active);
                    n_active += 1;
                    if code == INTERIOR {
                        n_interior += 1;
                    }
                }
            }
        }

        // Pass 2: reverse map
        let mut coords = vec![(0, 0); n_active];
        for ((i, j), id) in id_map.indexed_iter() {
            if let Some(k) = *id {
                coords[k] = (i, j);
            }
        }

        log::debug!(
            "classified {}x{} grid: {} active points ({} interior), hx = {:.6e}, hy = {:.6e}",
            nx,
            ny,
            n_active,
            n_interior,
            hx,
            hy
        );

        Ok(Self {
            nx,
            ny,
            bounds,
            hx,
            hy,
            x,
            y,
            region,
            id_map,
            coords,
            n_interior,
        })
    }

    /// Points along x
    pub fn nx(&self) -> usize {
        self.nx
    }

    /// Points along y
    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Domain bounds
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Spacing along x
    pub fn hx(&self) -> f64 {
        self.hx
    }

    /// Spacing along y
    pub fn hy(&self) -> f64 {
        self.hy
    }

    /// x coordinates, length `nx`
    pub fn x(&self) -> ArrayView1<'_, f64> {
        self.x.view()
    }

    /// y coordinates, length `ny`
    pub fn y(&self) -> ArrayView1<'_, f64> {
        self.y.view()
    }

    /// Region codes, shape `(nx, ny)`
    pub fn region(&self) -> ArrayView2<'_, u32> {
        self.region.view()
    }

    /// Forward index map, shape `(nx, ny)`; `None` for inactive points
    pub fn id_map(&self) -> ArrayView2<'_, Option<usize>> {
        self.id_map.view()
    }

    /// Region code at grid position `(i, j)`
    pub fn region_at(&self, i: usize, j: usize) -> u32 {
        self.region[[i, j]]
    }

    /// Active index of grid position `(i, j)`
    pub fn index_of(&self, i: usize, j: usize) -> Option<usize> {
        self.id_map.get((i, j)).copied().flatten()
    }

    /// Number of active points
    pub fn n_active(&self) -> usize {
        self.coords.len()
    }

    /// Number of interior points (code 1)
    pub fn interior_count(&self) -> usize {
        self.n_interior
    }

    /// Number of boundary points (code >= 2)
    pub fn boundary_count(&self) -> usize {
        self.n_active() - self.n_interior
    }

    /// Grid position `(i, j)` of active point `k`
    pub fn grid_index(&self, k: usize) -> (usize, usize) {
        self.coords[k]
    }

    /// Coordinates `(x, y)` of active point `k`
    pub fn point(&self, k: usize) -> (f64, f64) {
        let (i, j) = self.coords[k];
        (self.x[i], self.y[j])
    }

    /// Region code of active point `k`
    pub fn region_of(&self, k: usize) -> u32 {
        let (i, j) = self.coords[k];
        self.region[[i, j]]
    }

    /// Returns `true` if active point `k` is interior
    pub fn is_interior(&self, k: usize) -> bool {
        self.region_of(k) == INTERIOR
    }

    /// Full description of active point `k`
    pub fn active_point(&self, k: usize) -> ActivePoint {
        let (i, j) = self.coords[k];
        ActivePoint {
            index: k,
            i,
            j,
            x: self.x[i],
            y: self.y[j],
            code: self.region[[i, j]],
        }
    }

    /// Iterate over active points in index order
    pub fn active_points(&self) -> impl Iterator<Item = ActivePoint> + '_ {
        (0..self.n_active()).map(move |k| self.active_point(k))
    }

    /// Lowest active index with code 1
    pub fn first_interior(&self) -> Option<usize> {
        (0..self.n_active()).find(|&k| self.is_interior(k))
    }

    /// Active index of the neighbour of `k` in `direction`, if it is active
    pub fn neighbor(&self, k: usize, direction: Direction) -> Option<usize> {
        let (i, j) = self.offset_position(k, direction);
        if i < 0 || j < 0 {
            return None;
        }
        self.index_of(i as usize, j as usize)
    }

    /// Like [`neighbor`](Self::neighbor), but a missing neighbour is an error
    pub fn require_neighbor(&self, k: usize, direction: Direction) -> Result<usize> {
        self.neighbor(k, direction).ok_or_else(|| {
            let (i, j) = self.offset_position(k, direction);
            GridError::InactiveNeighborReference { index: k, i, j }
        })
    }

    fn offset_position(&self, k: usize, direction: Direction) -> (isize, isize) {
        let (i, j) = self.coords[k];
        let (di, dj) = direction.offset();
        (i as isize + di, j as isize + dj)
    }

    /// Check that `values` has one entry per active point
    pub fn check_len(&self, len: usize) -> Result<()> {
        if len != self.n_active() {
            return Err(GridError::LengthMismatch {
                expected: self.n_active(),
                got: len,
            });
        }
        Ok(())
    }

    /// Map an active-point vector back onto the `(nx, ny)` grid
    ///
    /// Inactive points get `fill`.
    pub fn scatter(&self, values: &Array1<f64>, fill: f64) -> Result<Array2<f64>> {
        self.check_len(values.len())?;
        Ok(self.id_map.mapv(|id| id.map_or(fill, |k| values[k])))
    }

    /// Evaluate `f(x, y)` at every active point
    pub fn gather(&self, f: impl Fn(f64, f64) -> f64) -> Array1<f64> {
        Array1::from_iter(self.active_points().map(|p| f(p.x, p.y)))
    }

    /// Finite-difference partial derivative of an active-point field
    ///
    /// Central differences where both axis neighbours are active, one-sided
    /// differences at grid edges and next to inactive points.
    pub fn derivative(&self, values: &Array1<f64>, axis: Axis) -> Result<Array1<f64>> {
        self.check_len(values.len())?;
        let (backward, forward, h) = match axis {
            Axis::X => (Direction::Left, Direction::Right, self.hx),
            Axis::Y => (Direction::Down, Direction::Up, self.hy),
        };

        let mut derivative = Array1::zeros(self.n_active());
        for k in 0..self.n_active() {
            let prev = self.neighbor(k, backward);
            let next = self.neighbor(k, forward);
            derivative[k] = match (prev, next) {
                (Some(p), Some(n)) => (values[n] - values[p]) / (2.0 * h),
                (None, Some(n)) => (values[n] - values[k]) / h,
                (Some(p), None) => (values[k] - values[p]) / h,
                (None, None) => {
                    let (i, j) = self.offset_position(k, forward);
                    return Err(GridError::InactiveNeighborReference { index: k, i, j });
                }
            };
        }
        Ok(derivative)
    }
}

/// Region layout, one bracketed line per grid column `i`
impl fmt::Display for StructuredGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.nx {
            f.write_str(if i == 0 { "[[" } else { " [" })?;
            for j in 0..self.ny {
                write!(f, "{} ", self.region[[i, j]])?;
            }
            f.write_str(if i + 1 == self.nx { "]]" } else { "],\n" })?;
        }
        Ok(())
    }
}
