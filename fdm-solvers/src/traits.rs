//! Core traits for linear algebra operations
//!
//! This module defines the fundamental abstractions used throughout the solver library:
//! - [`Scalar`]: Trait for the real floating-point types the solvers operate on
//! - [`LinearOperator`]: Trait for matrix-like objects that can perform matrix-vector products

use ndarray::Array1;
use num_traits::{Float, FromPrimitive, NumAssign, ToPrimitive};
use std::fmt::{Debug, Display};

/// Trait for scalar types that can be used in the sparse kernels and iterative solvers.
///
/// Finite-difference systems are real-valued, so this is a thin bundle of
/// `num_traits` bounds plus a constant conversion used for tolerances and thresholds.
///
/// # Implementations
///
/// Provided for:
/// - `f64` (default for all assemblers)
/// - `f32` (for memory-constrained applications)
pub trait Scalar:
    Float + NumAssign + FromPrimitive + ToPrimitive + Debug + Display + Send + Sync + 'static
{
    /// Convert an `f64` constant (tolerances, thresholds) into this type
    #[inline]
    fn from_f64_lossy(value: f64) -> Self {
        Self::from_f64(value).unwrap_or_else(Self::zero)
    }
}

impl Scalar for f64 {}

impl Scalar for f32 {}

/// Trait for linear operators (matrices) that can perform matrix-vector products.
///
/// The time-stepping drivers apply their explicit operators through `apply`.
pub trait LinearOperator<T: Scalar> {
    /// Number of rows in the operator
    fn num_rows(&self) -> usize;

    /// Number of columns in the operator
    fn num_cols(&self) -> usize;

    /// Apply the operator: y = A * x
    fn apply(&self, x: &Array1<T>) -> Array1<T>;

    /// Check if the operator is square
    fn is_square(&self) -> bool {
        self.num_rows() == self.num_cols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_f64_scalar() {
        let x: f64 = -3.0;
        assert_relative_eq!(x.abs(), 3.0);
        assert_relative_eq!(f64::from_f64_lossy(1e-6), 1e-6);
    }

    #[test]
    fn test_f32_scalar() {
        let tol = f32::from_f64_lossy(1e-6);
        assert_relative_eq!(tol, 1e-6_f32);
    }
}
