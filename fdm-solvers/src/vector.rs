//! Dense vector kernels
//!
//! Elementary operations on `Array1` used by every solver: copy, in-place
//! add/subtract/scale, axpy, dot product and Euclidean norm.
//!
//! All kernels require equal lengths and panic otherwise; the solvers check
//! dimensions once up front and report [`crate::SolverError::DimensionMismatch`].

use crate::traits::Scalar;
use ndarray::Array1;

/// Copy `src` into `dest`
#[inline]
pub fn copy_into<T: Scalar>(dest: &mut Array1<T>, src: &Array1<T>) {
    assert_eq!(dest.len(), src.len(), "Vector lengths must match for copy");
    dest.assign(src);
}

/// Compute a = a + b
#[inline]
pub fn add_assign<T: Scalar>(a: &mut Array1<T>, b: &Array1<T>) {
    assert_eq!(a.len(), b.len(), "Vector lengths must match for add");
    for (ai, &bi) in a.iter_mut().zip(b.iter()) {
        *ai += bi;
    }
}

/// Compute a = a - b
#[inline]
pub fn sub_assign<T: Scalar>(a: &mut Array1<T>, b: &Array1<T>) {
    assert_eq!(a.len(), b.len(), "Vector lengths must match for sub");
    for (ai, &bi) in a.iter_mut().zip(b.iter()) {
        *ai -= bi;
    }
}

/// Compute vector scale in-place: x = α * x
#[inline]
pub fn scale_inplace<T: Scalar>(x: &mut Array1<T>, alpha: T) {
    for xi in x.iter_mut() {
        *xi *= alpha;
    }
}

/// Compute axpy: y = α * x + y
#[inline]
pub fn axpy<T: Scalar>(alpha: T, x: &Array1<T>, y: &mut Array1<T>) {
    assert_eq!(x.len(), y.len(), "Vector lengths must match for axpy");
    for (&xi, yi) in x.iter().zip(y.iter_mut()) {
        *yi += alpha * xi;
    }
}

/// Compute the dot product (x, y) = Σ x_i * y_i
#[inline]
pub fn dot<T: Scalar>(x: &Array1<T>, y: &Array1<T>) -> T {
    assert_eq!(x.len(), y.len(), "Vector lengths must match for dot product");
    x.iter()
        .zip(y.iter())
        .fold(T::zero(), |acc, (&xi, &yi)| acc + xi * yi)
}

/// Compute vector norm squared: ||x||_2^2 = Σ x_i^2
#[inline]
pub fn norm_sqr<T: Scalar>(x: &Array1<T>) -> T {
    x.iter().fold(T::zero(), |acc, &xi| acc + xi * xi)
}

/// Compute vector 2-norm: ||x||_2 = sqrt(Σ x_i^2)
#[inline]
pub fn norm<T: Scalar>(x: &Array1<T>) -> T {
    norm_sqr(x).sqrt()
}

/// Maximum absolute component, 0 for an empty vector
#[inline]
pub fn max_abs<T: Scalar>(x: &Array1<T>) -> T {
    x.iter().fold(T::zero(), |acc, &xi| acc.max(xi.abs()))
}
