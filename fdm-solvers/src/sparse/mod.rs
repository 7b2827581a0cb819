//! Sparse matrix structures (CSR format)
//!
//! This module provides the Compressed Sparse Row (CSR) format, a row-by-row
//! builder and the diagonal/lower/upper split used by the stationary solvers.

mod csr;
mod split;

pub use csr::{CsrBuilder, CsrMatrix};
pub use split::{split_diagonal_lower_upper, DiagonalSplit};
