//! Diagonal / strictly-lower / strictly-upper decomposition of a CSR matrix
//!
//! `A = D + L + U` where `D` holds exactly one entry per row. The split is a
//! two-pass count-then-fill, so every part is allocated at its exact size.

use super::csr::CsrMatrix;
use crate::error::{Result, SolverError};
use crate::traits::Scalar;

/// The three parts of `A = D + L + U`
#[derive(Debug, Clone, PartialEq)]
pub struct DiagonalSplit<T: Scalar> {
    /// Diagonal part, one entry per row
    pub diagonal: CsrMatrix<T>,
    /// Entries with `col < row`
    pub lower: CsrMatrix<T>,
    /// Entries with `col > row`
    pub upper: CsrMatrix<T>,
}

impl<T: Scalar> DiagonalSplit<T> {
    /// Sum the three parts back into a single matrix with sorted columns
    pub fn reconstruct(&self) -> Result<CsrMatrix<T>> {
        let (rows, cols) = (self.diagonal.num_rows, self.diagonal.num_cols);
        let mut triplets = Vec::with_capacity(
            self.diagonal.nnz() + self.lower.nnz() + self.upper.nnz(),
        );
        for part in [&self.lower, &self.diagonal, &self.upper] {
            for i in 0..part.num_rows {
                triplets.extend(part.row_entries(i).map(|(j, v)| (i, j, v)));
            }
        }
        CsrMatrix::from_triplets(rows, cols, triplets)
    }
}

/// Split a square matrix into its diagonal, lower and upper parts
///
/// Fails with [`SolverError::MissingDiagonalEntry`] for the first row that
/// stores no diagonal entry. If a row stores several entries on the
/// diagonal, they are summed into its single `D` slot.
pub fn split_diagonal_lower_upper<T: Scalar>(a: &CsrMatrix<T>) -> Result<DiagonalSplit<T>> {
    if a.num_rows != a.num_cols {
        return Err(SolverError::NotSquare {
            rows: a.num_rows,
            cols: a.num_cols,
        });
    }
    let n = a.num_rows;

    // Pass 1: count
    let mut lower_count = 0;
    let mut upper_count = 0;
    for i in 0..n {
        let mut has_diagonal = false;
        for (j, _) in a.row_entries(i) {
            match j.cmp(&i) {
                std::cmp::Ordering::Less => lower_count += 1,
                std::cmp::Ordering::Greater => upper_count += 1,
                std::cmp::Ordering::Equal => has_diagonal = true,
            }
        }
        if !has_diagonal {
            return Err(SolverError::MissingDiagonalEntry { row: i });
        }
    }

    // Pass 2: fill
    let mut diag_values = vec![T::zero(); n];
    let mut lower = PartBuffers::with_capacity(n, lower_count);
    let mut upper = PartBuffers::with_capacity(n, upper_count);

    for i in 0..n {
        for (j, v) in a.row_entries(i) {
            match j.cmp(&i) {
                std::cmp::Ordering::Less => lower.push(j, v),
                std::cmp::Ordering::Greater => upper.push(j, v),
                std::cmp::Ordering::Equal => diag_values[i] += v,
            }
        }
        lower.end_row();
        upper.end_row();
    }

    Ok(DiagonalSplit {
        diagonal: CsrMatrix {
            num_rows: n,
            num_cols: n,
            values: diag_values,
            col_indices: (0..n).collect(),
            row_ptrs: (0..=n).collect(),
        },
        lower: lower.into_matrix(n),
        upper: upper.into_matrix(n),
    })
}

struct PartBuffers<T> {
    values: Vec<T>,
    col_indices: Vec<usize>,
    row_ptrs: Vec<usize>,
}

impl<T: Scalar> PartBuffers<T> {
    fn with_capacity(rows: usize, nnz: usize) -> Self {
        let mut row_ptrs = Vec::with_capacity(rows + 1);
        row_ptrs.push(0);
        Self {
            values: Vec::with_capacity(nnz),
            col_indices: Vec::with_capacity(nnz),
            row_ptrs,
        }
    }

    fn push(&mut self, col: usize, value: T) {
        self.col_indices.push(col);
        self.values.push(value);
    }

    fn end_row(&mut self) {
        self.row_ptrs.push(self.values.len());
    }

    fn into_matrix(self, n: usize) -> CsrMatrix<T> {
        CsrMatrix {
            num_rows: n,
            num_cols: n,
            values: self.values,
            col_indices: self.col_indices,
            row_ptrs: self.row_ptrs,
        }
    }
}
