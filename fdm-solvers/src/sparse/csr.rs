//! Compressed Sparse Row (CSR) matrix format
//!
//! CSR format stores:
//! - `values`: Non-zero entries in row-major order
//! - `col_indices`: Column index for each value
//! - `row_ptrs`: Index into values/col_indices where each row starts
//!
//! Stencil assemblers emit rows through [`CsrBuilder`], either against a
//! declared capacity (an upper bound on nnz, e.g. 5 per row for a 5-point
//! stencil) or into growable buffers.

use crate::error::{Result, SolverError};
use crate::traits::{LinearOperator, Scalar};
use ndarray::{Array1, Array2};
use std::fmt;
use std::ops::Range;

/// Compressed Sparse Row (CSR) matrix format
///
/// Column order within a row is whatever the producer emitted; the stencil
/// assemblers emit the diagonal first. Only [`CsrMatrix::render_dense`]
/// requires sorted columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix<T: Scalar> {
    /// Number of rows
    pub num_rows: usize,
    /// Number of columns
    pub num_cols: usize,
    /// Stored values in row-major order
    pub values: Vec<T>,
    /// Column indices for each value
    pub col_indices: Vec<usize>,
    /// Row pointers: row_ptrs[i] is the start index in values/col_indices for row i
    /// row_ptrs[num_rows] = nnz (total number of stored entries)
    pub row_ptrs: Vec<usize>,
}

impl<T: Scalar> CsrMatrix<T> {
    /// Create a new empty CSR matrix (every row empty)
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        Self {
            num_rows,
            num_cols,
            values: Vec::new(),
            col_indices: Vec::new(),
            row_ptrs: vec![0; num_rows + 1],
        }
    }

    /// Create a CSR matrix from raw components
    ///
    /// The parts are validated: `row_ptrs` must have `num_rows + 1` entries,
    /// start at 0, be non-decreasing and end at `values.len()`; every column
    /// index must be below `num_cols`.
    pub fn from_raw_parts(
        num_rows: usize,
        num_cols: usize,
        row_ptrs: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        if row_ptrs.len() != num_rows + 1 {
            return Err(SolverError::InvalidStructure(format!(
                "row_ptrs has {} entries, expected {}",
                row_ptrs.len(),
                num_rows + 1
            )));
        }
        if col_indices.len() != values.len() {
            return Err(SolverError::InvalidStructure(format!(
                "{} column indices for {} values",
                col_indices.len(),
                values.len()
            )));
        }
        if row_ptrs[0] != 0 {
            return Err(SolverError::InvalidStructure(
                "row_ptrs must start at 0".to_string(),
            ));
        }
        if row_ptrs.windows(2).any(|w| w[0] > w[1]) {
            return Err(SolverError::InvalidStructure(
                "row_ptrs must be non-decreasing".to_string(),
            ));
        }
        if row_ptrs[num_rows] != values.len() {
            return Err(SolverError::InvalidStructure(format!(
                "row_ptrs ends at {}, but nnz is {}",
                row_ptrs[num_rows],
                values.len()
            )));
        }
        if let Some(&col) = col_indices.iter().find(|&&c| c >= num_cols) {
            return Err(SolverError::InvalidStructure(format!(
                "column index {} out of bounds for {} columns",
                col, num_cols
            )));
        }

        Ok(Self {
            num_rows,
            num_cols,
            row_ptrs,
            col_indices,
            values,
        })
    }

    /// Create a CSR matrix from a dense matrix
    ///
    /// Only stores entries with magnitude > threshold
    pub fn from_dense(dense: &Array2<T>, threshold: T) -> Self {
        let num_rows = dense.nrows();
        let num_cols = dense.ncols();

        let mut values = Vec::new();
        let mut col_indices = Vec::new();
        let mut row_ptrs = vec![0usize; num_rows + 1];

        for i in 0..num_rows {
            for j in 0..num_cols {
                let val = dense[[i, j]];
                if val.abs() > threshold {
                    values.push(val);
                    col_indices.push(j);
                }
            }
            row_ptrs[i + 1] = values.len();
        }

        Self {
            num_rows,
            num_cols,
            values,
            col_indices,
            row_ptrs,
        }
    }

    /// Create a CSR matrix from COO (Coordinate) format triplets
    ///
    /// Triplets are (row, col, value). Duplicate entries are summed and the
    /// resulting rows have sorted columns.
    pub fn from_triplets(
        num_rows: usize,
        num_cols: usize,
        mut triplets: Vec<(usize, usize, T)>,
    ) -> Result<Self> {
        if let Some(&(row, col, _)) = triplets
            .iter()
            .find(|&&(r, c, _)| r >= num_rows || c >= num_cols)
        {
            return Err(SolverError::InvalidStructure(format!(
                "triplet ({}, {}) out of bounds for {} x {}",
                row, col, num_rows, num_cols
            )));
        }

        triplets.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut values: Vec<T> = Vec::with_capacity(triplets.len());
        let mut col_indices = Vec::with_capacity(triplets.len());
        let mut counts = vec![0usize; num_rows];
        let mut last: Option<(usize, usize)> = None;

        for (row, col, val) in triplets {
            if last == Some((row, col)) {
                if let Some(v) = values.last_mut() {
                    *v += val;
                }
                continue;
            }
            values.push(val);
            col_indices.push(col);
            counts[row] += 1;
            last = Some((row, col));
        }

        let mut row_ptrs = Vec::with_capacity(num_rows + 1);
        row_ptrs.push(0);
        for count in counts {
            let next = row_ptrs[row_ptrs.len() - 1] + count;
            row_ptrs.push(next);
        }

        Ok(Self {
            num_rows,
            num_cols,
            values,
            col_indices,
            row_ptrs,
        })
    }

    /// Create identity matrix in CSR format
    pub fn identity(n: usize) -> Self {
        Self {
            num_rows: n,
            num_cols: n,
            values: vec![T::one(); n],
            col_indices: (0..n).collect(),
            row_ptrs: (0..=n).collect(),
        }
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Get the range of indices in values/col_indices for a given row
    pub fn row_range(&self, row: usize) -> Range<usize> {
        self.row_ptrs[row]..self.row_ptrs[row + 1]
    }

    /// Get the (col, value) pairs for a row, in storage order
    pub fn row_entries(&self, row: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let range = self.row_range(row);
        self.col_indices[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Matrix-vector product: y = A * x
    pub fn matvec(&self, x: &Array1<T>) -> Array1<T> {
        let mut y = Array1::from_elem(self.num_rows, T::zero());
        self.matvec_into(x, &mut y);
        y
    }

    /// Matrix-vector product into an existing buffer: y = A * x
    pub fn matvec_into(&self, x: &Array1<T>, y: &mut Array1<T>) {
        assert_eq!(x.len(), self.num_cols, "Input vector size mismatch");
        assert_eq!(y.len(), self.num_rows, "Output vector size mismatch");

        for i in 0..self.num_rows {
            let mut sum = T::zero();
            for idx in self.row_range(i) {
                sum += self.values[idx] * x[self.col_indices[idx]];
            }
            y[i] = sum;
        }
    }

    /// Get element at (i, j), returns 0 if not stored
    ///
    /// Duplicate entries for the same position are summed.
    pub fn get(&self, i: usize, j: usize) -> T {
        self.row_entries(i)
            .filter(|&(col, _)| col == j)
            .fold(T::zero(), |acc, (_, v)| acc + v)
    }

    /// Position of the diagonal entry of `row` in values/col_indices
    pub fn diagonal_position(&self, row: usize) -> Option<usize> {
        self.row_range(row).find(|&idx| self.col_indices[idx] == row)
    }

    /// Extract diagonal elements (0 where no diagonal entry is stored)
    pub fn diagonal(&self) -> Array1<T> {
        let n = self.num_rows.min(self.num_cols);
        Array1::from_iter((0..n).map(|i| self.get(i, i)))
    }

    /// Extract the diagonal, failing on the first row without a usable one
    ///
    /// Jacobi and Gauss-Seidel divide by these values.
    pub fn checked_diagonal(&self) -> Result<Array1<T>> {
        let mut diag = Array1::from_elem(self.num_rows, T::zero());
        for i in 0..self.num_rows {
            if self.diagonal_position(i).is_none() {
                return Err(SolverError::MissingDiagonalEntry { row: i });
            }
            let value = self.get(i, i);
            if value == T::zero() {
                return Err(SolverError::ZeroDiagonal { row: i });
            }
            diag[i] = value;
        }
        Ok(diag)
    }

    /// Returns `true` if every row has strictly increasing column indices
    pub fn has_sorted_columns(&self) -> bool {
        self.first_unsorted_row().is_none()
    }

    fn first_unsorted_row(&self) -> Option<usize> {
        (0..self.num_rows).find(|&i| {
            self.col_indices[self.row_range(i)]
                .windows(2)
                .any(|w| w[0] >= w[1])
        })
    }

    /// Convert to dense matrix (for debugging/small matrices)
    pub fn to_dense(&self) -> Array2<T> {
        let mut dense = Array2::from_elem((self.num_rows, self.num_cols), T::zero());

        for i in 0..self.num_rows {
            for (j, v) in self.row_entries(i) {
                dense[[i, j]] += v;
            }
        }

        dense
    }

    /// Render the matrix densely, one bracketed row per line
    ///
    /// Walks each row with a single cursor, so it requires sorted column
    /// indices and returns [`SolverError::UnsortedRow`] otherwise.
    pub fn render_dense(&self, decimals: usize) -> Result<String> {
        if let Some(row) = self.first_unsorted_row() {
            return Err(SolverError::UnsortedRow { row });
        }

        let mut out = String::new();
        for i in 0..self.num_rows {
            out.push(if i == 0 { '[' } else { ' ' });
            out.push('[');
            let mut k = self.row_ptrs[i];
            for j in 0..self.num_cols {
                let value = if k < self.row_ptrs[i + 1] && self.col_indices[k] == j {
                    k += 1;
                    self.values[k - 1]
                } else {
                    T::zero()
                };
                out.push_str(&format!("{:.*} ", decimals, value));
            }
            out.push(']');
            out.push_str(if i + 1 == self.num_rows { "]\n" } else { ",\n" });
        }
        Ok(out)
    }
}

/// Raw CSR listing: `row_ptr`, `col_ind` and `values` on separate lines.
///
/// The formatter precision (`{:.3}`) controls the printed decimals of the values.
impl<T: Scalar> fmt::Display for CsrMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let decimals = f.precision().unwrap_or(6);

        writeln!(f, "row_ptr:")?;
        for p in &self.row_ptrs {
            write!(f, "{} ", p)?;
        }
        writeln!(f)?;

        writeln!(f, "col_ind:")?;
        for c in &self.col_indices {
            write!(f, "{} ", c)?;
        }
        writeln!(f)?;

        writeln!(f, "values:")?;
        for v in &self.values {
            write!(f, "{:.*} ", decimals, v)?;
        }
        writeln!(f)
    }
}

impl<T: Scalar> LinearOperator<T> for CsrMatrix<T> {
    fn num_rows(&self) -> usize {
        self.num_rows
    }

    fn num_cols(&self) -> usize {
        self.num_cols
    }

    fn apply(&self, x: &Array1<T>) -> Array1<T> {
        self.matvec(x)
    }
}

/// Builder for constructing CSR matrices row by row
///
/// Entries are stored as given, explicit zeros included: a zeroed boundary
/// row keeps its diagonal slot so the structure stays fixed across time steps.
#[derive(Debug, Clone)]
pub struct CsrBuilder<T: Scalar> {
    num_rows: usize,
    num_cols: usize,
    capacity: Option<usize>,
    values: Vec<T>,
    col_indices: Vec<usize>,
    row_ptrs: Vec<usize>,
}

impl<T: Scalar> CsrBuilder<T> {
    /// Create a new CSR builder with growable storage
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        let mut row_ptrs = Vec::with_capacity(num_rows + 1);
        row_ptrs.push(0);
        Self {
            num_rows,
            num_cols,
            capacity: None,
            values: Vec::new(),
            col_indices: Vec::new(),
            row_ptrs,
        }
    }

    /// Create a CSR builder that refuses to store more than `capacity` entries
    pub fn with_capacity(num_rows: usize, num_cols: usize, capacity: usize) -> Self {
        let mut row_ptrs = Vec::with_capacity(num_rows + 1);
        row_ptrs.push(0);
        Self {
            num_rows,
            num_cols,
            capacity: Some(capacity),
            values: Vec::with_capacity(capacity),
            col_indices: Vec::with_capacity(capacity),
            row_ptrs,
        }
    }

    /// Number of rows added so far
    pub fn rows_added(&self) -> usize {
        self.row_ptrs.len() - 1
    }

    /// Number of entries stored so far
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Append the next row
    ///
    /// On error the builder is left as it was before the call.
    pub fn add_row_entries(&mut self, entries: impl IntoIterator<Item = (usize, T)>) -> Result<()> {
        let row = self.rows_added();
        if row >= self.num_rows {
            return Err(SolverError::RowCountMismatch {
                expected: self.num_rows,
                got: row + 1,
            });
        }

        let start = self.values.len();
        for (col, val) in entries {
            let error = if col >= self.num_cols {
                Some(SolverError::InvalidStructure(format!(
                    "column index {} out of bounds for {} columns in row {}",
                    col, self.num_cols, row
                )))
            } else if self.capacity.is_some_and(|cap| self.values.len() >= cap) {
                Some(SolverError::CapacityExceeded {
                    capacity: self.capacity.unwrap_or_default(),
                })
            } else {
                None
            };

            if let Some(err) = error {
                self.values.truncate(start);
                self.col_indices.truncate(start);
                return Err(err);
            }

            self.values.push(val);
            self.col_indices.push(col);
        }
        self.row_ptrs.push(self.values.len());
        Ok(())
    }

    /// Finish building and return the CSR matrix
    ///
    /// Every declared row must have been added.
    pub fn finish(self) -> Result<CsrMatrix<T>> {
        if self.rows_added() != self.num_rows {
            return Err(SolverError::RowCountMismatch {
                expected: self.num_rows,
                got: self.rows_added(),
            });
        }

        Ok(CsrMatrix {
            num_rows: self.num_rows,
            num_cols: self.num_cols,
            values: self.values,
            col_indices: self.col_indices,
            row_ptrs: self.row_ptrs,
        })
    }
}
