// ─────────────────────────────────────────────────────────────────────
// MtxGen — Dense Matrix Container
// ─────────────────────────────────────────────────────────────────────
//! Row-major dense `f64` matrix.
//!
//! Analysis treats every matrix as dense for convenience; the sparse
//! view is recovered through [`Matrix::nonzeros`]. All engines take a
//! `&Matrix` and return a new value, so the input is never mutated.

use serde::{Deserialize, Serialize};

use crate::error::{MtxGenError, MtxGenResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// All-zero matrix of the given shape.
    ///
    /// Panics if `rows * cols` overflows `usize`; see [`Matrix::try_zeros`].
    pub fn zeros(rows: usize, cols: usize) -> Self {
        match Self::try_zeros(rows, cols) {
            Ok(m) => m,
            Err(e) => panic!("{e}"),
        }
    }

    /// All-zero matrix, failing with a shape error when `rows * cols`
    /// overflows `usize`.
    pub fn try_zeros(rows: usize, cols: usize) -> MtxGenResult<Self> {
        let len = rows.checked_mul(cols).ok_or_else(|| {
            MtxGenError::Shape(format!("{rows}x{cols} element count overflows"))
        })?;
        Ok(Self {
            rows,
            cols,
            data: vec![0.0; len],
        })
    }

    /// Square matrix with ones on the diagonal.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Wrap a row-major buffer. Fails if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> MtxGenResult<Self> {
        if data.len() != rows * cols {
            return Err(MtxGenError::Shape(format!(
                "buffer of length {} cannot hold a {rows}x{cols} matrix",
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build from nested rows. Ragged input is rejected.
    pub fn from_rows(rows: &[Vec<f64>]) -> MtxGenResult<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(MtxGenError::Shape(format!(
                    "row {i} has {} entries, expected {cols}",
                    row.len()
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Build from 0-indexed `(row, col, value)` triplets. Duplicates are summed.
    pub fn from_triplets(
        rows: usize,
        cols: usize,
        triplets: &[(usize, usize, f64)],
    ) -> MtxGenResult<Self> {
        let mut m = Self::zeros(rows, cols);
        for &(r, c, v) in triplets {
            if r >= rows || c >= cols {
                return Err(MtxGenError::Shape(format!(
                    "triplet ({r}, {c}) outside {rows}x{cols}"
                )));
            }
            m.data[r * cols + c] += v;
        }
        Ok(m)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// True when the matrix has no entries at all (a zero dimension).
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Panics if the position is out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols, "index ({row}, {col}) out of bounds");
        self.data[row * self.cols + col]
    }

    /// Panics if the position is out of bounds.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(row < self.rows && col < self.cols, "index ({row}, {col}) out of bounds");
        self.data[row * self.cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn column(&self, col: usize) -> Vec<f64> {
        (0..self.rows).map(|r| self.data[r * self.cols + col]).collect()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn transpose(&self) -> Self {
        let mut t = Self::zeros(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                t.data[c * self.rows + r] = self.data[r * self.cols + c];
            }
        }
        t
    }

    /// Nonzero entries in row-major order.
    pub fn nonzeros(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .filter(|(_, &v)| v != 0.0)
            .map(move |(idx, &v)| (idx / cols, idx % cols, v))
    }

    pub fn nnz(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0.0).count()
    }

    /// `(min, max)` over the nonzero entries, `None` for an all-zero matrix.
    pub fn nonzero_range(&self) -> Option<(f64, f64)> {
        self.data
            .iter()
            .copied()
            .filter(|&v| v != 0.0)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}
