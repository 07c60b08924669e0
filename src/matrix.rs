//! Dense weight matrix storage.
//!
//! Coefficient matrices are kept exactly as the source model lays them out:
//! row-major with shape `(in_dim, out_dim)`. ncnn wants the transpose, which
//! [`Matrix::transposed`] produces at write time.

use crate::{Error, Result};

/// A row-major `f32` matrix.
///
/// - `data.len() == rows * cols`
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl Matrix {
    /// Build a matrix from a flat row-major buffer with shape `(rows, cols)`.
    pub fn from_flat(data: Vec<f32>, rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(Error::InvalidShape(format!(
                "matrix dims must be > 0, got rows={rows} cols={cols}"
            )));
        }
        let expected = rows
            .checked_mul(cols)
            .ok_or_else(|| Error::InvalidShape("matrix shape overflow".to_owned()))?;
        if data.len() != expected {
            return Err(Error::InvalidShape(format!(
                "matrix data length {} does not match rows * cols ({rows} * {cols})",
                data.len()
            )));
        }

        Ok(Self { data, rows, cols })
    }

    /// Build a matrix from per-row vectors.
    ///
    /// This is a convenience constructor (it copies into contiguous storage).
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        if rows.is_empty() {
            return Err(Error::InvalidShape("matrix must have at least one row".to_owned()));
        }

        let cols = rows[0].len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(Error::InvalidShape(format!(
                    "matrix row {i} has len {}, expected {cols}",
                    row.len()
                )));
            }
        }

        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            data.extend_from_slice(row);
        }
        Self::from_flat(data, rows.len(), cols)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total element count (`rows * cols`).
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    #[inline]
    /// Returns element `(r, c)`.
    ///
    /// Panics if out of bounds.
    pub fn get(&self, r: usize, c: usize) -> f32 {
        assert!(r < self.rows && c < self.cols, "index ({r}, {c}) out of bounds");
        self.data[r * self.cols + c]
    }

    /// Iterate the elements in column-major order, i.e. row-major order of the
    /// transpose.
    pub fn iter_transposed(&self) -> impl Iterator<Item = f32> + '_ {
        (0..self.cols).flat_map(move |c| (0..self.rows).map(move |r| self.data[r * self.cols + c]))
    }

    /// Returns the `(cols, rows)` transpose.
    pub fn transposed(&self) -> Matrix {
        Matrix {
            data: self.iter_transposed().collect(),
            rows: self.cols,
            cols: self.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_is_row_major() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(m.get(1, 0), 4.0);
    }

    #[test]
    fn transpose_swaps_layout() {
        let m = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let t = m.transposed();
        assert_eq!(t.rows(), 3);
        assert_eq!(t.cols(), 2);
        assert_eq!(t.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(t.transposed(), m);
    }

    #[test]
    fn rejects_ragged_and_empty_input() {
        assert!(Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).is_err());
        assert!(Matrix::from_rows(&[]).is_err());
        assert!(Matrix::from_rows(&[vec![]]).is_err());
        assert!(Matrix::from_flat(vec![1.0; 5], 2, 3).is_err());
    }
}
