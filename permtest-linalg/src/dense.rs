#![allow(clippy::needless_range_loop)]
//! Dense matrix operations backed by faer.
//!
//! Wraps faer's column-major `Mat<f64>` with the operations the
//! permutation engines need: row permutation, column subsetting,
//! intercept augmentation and row-major flattening of square
//! matrices into the columns of a batch matrix.

use faer::Mat;

/// A dense matrix wrapper around faer's `Mat<f64>`.
#[derive(Debug, Clone)]
pub struct DenseMatrix {
    inner: Mat<f64>,
}

impl DenseMatrix {
    /// Create a new dense matrix filled with zeros.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            inner: Mat::zeros(nrows, ncols),
        }
    }

    /// Create a dense matrix from an element function.
    pub fn from_fn<F>(nrows: usize, ncols: usize, f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        Self {
            inner: Mat::from_fn(nrows, ncols, f),
        }
    }

    /// Create a dense matrix from a flat vec (column-major order).
    pub fn from_col_major(nrows: usize, ncols: usize, data: &[f64]) -> Self {
        assert_eq!(data.len(), nrows * ncols);
        Self::from_fn(nrows, ncols, |i, j| data[j * nrows + i])
    }

    /// Create a dense matrix from a flat slice in row-major order.
    pub fn from_row_major(nrows: usize, ncols: usize, data: &[f64]) -> Self {
        assert_eq!(data.len(), nrows * ncols);
        Self::from_fn(nrows, ncols, |i, j| data[i * ncols + j])
    }

    /// Create a dense matrix from a list of equally sized rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        for row in rows {
            assert_eq!(row.len(), ncols, "ragged rows");
        }
        Self::from_fn(nrows, ncols, |i, j| rows[i][j])
    }

    /// Create an n x 1 column vector.
    pub fn column_vector(data: &[f64]) -> Self {
        Self::from_fn(data.len(), 1, |i, _| data[i])
    }

    /// Create an identity matrix of size n x n.
    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 })
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.inner.nrows()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.inner.ncols()
    }

    pub fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }

    /// Get element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.inner.read(row, col)
    }

    /// Set element at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.inner.write(row, col, value);
    }

    /// Get a reference to the underlying faer matrix.
    pub fn as_faer(&self) -> &Mat<f64> {
        &self.inner
    }

    /// Create from a faer matrix.
    pub fn from_faer(mat: Mat<f64>) -> Self {
        Self { inner: mat }
    }

    /// Matrix-matrix product: self * other.
    pub fn mat_mul(&self, other: &DenseMatrix) -> DenseMatrix {
        assert_eq!(self.ncols(), other.nrows());
        DenseMatrix {
            inner: &self.inner * &other.inner,
        }
    }

    /// Transposed product: self' * other, without materializing self'.
    pub fn t_mat_mul(&self, other: &DenseMatrix) -> DenseMatrix {
        assert_eq!(self.nrows(), other.nrows());
        DenseMatrix {
            inner: self.inner.transpose() * other.inner.as_ref(),
        }
    }

    /// Transpose.
    pub fn transpose(&self) -> DenseMatrix {
        DenseMatrix {
            inner: self.inner.transpose().to_owned(),
        }
    }

    /// Element-wise subtraction: self - other.
    pub fn sub(&self, other: &DenseMatrix) -> DenseMatrix {
        assert_eq!(self.nrows(), other.nrows());
        assert_eq!(self.ncols(), other.ncols());
        Self::from_fn(self.nrows(), self.ncols(), |i, j| {
            self.inner.read(i, j) - other.inner.read(i, j)
        })
    }

    /// Scalar multiplication.
    pub fn scale(&self, s: f64) -> DenseMatrix {
        Self::from_fn(self.nrows(), self.ncols(), |i, j| self.inner.read(i, j) * s)
    }

    /// Element-wise map.
    pub fn map<F>(&self, f: F) -> DenseMatrix
    where
        F: Fn(f64) -> f64,
    {
        Self::from_fn(self.nrows(), self.ncols(), |i, j| f(self.inner.read(i, j)))
    }

    /// Extract column as a Vec<f64>.
    pub fn col(&self, j: usize) -> Vec<f64> {
        (0..self.nrows()).map(|i| self.inner.read(i, j)).collect()
    }

    /// Extract row as a Vec<f64>.
    pub fn row(&self, i: usize) -> Vec<f64> {
        (0..self.ncols()).map(|j| self.inner.read(i, j)).collect()
    }

    /// Set an entire column from a slice.
    pub fn set_col(&mut self, j: usize, data: &[f64]) {
        assert_eq!(data.len(), self.nrows());
        for i in 0..self.nrows() {
            self.inner.write(i, j, data[i]);
        }
    }

    /// Reorder rows: row `i` of the result is row `order[i]` of self.
    pub fn select_rows(&self, order: &[usize]) -> DenseMatrix {
        Self::from_fn(order.len(), self.ncols(), |i, j| self.inner.read(order[i], j))
    }

    /// Keep only the listed columns, in the listed order.
    pub fn select_columns(&self, columns: &[usize]) -> DenseMatrix {
        Self::from_fn(self.nrows(), columns.len(), |i, j| {
            self.inner.read(i, columns[j])
        })
    }

    /// Prepend a column of ones.
    pub fn with_intercept(&self) -> DenseMatrix {
        Self::from_fn(self.nrows(), self.ncols() + 1, |i, j| {
            if j == 0 {
                1.0
            } else {
                self.inner.read(i, j - 1)
            }
        })
    }

    /// Flatten in row-major order (row 0 first).
    pub fn to_row_major(&self) -> Vec<f64> {
        let mut data = Vec::with_capacity(self.nrows() * self.ncols());
        for i in 0..self.nrows() {
            for j in 0..self.ncols() {
                data.push(self.inner.read(i, j));
            }
        }
        data
    }

    /// Sums of each row.
    pub fn row_sums(&self) -> Vec<f64> {
        (0..self.nrows())
            .map(|i| (0..self.ncols()).map(|j| self.inner.read(i, j)).sum())
            .collect()
    }

    /// Sums of each column.
    pub fn col_sums(&self) -> Vec<f64> {
        (0..self.ncols())
            .map(|j| (0..self.nrows()).map(|i| self.inner.read(i, j)).sum())
            .collect()
    }

    /// Largest absolute element-wise difference to another matrix.
    pub fn max_abs_diff(&self, other: &DenseMatrix) -> f64 {
        assert_eq!(self.nrows(), other.nrows());
        assert_eq!(self.ncols(), other.ncols());
        let mut worst = 0.0f64;
        for j in 0..self.ncols() {
            for i in 0..self.nrows() {
                worst = worst.max((self.inner.read(i, j) - other.inner.read(i, j)).abs());
            }
        }
        worst
    }
}

impl std::fmt::Display for DenseMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.nrows() {
            for j in 0..self.ncols() {
                if j > 0 {
                    write!(f, "\t")?;
                }
                write!(f, "{:.6}", self.inner.read(i, j))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let m = DenseMatrix::zeros(3, 4);
        assert_eq!(m.nrows(), 3);
        assert_eq!(m.ncols(), 4);
        assert_eq!(m.get(0, 0), 0.0);
    }

    #[test]
    fn test_row_and_col_major_agree() {
        let a = DenseMatrix::from_row_major(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = DenseMatrix::from_col_major(2, 3, &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
        assert_eq!(a.to_row_major(), b.to_row_major());
        assert_eq!(a.to_row_major(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_mat_mul() {
        let a = DenseMatrix::from_row_major(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = DenseMatrix::from_row_major(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let c = a.mat_mul(&b);
        assert_eq!(c.nrows(), 2);
        assert_eq!(c.ncols(), 2);
        assert!((c.get(0, 0) - 58.0).abs() < 1e-10);
        assert!((c.get(0, 1) - 64.0).abs() < 1e-10);
        assert!((c.get(1, 0) - 139.0).abs() < 1e-10);
        assert!((c.get(1, 1) - 154.0).abs() < 1e-10);
    }

    #[test]
    fn test_t_mat_mul_matches_explicit_transpose() {
        let a = DenseMatrix::from_row_major(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = DenseMatrix::from_row_major(3, 1, &[1.0, -1.0, 2.0]);
        let fast = a.t_mat_mul(&b);
        let slow = a.transpose().mat_mul(&b);
        assert!(fast.max_abs_diff(&slow) < 1e-12);
    }

    #[test]
    fn test_select_rows_permutes() {
        let a = DenseMatrix::from_row_major(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let p = a.select_rows(&[2, 0, 1]);
        assert_eq!(p.row(0), vec![5.0, 6.0]);
        assert_eq!(p.row(1), vec![1.0, 2.0]);
        assert_eq!(p.row(2), vec![3.0, 4.0]);
    }

    #[test]
    fn test_select_columns() {
        let a = DenseMatrix::from_row_major(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let s = a.select_columns(&[2, 0]);
        assert_eq!(s.row(0), vec![3.0, 1.0]);
        assert_eq!(s.row(1), vec![6.0, 4.0]);
    }

    #[test]
    fn test_with_intercept() {
        let a = DenseMatrix::column_vector(&[3.0, 4.0]);
        let x = a.with_intercept();
        assert_eq!(x.ncols(), 2);
        assert_eq!(x.col(0), vec![1.0, 1.0]);
        assert_eq!(x.col(1), vec![3.0, 4.0]);
    }

    #[test]
    fn test_sums() {
        let a = DenseMatrix::from_row_major(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(a.row_sums(), vec![3.0, 7.0]);
        assert_eq!(a.col_sums(), vec![4.0, 6.0]);
    }
}
