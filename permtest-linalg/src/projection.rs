#![allow(clippy::needless_range_loop)]
//! Projection ("hat") matrices and Gower centering.
//!
//! hatify(X) = Q Q' for the thin Q factor of X, the orthogonal
//! projector onto the column space of X.
//!
//! gower_center(A) = -1/2 * C A C with C = I - J/n, applied to a
//! matrix of squared distances. The result has zero row and column
//! sums and is the inner-product form used by MDMR.

use crate::decomposition::{LinalgError, ThinQr};
use crate::dense::DenseMatrix;

/// Orthogonal projection onto the column space of `x` (n x k, full column rank).
pub fn hatify(x: &DenseMatrix) -> Result<DenseMatrix, LinalgError> {
    let qr = ThinQr::new(x)?;
    Ok(qr.q.mat_mul(&qr.q.transpose()))
}

/// Side length `n` of a flattened n x n matrix with `len` entries.
pub fn square_side(len: usize) -> Result<usize, LinalgError> {
    let n = (len as f64).sqrt().round() as usize;
    if n * n != len || n == 0 {
        return Err(LinalgError::NotSquare { len });
    }
    Ok(n)
}

/// Gower double-centering of an n x n squared-distance matrix.
pub fn gower_center(sq_dist: &DenseMatrix) -> Result<DenseMatrix, LinalgError> {
    if !sq_dist.is_square() {
        return Err(LinalgError::DimensionMismatch {
            expected: sq_dist.nrows(),
            got: sq_dist.ncols(),
        });
    }
    let n = sq_dist.nrows();
    if n == 0 {
        return Err(LinalgError::EmptyMatrix);
    }
    let nf = n as f64;

    // C A C subtracts row and column means and adds back the grand mean.
    let row_means: Vec<f64> = sq_dist.row_sums().iter().map(|s| s / nf).collect();
    let col_means: Vec<f64> = sq_dist.col_sums().iter().map(|s| s / nf).collect();
    let grand_mean = row_means.iter().sum::<f64>() / nf;

    Ok(DenseMatrix::from_fn(n, n, |i, j| {
        -0.5 * (sq_dist.get(i, j) - row_means[i] - col_means[j] + grand_mean)
    }))
}

/// Gower-center every column of a stacked n^2 x k matrix.
///
/// Column `t` of the input is read as a row-major n x n matrix,
/// centered, and written back flattened into column `t` of the output.
pub fn gower_center_many(stacked: &DenseMatrix) -> Result<DenseMatrix, LinalgError> {
    let n = square_side(stacked.nrows())?;
    let mut centered = DenseMatrix::zeros(stacked.nrows(), stacked.ncols());
    for t in 0..stacked.ncols() {
        let square = DenseMatrix::from_row_major(n, n, &stacked.col(t));
        let g = gower_center(&square)?;
        centered.set_col(t, &g.to_row_major());
    }
    Ok(centered)
}
