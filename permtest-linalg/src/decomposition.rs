//! Matrix decompositions.
//!
//! Thin Householder QR (the basis of every projection matrix) and
//! numerical column rank, both delegated to faer.

use crate::dense::DenseMatrix;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Column of length {len} is not a flattened square matrix")]
    NotSquare { len: usize },

    #[error("Matrix has no columns")]
    EmptyMatrix,

    #[error("Unknown distance metric '{0}'")]
    UnknownMetric(String),

    #[error("Need at least {needed} rows for a thin QR of {cols} columns, got {rows}")]
    TooFewRows {
        needed: usize,
        rows: usize,
        cols: usize,
    },
}

/// Thin QR decomposition: A = Q * R with Q being m x k, R k x k.
pub struct ThinQr {
    pub q: DenseMatrix,
    pub r: DenseMatrix,
}

impl ThinQr {
    /// Factor an m x k matrix (m >= k) with Householder reflections.
    ///
    /// Linearly dependent columns are not detected here; Q stays
    /// orthonormal but no longer spans the column space of A.
    pub fn new(a: &DenseMatrix) -> Result<Self, LinalgError> {
        let (m, k) = (a.nrows(), a.ncols());
        if k == 0 {
            return Err(LinalgError::EmptyMatrix);
        }
        if m < k {
            return Err(LinalgError::TooFewRows {
                needed: k,
                rows: m,
                cols: k,
            });
        }
        let qr = a.as_faer().qr();
        Ok(ThinQr {
            q: DenseMatrix::from_faer(qr.compute_thin_q()),
            r: DenseMatrix::from_faer(qr.compute_thin_r()),
        })
    }
}

/// Numerical column rank.
///
/// Counts singular values above `s_max * max(m, n) * eps`, the
/// tolerance LAPACK-based rank checks use.
pub fn column_rank(a: &DenseMatrix) -> usize {
    let (m, n) = (a.nrows(), a.ncols());
    if m == 0 || n == 0 {
        return 0;
    }
    let s = a.as_faer().singular_values();
    let s_max = s.iter().cloned().fold(0.0f64, f64::max);
    let tol = s_max * m.max(n) as f64 * f64::EPSILON;
    s.iter().filter(|&&v| v > tol).count()
}
