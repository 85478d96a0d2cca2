//! Distance-matrix outcomes for MDMR.
//!
//! Outcomes are held as an n^2 x k matrix: column t is the row-major
//! flattened n x n matrix of *squared* distances for outcome t.

use permtest_linalg::distance::{pairwise_distances, squareform};
use permtest_linalg::projection::square_side;
use permtest_linalg::{DenseMatrix, DistanceMetric, LinalgError};

/// Stacked squared-distance matrices, one column per outcome.
#[derive(Debug, Clone)]
pub struct DistanceColumns {
    stacked: DenseMatrix,
    n_subjects: usize,
}

impl DistanceColumns {
    /// Wrap an n^2 x k matrix whose columns already hold squared distances.
    pub fn from_stacked(stacked: DenseMatrix) -> Result<Self, LinalgError> {
        if stacked.ncols() == 0 {
            return Err(LinalgError::EmptyMatrix);
        }
        let n_subjects = square_side(stacked.nrows())?;
        Ok(Self {
            stacked,
            n_subjects,
        })
    }

    /// One outcome from a condensed vector of (unsquared) pairwise distances.
    pub fn from_condensed(condensed: &[f64]) -> Result<Self, LinalgError> {
        let square = squareform(condensed)?;
        Self::from_distance_matrices(&[square])
    }

    /// Outcomes from square (unsquared) distance matrices.
    pub fn from_distance_matrices(matrices: &[DenseMatrix]) -> Result<Self, LinalgError> {
        let first = matrices.first().ok_or(LinalgError::EmptyMatrix)?;
        let n = first.nrows();
        let mut stacked = DenseMatrix::zeros(n * n, matrices.len());
        for (t, d) in matrices.iter().enumerate() {
            if !d.is_square() || d.nrows() != n {
                return Err(LinalgError::DimensionMismatch {
                    expected: n,
                    got: if d.is_square() { d.nrows() } else { d.ncols() },
                });
            }
            stacked.set_col(t, &d.map(|v| v * v).to_row_major());
        }
        Self::from_stacked(stacked)
    }

    /// Outcomes from raw n x d observation matrices through a distance metric.
    pub fn from_outcomes(
        outcomes: &[DenseMatrix],
        metric: DistanceMetric,
    ) -> Result<Self, LinalgError> {
        let distances: Vec<DenseMatrix> = outcomes
            .iter()
            .map(|y| pairwise_distances(y, metric))
            .collect();
        Self::from_distance_matrices(&distances)
    }

    pub fn n_subjects(&self) -> usize {
        self.n_subjects
    }

    pub fn n_outcomes(&self) -> usize {
        self.stacked.ncols()
    }

    pub fn as_matrix(&self) -> &DenseMatrix {
        &self.stacked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condensed_is_squared() {
        let cols = DistanceColumns::from_condensed(&[1.0, 3.0, 2.0]).unwrap();
        assert_eq!(cols.n_subjects(), 3);
        assert_eq!(cols.n_outcomes(), 1);
        // row-major (0, 2) entry and its mirror
        assert_eq!(cols.as_matrix().get(2, 0), 9.0);
        assert_eq!(cols.as_matrix().get(6, 0), 9.0);
    }

    #[test]
    fn test_outcomes_keep_order() {
        let a = DenseMatrix::column_vector(&[0.0, 1.0]);
        let b = DenseMatrix::column_vector(&[0.0, 3.0]);
        let cols = DistanceColumns::from_outcomes(&[a, b], DistanceMetric::Euclidean).unwrap();
        assert_eq!(cols.as_matrix().get(1, 0), 1.0);
        assert_eq!(cols.as_matrix().get(1, 1), 9.0);
    }

    #[test]
    fn test_mismatched_sizes() {
        let a = DenseMatrix::zeros(3, 3);
        let b = DenseMatrix::zeros(4, 4);
        assert!(DistanceColumns::from_distance_matrices(&[a, b]).is_err());
        assert!(DistanceColumns::from_stacked(DenseMatrix::zeros(8, 1)).is_err());
    }
}
