//! Pairwise distances between the rows of a sample matrix.
//!
//! Condensed output follows the usual upper-triangle order:
//! (0,1), (0,2), ..., (0,n-1), (1,2), ..., (n-2,n-1).

use std::str::FromStr;

use crate::decomposition::LinalgError;
use crate::dense::DenseMatrix;

/// Row-to-row distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMetric {
    Euclidean,
    SquaredEuclidean,
    Cityblock,
}

impl DistanceMetric {
    pub fn between(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        let pairs = a.iter().zip(b.iter());
        match self {
            DistanceMetric::Euclidean => pairs.map(|(x, y)| (x - y).powi(2)).sum::<f64>().sqrt(),
            DistanceMetric::SquaredEuclidean => pairs.map(|(x, y)| (x - y).powi(2)).sum(),
            DistanceMetric::Cityblock => pairs.map(|(x, y)| (x - y).abs()).sum(),
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = LinalgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" => Ok(DistanceMetric::Euclidean),
            "sqeuclidean" => Ok(DistanceMetric::SquaredEuclidean),
            "cityblock" | "manhattan" => Ok(DistanceMetric::Cityblock),
            other => Err(LinalgError::UnknownMetric(other.to_string())),
        }
    }
}

/// Condensed pairwise distances between the rows of `x`.
pub fn condensed_distances(x: &DenseMatrix, metric: DistanceMetric) -> Vec<f64> {
    let n = x.nrows();
    let rows: Vec<Vec<f64>> = (0..n).map(|i| x.row(i)).collect();
    let mut out = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            out.push(metric.between(&rows[i], &rows[j]));
        }
    }
    out
}

/// Full symmetric n x n distance matrix between the rows of `x`.
pub fn pairwise_distances(x: &DenseMatrix, metric: DistanceMetric) -> DenseMatrix {
    let condensed = condensed_distances(x, metric);
    // A condensed vector built from n rows always expands back to n x n.
    expand_condensed(&condensed, x.nrows())
}

/// Expand a condensed distance vector into its square form.
pub fn squareform(condensed: &[f64]) -> Result<DenseMatrix, LinalgError> {
    // len = n (n - 1) / 2  =>  n = (1 + sqrt(1 + 8 len)) / 2
    let len = condensed.len();
    let n = ((1.0 + (1.0 + 8.0 * len as f64).sqrt()) / 2.0).round() as usize;
    if n * (n - 1) / 2 != len {
        return Err(LinalgError::DimensionMismatch {
            expected: n * (n - 1) / 2,
            got: len,
        });
    }
    Ok(expand_condensed(condensed, n))
}

fn expand_condensed(condensed: &[f64], n: usize) -> DenseMatrix {
    let mut square = DenseMatrix::zeros(n, n);
    let mut k = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            square.set(i, j, condensed[k]);
            square.set(j, i, condensed[k]);
            k += 1;
        }
    }
    square
}
