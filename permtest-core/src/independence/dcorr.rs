//! Distance correlation (dCor).
//!
//! With A and B the double-centered distance matrices of X and Y:
//!   dCov^2(X, Y) = mean(A o B)
//!   dCor^2(X, Y) = dCov^2(X, Y) / sqrt(dVar^2(X) dVar^2(Y))
//! The statistic is dCor^2, zero when either sample has no spread.

use anyhow::{bail, Result};

use permtest_linalg::distance::pairwise_distances;
use permtest_linalg::projection::gower_center;
use permtest_linalg::{DenseMatrix, DistanceMetric};

use super::IndependenceTest;

/// Distance covariance components behind a dCor value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DcorrComponents {
    pub dcov: f64,
    pub dvar_x: f64,
    pub dvar_y: f64,
}

/// Biased sample distance correlation.
#[derive(Debug, Clone, Copy)]
pub struct DistanceCorrelation {
    pub metric: DistanceMetric,
}

impl Default for DistanceCorrelation {
    fn default() -> Self {
        Self {
            metric: DistanceMetric::Euclidean,
        }
    }
}

impl DistanceCorrelation {
    fn centered(&self, sample: &DenseMatrix) -> Result<DenseMatrix> {
        let d = pairwise_distances(sample, self.metric);
        // gower_center scales by -1/2; undo it to get plain double-centering.
        Ok(gower_center(&d)?.scale(-2.0))
    }
}

fn mean_product(a: &DenseMatrix, b: &DenseMatrix) -> f64 {
    let n = a.nrows();
    let mut sum = 0.0;
    for j in 0..n {
        for i in 0..n {
            sum += a.get(i, j) * b.get(i, j);
        }
    }
    sum / (n * n) as f64
}

impl IndependenceTest for DistanceCorrelation {
    type Auxiliary = DcorrComponents;

    fn name(&self) -> &str {
        "dcorr"
    }

    fn test_statistic(
        &self,
        x: &DenseMatrix,
        y: &DenseMatrix,
    ) -> Result<(f64, DcorrComponents)> {
        if x.nrows() != y.nrows() {
            bail!(
                "dcorr: X has {} samples but Y has {}",
                x.nrows(),
                y.nrows()
            );
        }
        if x.nrows() < 2 {
            bail!("dcorr: need at least 2 samples, got {}", x.nrows());
        }

        let a = self.centered(x)?;
        let b = self.centered(y)?;
        let components = DcorrComponents {
            dcov: mean_product(&a, &b),
            dvar_x: mean_product(&a, &a),
            dvar_y: mean_product(&b, &b),
        };

        let denom = (components.dvar_x * components.dvar_y).sqrt();
        let stat = if denom > 0.0 {
            components.dcov / denom
        } else {
            0.0
        };
        Ok((stat, components))
    }
}
