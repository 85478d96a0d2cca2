//! Independence tests usable by the power harness.
//!
//! A test maps paired samples (X, Y), each with n rows, to a scalar
//! statistic where larger means more evidence of dependence, plus
//! whatever auxiliary output the test produces.

pub mod dcorr;

use anyhow::Result;

use permtest_linalg::DenseMatrix;

pub use dcorr::DistanceCorrelation;

/// A statistic for testing dependence between X and Y.
pub trait IndependenceTest {
    type Auxiliary;

    /// Short identifier used in logs and reports.
    fn name(&self) -> &str;

    fn test_statistic(&self, x: &DenseMatrix, y: &DenseMatrix)
        -> Result<(f64, Self::Auxiliary)>;
}
