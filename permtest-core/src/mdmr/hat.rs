//! Batches of permuted projection matrices.
//!
//! For permutation row p, with X_p the design with rows reordered by p:
//!   H2_p = hat(X_p[:, tested]) - hat(X[:, other])
//!   IH_p = I - hat(X_p[:, tested])
//! Each n x n result is flattened row-major into column p of an
//! n^2 x (P + 1) batch. The complement projection always uses the
//! unpermuted design.
//!
//! Columns are computed in parallel; column p always belongs to
//! permutation row p, so column 0 is the observed arrangement.

use std::collections::HashSet;

use rayon::prelude::*;

use permtest_linalg::projection::hatify;
use permtest_linalg::{DenseMatrix, LinalgError};

use super::MdmrError;
use crate::permutation::PermutationIndexes;

/// Design columns whose contribution is being tested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestedColumns {
    Single(usize),
    Group(Vec<usize>),
}

impl TestedColumns {
    pub fn indices(&self) -> Vec<usize> {
        match self {
            TestedColumns::Single(c) => vec![*c],
            TestedColumns::Group(cs) => cs.clone(),
        }
    }

    /// Number of tested columns (the among-groups degrees of freedom).
    pub fn len(&self) -> usize {
        match self {
            TestedColumns::Single(_) => 1,
            TestedColumns::Group(cs) => cs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every design column not tested, in ascending order.
    pub fn complement(&self, n_columns: usize) -> Vec<usize> {
        let tested = self.indices();
        (0..n_columns).filter(|c| !tested.contains(c)).collect()
    }

    pub(super) fn validate(&self, n_columns: usize) -> Result<(), MdmrError> {
        if self.is_empty() {
            return Err(MdmrError::NoTestedColumns);
        }
        let indices = self.indices();
        if let Some(&column) = indices.iter().find(|&&c| c >= n_columns) {
            return Err(MdmrError::ColumnOutOfRange {
                column,
                columns: n_columns,
            });
        }
        let mut seen = HashSet::with_capacity(indices.len());
        match indices.into_iter().find(|&c| !seen.insert(c)) {
            Some(column) => Err(MdmrError::DuplicateColumn { column }),
            None => Ok(()),
        }
    }
}

fn tested_hat(
    x: &DenseMatrix,
    tested: &[usize],
    order: &[usize],
) -> Result<DenseMatrix, LinalgError> {
    hatify(&x.select_rows(order).select_columns(tested))
}

fn check_subjects(x: &DenseMatrix, perms: &PermutationIndexes) -> Result<(), MdmrError> {
    if perms.n_subjects() != x.nrows() {
        return Err(MdmrError::SubjectMismatch {
            design: x.nrows(),
            distances: perms.n_subjects(),
        });
    }
    Ok(())
}

/// Collect per-permutation flattened matrices into an n^2 x (P + 1) batch.
fn assemble(n: usize, flattened: Vec<Vec<f64>>) -> DenseMatrix {
    let mut batch = DenseMatrix::zeros(n * n, flattened.len());
    for (p, col) in flattened.iter().enumerate() {
        batch.set_col(p, col);
    }
    batch
}

/// H2 batch: tested-column projection minus the complement projection.
pub fn gen_h2_perms(
    x: &DenseMatrix,
    columns: &TestedColumns,
    perms: &PermutationIndexes,
) -> Result<DenseMatrix, MdmrError> {
    columns.validate(x.ncols())?;
    check_subjects(x, perms)?;
    let n = x.nrows();
    let tested = columns.indices();
    let other = columns.complement(x.ncols());

    // An empty complement projects onto nothing.
    let h_other = if other.is_empty() {
        DenseMatrix::zeros(n, n)
    } else {
        hatify(&x.select_columns(&other))?
    };

    let flattened = (0..perms.n_rows())
        .into_par_iter()
        .map(|p| -> Result<Vec<f64>, LinalgError> {
            let h = tested_hat(x, &tested, perms.row(p))?;
            Ok(h.sub(&h_other).to_row_major())
        })
        .collect::<Result<Vec<_>, LinalgError>>()?;

    Ok(assemble(n, flattened))
}

/// IH batch: identity minus the tested-column projection.
pub fn gen_ih_perms(
    x: &DenseMatrix,
    columns: &TestedColumns,
    perms: &PermutationIndexes,
) -> Result<DenseMatrix, MdmrError> {
    columns.validate(x.ncols())?;
    check_subjects(x, perms)?;
    let n = x.nrows();
    let tested = columns.indices();
    let identity = DenseMatrix::identity(n);

    let flattened = (0..perms.n_rows())
        .into_par_iter()
        .map(|p| -> Result<Vec<f64>, LinalgError> {
            let h = tested_hat(x, &tested, perms.row(p))?;
            Ok(identity.sub(&h).to_row_major())
        })
        .collect::<Result<Vec<_>, LinalgError>>()?;

    Ok(assemble(n, flattened))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn design() -> DenseMatrix {
        DenseMatrix::from_row_major(
            6,
            3,
            &[
                1.0, 0.2, 3.0, //
                1.0, -1.0, 1.0, //
                1.0, 0.7, -2.0, //
                1.0, 1.5, 0.5, //
                1.0, -0.3, 0.0, //
                1.0, 0.9, 1.2,
            ],
        )
    }

    fn perms(p: usize) -> PermutationIndexes {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(3);
        PermutationIndexes::generate(6, p, &mut rng)
    }

    #[test]
    fn test_single_and_group_agree() {
        let x = design();
        let p = perms(4);
        let single = gen_h2_perms(&x, &TestedColumns::Single(1), &p).unwrap();
        let group = gen_h2_perms(&x, &TestedColumns::Group(vec![1]), &p).unwrap();
        assert_eq!(single.to_row_major(), group.to_row_major());

        let single = gen_ih_perms(&x, &TestedColumns::Single(2), &p).unwrap();
        let group = gen_ih_perms(&x, &TestedColumns::Group(vec![2]), &p).unwrap();
        assert_eq!(single.to_row_major(), group.to_row_major());
    }

    #[test]
    fn test_batch_shape() {
        let x = design();
        let h2 = gen_h2_perms(&x, &TestedColumns::Single(1), &perms(9)).unwrap();
        assert_eq!(h2.nrows(), 36);
        assert_eq!(h2.ncols(), 10);
    }

    #[test]
    fn test_observed_column_is_unpermuted() {
        let x = design();
        let ih = gen_ih_perms(&x, &TestedColumns::Single(1), &perms(3)).unwrap();
        let expected = DenseMatrix::identity(6)
            .sub(&hatify(&x.select_columns(&[1])).unwrap())
            .to_row_major();
        for (k, v) in expected.iter().enumerate() {
            assert!((ih.get(k, 0) - v).abs() < 1e-12);
        }
    }

    #[test]
    fn test_complement() {
        assert_eq!(TestedColumns::Single(1).complement(4), vec![0, 2, 3]);
        assert_eq!(TestedColumns::Group(vec![0, 3]).complement(4), vec![1, 2]);
    }

    #[test]
    fn test_out_of_range_column() {
        let err = gen_h2_perms(&design(), &TestedColumns::Single(3), &perms(1)).unwrap_err();
        assert_eq!(
            err,
            MdmrError::ColumnOutOfRange {
                column: 3,
                columns: 3
            }
        );
        let err = gen_ih_perms(&design(), &TestedColumns::Group(vec![]), &perms(1)).unwrap_err();
        assert_eq!(err, MdmrError::NoTestedColumns);
    }

    #[test]
    fn test_repeated_column_rejected() {
        let err = gen_h2_perms(&design(), &TestedColumns::Group(vec![1, 2, 1]), &perms(1))
            .unwrap_err();
        assert_eq!(err, MdmrError::DuplicateColumn { column: 1 });
        let err = gen_ih_perms(&design(), &TestedColumns::Group(vec![2, 2]), &perms(1))
            .unwrap_err();
        assert_eq!(err, MdmrError::DuplicateColumn { column: 2 });
    }

    #[test]
    fn test_all_columns_tested() {
        // Empty complement: H2 reduces to the full projection.
        let x = design();
        let h2 = gen_h2_perms(&x, &TestedColumns::Group(vec![0, 1, 2]), &perms(1)).unwrap();
        let h = hatify(&x).unwrap().to_row_major();
        for (k, v) in h.iter().enumerate() {
            assert!((h2.get(k, 0) - v).abs() < 1e-12);
        }
    }
}
