//! Pseudo-F statistics and permutation p-values.
//!
//!   F = (H2' G / df_among) / (IH' G / df_resid)
//!
//! evaluated for every permutation (rows) and outcome (columns) at once.

use permtest_linalg::{DenseMatrix, LinalgError};

/// (P + 1) x n_outcomes matrix of pseudo-F values; row 0 is observed.
pub fn calc_ftest(
    h2_perms: &DenseMatrix,
    ih_perms: &DenseMatrix,
    gower: &DenseMatrix,
    df_among: f64,
    df_resid: f64,
) -> Result<DenseMatrix, LinalgError> {
    if h2_perms.nrows() != gower.nrows() || ih_perms.nrows() != gower.nrows() {
        return Err(LinalgError::DimensionMismatch {
            expected: gower.nrows(),
            got: h2_perms.nrows().max(ih_perms.nrows()),
        });
    }
    if h2_perms.ncols() != ih_perms.ncols() {
        return Err(LinalgError::DimensionMismatch {
            expected: h2_perms.ncols(),
            got: ih_perms.ncols(),
        });
    }

    let numer = h2_perms.t_mat_mul(gower);
    let denom = ih_perms.t_mat_mul(gower);
    Ok(DenseMatrix::from_fn(numer.nrows(), numer.ncols(), |r, t| {
        (numer.get(r, t) / df_among) / (denom.get(r, t) / df_resid)
    }))
}

/// Permutation p-value per outcome column.
///
/// p = #{r : F[r] >= F[0]} / (P + 1). The observed row always counts
/// toward the numerator, so p >= 1 / (P + 1). An undefined observed F
/// carries no evidence and gets p = 1.
pub fn fperms_to_pvals(f_perms: &DenseMatrix) -> Vec<f64> {
    let rows = f_perms.nrows();
    (0..f_perms.ncols())
        .map(|t| {
            let observed = f_perms.get(0, t);
            if observed.is_nan() {
                return 1.0;
            }
            let exceed = (1..rows).filter(|&r| f_perms.get(r, t) >= observed).count();
            (exceed + 1) as f64 / rows as f64
        })
        .collect()
}
