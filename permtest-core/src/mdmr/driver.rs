//! MDMR driver: one permutation test per design column.
//!
//! The design is augmented with an intercept and must have full column
//! rank. Outcomes are Gower-centered once; every predictor column then
//! gets its own permutation batch, pseudo-F and p-value.
//!
//! df_among is the number of columns tested together (1 per column in
//! the per-column driver) and df_resid = n_subjects - augmented columns.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use permtest_linalg::decomposition::column_rank;
use permtest_linalg::projection::gower_center_many;
use permtest_linalg::DenseMatrix;

use super::ftest::{calc_ftest, fperms_to_pvals};
use super::hat::{gen_h2_perms, gen_ih_perms, TestedColumns};
use super::outcomes::DistanceColumns;
use super::MdmrError;
use crate::permutation::PermutationIndexes;

/// MDMR settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MdmrConfig {
    /// Random permutations per tested column (the observed ordering is extra).
    pub permutations: usize,
}

impl Default for MdmrConfig {
    fn default() -> Self {
        Self { permutations: 100 }
    }
}

/// One line of the results table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MdmrRow {
    /// Column of the intercept-augmented design (1 = first predictor).
    pub column: usize,
    /// Outcome (distance matrix) index.
    pub outcome: usize,
    pub f_statistic: f64,
    pub p_value: f64,
}

/// Results for every (predictor column, outcome), ordered by column then outcome.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MdmrTable {
    pub rows: Vec<MdmrRow>,
}

impl MdmrTable {
    /// `[column, F, p]` per row; for a single outcome this is the
    /// n_predictors x 3 table.
    pub fn to_matrix(&self) -> DenseMatrix {
        DenseMatrix::from_fn(self.rows.len(), 3, |i, j| {
            let row = &self.rows[i];
            match j {
                0 => row.column as f64,
                1 => row.f_statistic,
                _ => row.p_value,
            }
        })
    }
}

/// Result of testing several columns jointly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupResult {
    pub columns: Vec<usize>,
    pub f_statistics: Vec<f64>,
    pub p_values: Vec<f64>,
}

/// Validated inputs shared by every tested column.
struct Prepared {
    design: DenseMatrix,
    gower: DenseMatrix,
    n_predictors: usize,
    df_resid: f64,
}

/// Multivariate distance matrix regression.
#[derive(Debug, Clone, Default)]
pub struct Mdmr {
    config: MdmrConfig,
}

impl Mdmr {
    pub fn new(config: MdmrConfig) -> Self {
        Self { config }
    }

    /// Test every predictor column with fresh permutations from `rng`.
    pub fn run<R: Rng + ?Sized>(
        &self,
        distances: &DistanceColumns,
        design: &DenseMatrix,
        rng: &mut R,
    ) -> Result<MdmrTable, MdmrError> {
        if self.config.permutations == 0 {
            return Err(MdmrError::InvalidConfig(
                "permutations must be > 0".into(),
            ));
        }
        let prepared = prepare(distances, design)?;
        let n = design.nrows();

        let mut table = MdmrTable::default();
        for column in 1..=prepared.n_predictors {
            let perms = PermutationIndexes::generate(n, self.config.permutations, rng);
            table
                .rows
                .extend(test_column(&prepared, column, &perms)?);
        }
        info!(
            "MDMR: {} columns x {} outcomes, {} permutations each",
            prepared.n_predictors,
            distances.n_outcomes(),
            self.config.permutations
        );
        Ok(table)
    }

    /// Test every predictor column against one fixed set of orderings.
    ///
    /// Identical inputs give bit-identical tables.
    pub fn run_with_permutations(
        &self,
        distances: &DistanceColumns,
        design: &DenseMatrix,
        perms: &PermutationIndexes,
    ) -> Result<MdmrTable, MdmrError> {
        check_fixed_permutations(perms, design)?;
        let prepared = prepare(distances, design)?;
        let mut table = MdmrTable::default();
        for column in 1..=prepared.n_predictors {
            table.rows.extend(test_column(&prepared, column, perms)?);
        }
        Ok(table)
    }

    /// Jointly test a group of predictor columns (1-based, as in the table).
    pub fn run_group<R: Rng + ?Sized>(
        &self,
        distances: &DistanceColumns,
        design: &DenseMatrix,
        columns: &[usize],
        rng: &mut R,
    ) -> Result<GroupResult, MdmrError> {
        if self.config.permutations == 0 {
            return Err(MdmrError::InvalidConfig(
                "permutations must be > 0".into(),
            ));
        }
        let prepared = prepare(distances, design)?;
        if let Some(&column) = columns.iter().find(|&&c| c == 0) {
            return Err(MdmrError::ColumnOutOfRange {
                column,
                columns: prepared.design.ncols(),
            });
        }
        let tested = TestedColumns::Group(columns.to_vec());
        tested.validate(prepared.design.ncols())?;
        let perms = PermutationIndexes::generate(design.nrows(), self.config.permutations, rng);
        let (f_statistics, p_values) = test_columns(&prepared, &tested, &perms)?;
        Ok(GroupResult {
            columns: columns.to_vec(),
            f_statistics,
            p_values,
        })
    }
}

fn check_fixed_permutations(
    perms: &PermutationIndexes,
    design: &DenseMatrix,
) -> Result<(), MdmrError> {
    if perms.n_subjects() != design.nrows() {
        return Err(MdmrError::SubjectMismatch {
            design: design.nrows(),
            distances: perms.n_subjects(),
        });
    }
    if perms.permutations() == 0 {
        return Err(MdmrError::InvalidConfig(
            "permutation matrix holds only the identity row".into(),
        ));
    }
    Ok(())
}

/// Check preconditions, augment the design and center the outcomes.
fn prepare(distances: &DistanceColumns, design: &DenseMatrix) -> Result<Prepared, MdmrError> {
    let subjects = design.nrows();
    if subjects != distances.n_subjects() {
        return Err(MdmrError::SubjectMismatch {
            design: subjects,
            distances: distances.n_subjects(),
        });
    }

    let augmented = design.with_intercept();
    let columns = augmented.ncols();
    let rank = column_rank(&augmented);
    if rank < columns {
        return Err(MdmrError::RankDeficient { rank, columns });
    }
    if subjects <= columns {
        return Err(MdmrError::NoResidualDegreesOfFreedom { subjects, columns });
    }

    let gower = gower_center_many(distances.as_matrix())?;
    // trace(G) = (sum of squared distances) / 2n
    for outcome in 0..gower.ncols() {
        let trace: f64 = (0..subjects)
            .map(|i| gower.get(i * subjects + i, outcome))
            .sum();
        if trace.is_nan() || trace <= 0.0 {
            return Err(MdmrError::DegenerateOutcome { outcome });
        }
    }
    debug!(
        "MDMR inputs: {} subjects, {} design columns (with intercept), {} outcomes",
        subjects,
        columns,
        distances.n_outcomes()
    );

    Ok(Prepared {
        design: augmented,
        gower,
        n_predictors: design.ncols(),
        df_resid: (subjects - columns) as f64,
    })
}

fn test_column(
    prepared: &Prepared,
    column: usize,
    perms: &PermutationIndexes,
) -> Result<Vec<MdmrRow>, MdmrError> {
    let (f_observed, p_values) = test_columns(prepared, &TestedColumns::Single(column), perms)?;
    debug!(
        "Column {}: F = {:?}, p = {:?}",
        column, f_observed, p_values
    );
    Ok(f_observed
        .into_iter()
        .zip(p_values)
        .enumerate()
        .map(|(outcome, (f_statistic, p_value))| MdmrRow {
            column,
            outcome,
            f_statistic,
            p_value,
        })
        .collect())
}

/// Observed F and p-value per outcome for one tested column set.
fn test_columns(
    prepared: &Prepared,
    tested: &TestedColumns,
    perms: &PermutationIndexes,
) -> Result<(Vec<f64>, Vec<f64>), MdmrError> {
    let h2 = gen_h2_perms(&prepared.design, tested, perms)?;
    let ih = gen_ih_perms(&prepared.design, tested, perms)?;
    let df_among = tested.len() as f64;
    let f_perms = calc_ftest(&h2, &ih, &prepared.gower, df_among, prepared.df_resid)?;
    Ok((f_perms.row(0), fperms_to_pvals(&f_perms)))
}
