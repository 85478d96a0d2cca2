//! Multivariate Distance Matrix Regression (MDMR).
//!
//! Tests each design-matrix column for association with one or more
//! distance matrices. For every column a batch of permuted projection
//! matrices yields a pseudo-F per permutation; the share of permuted
//! F values at least as large as the observed one is the p-value.

pub mod driver;
pub mod ftest;
pub mod hat;
pub mod outcomes;

use permtest_linalg::LinalgError;
use thiserror::Error;

pub use driver::{Mdmr, MdmrConfig, MdmrRow, MdmrTable};
pub use hat::TestedColumns;
pub use outcomes::DistanceColumns;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MdmrError {
    #[error("Design matrix is rank deficient (rank {rank} vs cols {columns})")]
    RankDeficient { rank: usize, columns: usize },

    #[error("Number of subjects incompatible between design ({design}) and distances ({distances})")]
    SubjectMismatch { design: usize, distances: usize },

    #[error("Not enough subjects ({subjects}) for {columns} design columns")]
    NoResidualDegreesOfFreedom { subjects: usize, columns: usize },

    #[error("Tested column {column} out of range for {columns} design columns")]
    ColumnOutOfRange { column: usize, columns: usize },

    #[error("No columns selected for testing")]
    NoTestedColumns,

    #[error("Column {column} is listed more than once in the tested group")]
    DuplicateColumn { column: usize },

    #[error("Outcome {outcome} has no spread (all distances equal)")]
    DegenerateOutcome { outcome: usize },

    #[error("Permutation row {row} is not a permutation of the subjects")]
    InvalidPermutation { row: usize },

    #[error("First permutation row must be the identity")]
    MissingIdentity,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Linalg(#[from] LinalgError),
}
