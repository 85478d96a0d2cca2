//! Permutation-index matrices for permutation tests.
//!
//! A (P + 1) x n matrix of subject orderings. Row 0 is always the
//! identity (the observed arrangement); rows 1..=P are independent
//! uniform shuffles. Rows may repeat.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::mdmr::MdmrError;

/// Subject orderings used by one permutation test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationIndexes {
    n_subjects: usize,
    rows: Vec<Vec<usize>>,
}

impl PermutationIndexes {
    /// Identity row followed by `permutations` uniform shuffles drawn from `rng`.
    pub fn generate<R: Rng + ?Sized>(n_subjects: usize, permutations: usize, rng: &mut R) -> Self {
        let identity: Vec<usize> = (0..n_subjects).collect();
        let mut rows = Vec::with_capacity(permutations + 1);
        rows.push(identity.clone());
        for _ in 0..permutations {
            let mut row = identity.clone();
            row.shuffle(rng);
            rows.push(row);
        }
        Self { n_subjects, rows }
    }

    /// Use a fixed set of orderings.
    ///
    /// Every row must be a permutation of `0..n` and row 0 must be the
    /// identity.
    pub fn from_rows(rows: Vec<Vec<usize>>) -> Result<Self, MdmrError> {
        let n_subjects = rows.first().map_or(0, Vec::len);
        for (r, row) in rows.iter().enumerate() {
            if !is_permutation(row, n_subjects) {
                return Err(MdmrError::InvalidPermutation { row: r });
            }
        }
        match rows.first() {
            Some(first) if first.iter().enumerate().all(|(i, &v)| i == v) => {}
            _ => return Err(MdmrError::MissingIdentity),
        }
        Ok(Self { n_subjects, rows })
    }

    pub fn n_subjects(&self) -> usize {
        self.n_subjects
    }

    /// Number of rows, including the identity row.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of random permutations (rows after the identity).
    pub fn permutations(&self) -> usize {
        self.rows.len() - 1
    }

    pub fn row(&self, r: usize) -> &[usize] {
        &self.rows[r]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[usize]> {
        self.rows.iter().map(Vec::as_slice)
    }
}

fn is_permutation(row: &[usize], n: usize) -> bool {
    if row.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &v in row {
        if v >= n || seen[v] {
            return false;
        }
        seen[v] = true;
    }
    true
}
