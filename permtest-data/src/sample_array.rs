//! Three-dimensional sample arrays (samples x dimensions x repetitions).
//!
//! Storage is column-major, the layout MATLAB writes, so element
//! (i, j, r) lives at `i + n * (j + d * r)`.

use anyhow::{bail, Result};

use permtest_linalg::DenseMatrix;

/// A stack of `repetitions` sample matrices of shape n x d.
#[derive(Debug, Clone)]
pub struct SampleArray {
    n_samples: usize,
    n_dimensions: usize,
    repetitions: usize,
    data: Vec<f64>,
}

impl SampleArray {
    /// Wrap column-major data of shape (n_samples, n_dimensions, repetitions).
    pub fn from_col_major(
        n_samples: usize,
        n_dimensions: usize,
        repetitions: usize,
        data: Vec<f64>,
    ) -> Result<Self> {
        let expected = n_samples * n_dimensions * repetitions;
        if data.len() != expected {
            bail!(
                "Sample array of shape ({}, {}, {}) needs {} values, got {}",
                n_samples,
                n_dimensions,
                repetitions,
                expected,
                data.len()
            );
        }
        Ok(Self {
            n_samples,
            n_dimensions,
            repetitions,
            data,
        })
    }

    /// Stack equally shaped matrices along the repetition axis.
    pub fn from_matrices(matrices: &[DenseMatrix]) -> Result<Self> {
        let Some(first) = matrices.first() else {
            bail!("Cannot build a sample array from zero matrices");
        };
        let (n, d) = (first.nrows(), first.ncols());
        let mut data = Vec::with_capacity(n * d * matrices.len());
        for (r, m) in matrices.iter().enumerate() {
            if m.nrows() != n || m.ncols() != d {
                bail!(
                    "Repetition {} has shape {}x{}, expected {}x{}",
                    r,
                    m.nrows(),
                    m.ncols(),
                    n,
                    d
                );
            }
            for j in 0..d {
                data.extend(m.col(j));
            }
        }
        Self::from_col_major(n, d, matrices.len(), data)
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn n_dimensions(&self) -> usize {
        self.n_dimensions
    }

    pub fn repetitions(&self) -> usize {
        self.repetitions
    }

    /// The n x d sample matrix of repetition `r`.
    pub fn repetition(&self, r: usize) -> DenseMatrix {
        assert!(r < self.repetitions, "repetition {} out of range", r);
        let offset = self.n_samples * self.n_dimensions * r;
        DenseMatrix::from_col_major(
            self.n_samples,
            self.n_dimensions,
            &self.data[offset..offset + self.n_samples * self.n_dimensions],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repetition_slicing() {
        // shape (2, 1, 3): repetition r holds [2r, 2r + 1]
        let arr = SampleArray::from_col_major(2, 1, 3, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let m = arr.repetition(2);
        assert_eq!(m.col(0), vec![4.0, 5.0]);
    }

    #[test]
    fn test_from_matrices_matches_layout() {
        let a = DenseMatrix::from_row_major(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let b = DenseMatrix::from_row_major(2, 2, &[5.0, 6.0, 7.0, 8.0]);
        let arr = SampleArray::from_matrices(&[a.clone(), b]).unwrap();
        assert_eq!(arr.repetitions(), 2);
        assert_eq!(arr.repetition(0).to_row_major(), a.to_row_major());
        assert_eq!(arr.repetition(1).row(1), vec![7.0, 8.0]);
    }

    #[test]
    fn test_shape_mismatch() {
        assert!(SampleArray::from_col_major(2, 2, 2, vec![0.0; 7]).is_err());
        let a = DenseMatrix::zeros(2, 2);
        let b = DenseMatrix::zeros(3, 2);
        assert!(SampleArray::from_matrices(&[a, b]).is_err());
    }
}
