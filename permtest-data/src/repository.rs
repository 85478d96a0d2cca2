//! On-disk repository of pre-generated power-simulation samples.
//!
//! Layout under the repository root:
//! - `sample_data_power_dimensions/type_<sim>_dim_<d>_X.mat` and `_Y.mat`
//! - `sample_data_power_sample_size/type_<sim>_size_<n>_X.mat` and `_Y.mat`
//!
//! Each file holds one array named `X` or `Y`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use tracing::info;

use crate::matlab::read_mat_array;
use crate::sample_array::SampleArray;
use crate::traits::{DataAxis, SampleStore};

pub const DIMENSIONS_DIR: &str = "sample_data_power_dimensions";
pub const SAMPLE_SIZE_DIR: &str = "sample_data_power_sample_size";

/// A directory of `.mat` sample files.
#[derive(Debug, Clone)]
pub struct SampleRepository {
    root: PathBuf,
}

impl SampleRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name prefix for one simulation type and axis value.
    pub fn prefix(&self, simulation_type: &str, axis: DataAxis) -> PathBuf {
        let dir = match axis {
            DataAxis::Dimension(_) => DIMENSIONS_DIR,
            DataAxis::SampleSize(_) => SAMPLE_SIZE_DIR,
        };
        self.root
            .join(dir)
            .join(format!("type_{}_{}", simulation_type, axis))
    }

    /// Paths of the X and Y files.
    pub fn paths(&self, simulation_type: &str, axis: DataAxis) -> (PathBuf, PathBuf) {
        let prefix = self.prefix(simulation_type, axis).display().to_string();
        (
            PathBuf::from(format!("{}_X.mat", prefix)),
            PathBuf::from(format!("{}_Y.mat", prefix)),
        )
    }
}

impl SampleStore for SampleRepository {
    fn load(&self, simulation_type: &str, axis: DataAxis) -> Result<(SampleArray, SampleArray)> {
        let (x_path, y_path) = self.paths(simulation_type, axis);
        info!("Loading pre-generated samples: {}", x_path.display());
        let x = read_mat_array(&x_path, "X")?;
        let y = read_mat_array(&y_path, "Y")?;

        if x.n_samples() != y.n_samples() || x.repetitions() != y.repetitions() {
            bail!(
                "X ({} x {} x {}) and Y ({} x {} x {}) disagree on samples or repetitions",
                x.n_samples(),
                x.n_dimensions(),
                x.repetitions(),
                y.n_samples(),
                y.n_dimensions(),
                y.repetitions()
            );
        }
        Ok((x, y))
    }
}
