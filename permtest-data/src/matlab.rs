//! MATLAB level-5 `.mat` reader for pre-generated sample arrays.
//!
//! Only real numeric arrays are accepted. A 2-D array is read as a
//! single repetition; a 3-D array is (samples, dimensions, repetitions).

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use matfile::{MatFile, NumericData};
use tracing::debug;

use crate::sample_array::SampleArray;

/// Read the array called `name` from a `.mat` file.
pub fn read_mat_array(path: &Path, name: &str) -> Result<SampleArray> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open MAT file: {}", path.display()))?;
    let mat = MatFile::parse(std::io::BufReader::new(file))
        .map_err(|e| anyhow!("Failed to parse MAT file {}: {:?}", path.display(), e))?;

    let array = mat
        .find_by_name(name)
        .ok_or_else(|| anyhow!("Array '{}' not found in {}", name, path.display()))?;

    let size = array.size();
    let (n, d, reps) = match size.as_slice() {
        [n, d] => (*n, *d, 1),
        [n, d, r] => (*n, *d, *r),
        other => bail!(
            "Array '{}' in {} has {} dimensions, expected 2 or 3",
            name,
            path.display(),
            other.len()
        ),
    };

    let values = real_values(array.data())
        .with_context(|| format!("Array '{}' in {}", name, path.display()))?;
    debug!(
        "Read '{}' from {}: {} x {} x {}",
        name,
        path.display(),
        n,
        d,
        reps
    );
    SampleArray::from_col_major(n, d, reps, values)
}

fn real_values(data: &NumericData) -> Result<Vec<f64>> {
    let (values, has_imag): (Vec<f64>, bool) = match data {
        NumericData::Double { real, imag } => (real.clone(), imag.is_some()),
        NumericData::Single { real, imag } => {
            (real.iter().map(|&v| v as f64).collect(), imag.is_some())
        }
        NumericData::Int32 { real, imag } => {
            (real.iter().map(|&v| v as f64).collect(), imag.is_some())
        }
        NumericData::Int64 { real, imag } => {
            (real.iter().map(|&v| v as f64).collect(), imag.is_some())
        }
        _ => bail!("unsupported numeric class (expected double, single or integer)"),
    };
    if has_imag {
        bail!("complex arrays are not supported");
    }
    Ok(values)
}
