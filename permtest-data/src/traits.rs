//! Core traits for reading pre-generated power-simulation samples.

use std::fmt;

use anyhow::Result;

use crate::sample_array::SampleArray;

/// Which sweep a pre-generated data set belongs to.
///
/// Data sets either grow in dimension at a fixed sample size or grow in
/// sample size at a fixed dimension; the key selects the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataAxis {
    Dimension(usize),
    SampleSize(usize),
}

impl fmt::Display for DataAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataAxis::Dimension(d) => write!(f, "dim_{}", d),
            DataAxis::SampleSize(n) => write!(f, "size_{}", n),
        }
    }
}

/// Source of pre-generated (X, Y) sample stacks.
///
/// `load` returns the X and Y arrays for one simulation type; both have
/// shape (n_samples, n_dimensions, repetitions) and agree on n_samples
/// and repetitions.
pub trait SampleStore {
    fn load(&self, simulation_type: &str, axis: DataAxis) -> Result<(SampleArray, SampleArray)>;
}
