//! permtest-core: Permutation tests and power estimation for permtest-rs
//!
//! Implements multivariate distance matrix regression (MDMR) with
//! permutation p-values, the empirical power harness for pluggable
//! independence tests, distance correlation, and sample simulators.

pub mod independence;
pub mod mdmr;
pub mod permutation;
pub mod power;
pub mod simulation;
