//! Empirical power of independence tests.
//!
//! For each repetition a (X, Y) pair is drawn, either simulated or read
//! from pre-generated data. The test statistic on (X, Y) goes into the
//! alternative distribution and the statistic on (X, Y with shuffled
//! rows) into the null distribution. Power is the fraction of
//! alternative statistics at or above the null's (1 - alpha) cutoff.

pub mod harness;

pub use harness::{empirical_power, null_cutoff, PowerEstimate, PowerEstimator};
