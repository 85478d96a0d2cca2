//! Power estimation loop.

use anyhow::{bail, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use permtest_data::{DataAxis, SampleStore};
use permtest_linalg::DenseMatrix;

use crate::independence::IndependenceTest;
use crate::simulation::{SimulationArgs, Simulator};

/// Power estimation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerEstimator {
    /// Repetitions R; each contributes one null and one alternative statistic.
    pub repeats: usize,
    /// Type I error level.
    pub alpha: f64,
}

impl Default for PowerEstimator {
    fn default() -> Self {
        Self {
            repeats: 1000,
            alpha: 0.05,
        }
    }
}

/// Outcome of one power estimation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerEstimate {
    pub power: f64,
    pub cutoff: f64,
    pub null_statistics: Vec<f64>,
    pub alternative_statistics: Vec<f64>,
}

impl PowerEstimator {
    pub fn new(repeats: usize, alpha: f64) -> Result<Self> {
        let estimator = Self { repeats, alpha };
        estimator.validate()?;
        Ok(estimator)
    }

    pub fn validate(&self) -> Result<()> {
        if self.repeats == 0 {
            bail!("repeats must be > 0");
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            bail!("alpha must lie in (0, 1), got {}", self.alpha);
        }
        Ok(())
    }

    /// Power of `test` on samples drawn from `simulator`.
    pub fn power<T, S, R>(
        &self,
        test: &T,
        simulator: &S,
        n_samples: usize,
        n_dimensions: usize,
        args: &SimulationArgs,
        rng: &mut R,
    ) -> Result<PowerEstimate>
    where
        T: IndependenceTest + ?Sized,
        S: Simulator<R> + ?Sized,
        R: Rng + ?Sized,
    {
        self.validate()?;
        info!(
            "Estimating power of {}: n = {}, d = {}, {} repeats, alpha = {}",
            test.name(),
            n_samples,
            n_dimensions,
            self.repeats,
            self.alpha
        );
        self.accumulate(test, rng, |_, rng: &mut R| {
            simulator.generate(n_samples, n_dimensions, args, rng)
        })
    }

    /// Power of `test` on pre-generated samples.
    ///
    /// Repetition r of the stored X and Y arrays is used for repeat r, so
    /// the store must hold at least `repeats` repetitions.
    pub fn power_given_data<T, St, R>(
        &self,
        test: &T,
        store: &St,
        simulation_type: &str,
        axis: DataAxis,
        rng: &mut R,
    ) -> Result<PowerEstimate>
    where
        T: IndependenceTest + ?Sized,
        St: SampleStore + ?Sized,
        R: Rng + ?Sized,
    {
        self.validate()?;
        let (xs, ys) = store.load(simulation_type, axis)?;
        if xs.n_samples() != ys.n_samples() {
            bail!(
                "{} ({}): X has {} samples but Y has {}",
                simulation_type,
                axis,
                xs.n_samples(),
                ys.n_samples()
            );
        }
        let available = xs.repetitions().min(ys.repetitions());
        if available < self.repeats {
            bail!(
                "{} ({}): {} repeats requested but only {} stored",
                simulation_type,
                axis,
                self.repeats,
                available
            );
        }
        info!(
            "Estimating power of {} on stored {} ({}): n = {}, {} repeats",
            test.name(),
            simulation_type,
            axis,
            xs.n_samples(),
            self.repeats
        );
        self.accumulate(test, rng, |r, _: &mut R| {
            Ok((xs.repetition(r), ys.repetition(r)))
        })
    }

    fn accumulate<T, R, F>(&self, test: &T, rng: &mut R, mut draw: F) -> Result<PowerEstimate>
    where
        T: IndependenceTest + ?Sized,
        R: Rng + ?Sized,
        F: FnMut(usize, &mut R) -> Result<(DenseMatrix, DenseMatrix)>,
    {
        let mut null = vec![0.0; self.repeats];
        let mut alt = vec![0.0; self.repeats];

        for r in 0..self.repeats {
            let (x, y) = draw(r, &mut *rng)?;
            let mut order: Vec<usize> = (0..y.nrows()).collect();
            order.shuffle(&mut *rng);
            let y_perm = y.select_rows(&order);

            null[r] = test.test_statistic(&x, &y_perm)?.0;
            alt[r] = test.test_statistic(&x, &y)?.0;
        }

        let cutoff = null_cutoff(&null, self.alpha);
        let power = empirical_power(&alt, cutoff);
        debug!("Null cutoff at alpha = {}: {}", self.alpha, cutoff);
        info!("Empirical power: {:.4}", power);

        Ok(PowerEstimate {
            power,
            cutoff,
            null_statistics: null,
            alternative_statistics: alt,
        })
    }
}

/// The (1 - alpha) empirical quantile of the null statistics.
///
/// Index `ceil(R (1 - alpha))` of the sorted values, clamped to the last
/// element.
pub fn null_cutoff(null: &[f64], alpha: f64) -> f64 {
    if null.is_empty() {
        return f64::NAN;
    }
    let mut sorted = null.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let idx = (sorted.len() as f64 * (1.0 - alpha)).ceil() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Fraction of alternative statistics at or above `cutoff`.
pub fn empirical_power(alt: &[f64], cutoff: f64) -> f64 {
    if alt.is_empty() {
        return 0.0;
    }
    alt.iter().filter(|&&s| s >= cutoff).count() as f64 / alt.len() as f64
}
