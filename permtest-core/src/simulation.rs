//! Sample simulators for power estimation.
//!
//! A simulator draws paired samples (X, Y) with n rows. Options that
//! only some simulation families understand (period, radius, whether
//! noise applies) travel in a `SimulationArgs` resolved once from a
//! simulation tag.

use std::f64::consts::PI;

use anyhow::{bail, Result};
use rand::Rng;
use statrs::distribution::Normal;

use permtest_linalg::DenseMatrix;

/// Per-family simulation options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimulationArgs {
    /// Additive noise only.
    Noise { noise: f64 },
    /// Noise plus a period (or rotation angle for the diamond).
    Periodic { noise: f64, period: f64 },
    /// Noise plus a radius.
    Radial { noise: f64, radius: f64 },
    /// The family ignores the noise level.
    Noiseless,
}

impl SimulationArgs {
    /// Resolve a simulation tag. Unknown tags use the plain noise form.
    pub fn from_tag(tag: &str, noise: f64) -> Self {
        match tag {
            "sine_16pi" => SimulationArgs::Periodic {
                noise,
                period: 16.0 * PI,
            },
            "multi_noise" | "multi_indept" => SimulationArgs::Noiseless,
            "ellipse" => SimulationArgs::Radial { noise, radius: 5.0 },
            "diamond" => SimulationArgs::Periodic {
                noise,
                period: -PI / 8.0,
            },
            _ => SimulationArgs::Noise { noise },
        }
    }

    pub fn noise(&self) -> f64 {
        match *self {
            SimulationArgs::Noise { noise }
            | SimulationArgs::Periodic { noise, .. }
            | SimulationArgs::Radial { noise, .. } => noise,
            SimulationArgs::Noiseless => 0.0,
        }
    }

    pub fn period(&self) -> Option<f64> {
        match *self {
            SimulationArgs::Periodic { period, .. } => Some(period),
            _ => None,
        }
    }

    pub fn radius(&self) -> Option<f64> {
        match *self {
            SimulationArgs::Radial { radius, .. } => Some(radius),
            _ => None,
        }
    }
}

/// Draws paired samples from random source `R`.
pub trait Simulator<R: Rng + ?Sized> {
    fn generate(
        &self,
        n_samples: usize,
        n_dimensions: usize,
        args: &SimulationArgs,
        rng: &mut R,
    ) -> Result<(DenseMatrix, DenseMatrix)>;
}

impl<R, F> Simulator<R> for F
where
    R: Rng + ?Sized,
    F: Fn(usize, usize, &SimulationArgs, &mut R) -> Result<(DenseMatrix, DenseMatrix)>,
{
    fn generate(
        &self,
        n_samples: usize,
        n_dimensions: usize,
        args: &SimulationArgs,
        rng: &mut R,
    ) -> Result<(DenseMatrix, DenseMatrix)> {
        self(n_samples, n_dimensions, args, rng)
    }
}

/// Built-in simulation families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Simulation {
    /// y = x w + noise, with weights w_j = 1 / (j + 1).
    Linear,
    /// y = sin(period * x) + noise; period defaults to 4 pi.
    Sine,
    /// Points on an ellipse of the given radius (default 1).
    Ellipse,
    /// A uniform square rotated by `period` radians (default -pi/4).
    Diamond,
    /// y = x * e with independent Gaussian e.
    MultiplicativeNoise,
    /// X and Y independent Gaussians.
    Independent,
}

impl Simulation {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "linear" => Some(Simulation::Linear),
            "sine" | "sine_16pi" => Some(Simulation::Sine),
            "ellipse" | "circle" => Some(Simulation::Ellipse),
            "diamond" | "square" => Some(Simulation::Diamond),
            "multi_noise" => Some(Simulation::MultiplicativeNoise),
            "independent" | "multi_indept" => Some(Simulation::Independent),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Simulation::Linear => "linear",
            Simulation::Sine => "sine",
            Simulation::Ellipse => "ellipse",
            Simulation::Diamond => "diamond",
            Simulation::MultiplicativeNoise => "multi_noise",
            Simulation::Independent => "independent",
        }
    }
}

fn uniform<R: Rng + ?Sized>(n: usize, d: usize, rng: &mut R) -> DenseMatrix {
    DenseMatrix::from_fn(n, d, |_, _| rng.gen_range(-1.0..=1.0))
}

fn gaussian<R: Rng + ?Sized>(n: usize, d: usize, scale: f64, rng: &mut R) -> Result<DenseMatrix> {
    let normal = Normal::new(0.0, 1.0)?;
    Ok(DenseMatrix::from_fn(n, d, |_, _| {
        scale * rand::distributions::Distribution::sample(&normal, rng)
    }))
}

impl<R: Rng + ?Sized> Simulator<R> for Simulation {
    fn generate(
        &self,
        n_samples: usize,
        n_dimensions: usize,
        args: &SimulationArgs,
        rng: &mut R,
    ) -> Result<(DenseMatrix, DenseMatrix)> {
        if n_samples == 0 || n_dimensions == 0 {
            bail!(
                "{}: need at least one sample and one dimension (got {} x {})",
                self.name(),
                n_samples,
                n_dimensions
            );
        }
        let (n, d) = (n_samples, n_dimensions);
        let noise = args.noise();

        match self {
            Simulation::Linear => {
                let x = uniform(n, d, rng);
                let w = DenseMatrix::from_fn(d, 1, |j, _| 1.0 / (j + 1) as f64);
                let eps = gaussian(n, 1, noise, rng)?;
                let y = DenseMatrix::from_fn(n, 1, |i, _| {
                    (0..d).map(|j| x.get(i, j) * w.get(j, 0)).sum::<f64>() + eps.get(i, 0)
                });
                Ok((x, y))
            }
            Simulation::Sine => {
                let period = args.period().unwrap_or(4.0 * PI);
                let x = uniform(n, d, rng);
                let eps = gaussian(n, d, noise, rng)?;
                let y = DenseMatrix::from_fn(n, d, |i, j| (period * x.get(i, j)).sin() + eps.get(i, j));
                Ok((x, y))
            }
            Simulation::Ellipse => {
                let radius = args.radius().unwrap_or(1.0);
                let u = uniform(n, d, rng);
                let eps = gaussian(n, d, noise, rng)?;
                let x = u.map(|v| radius * (PI * v).cos());
                let y = DenseMatrix::from_fn(n, d, |i, j| {
                    radius * (PI * u.get(i, j)).sin() + eps.get(i, j)
                });
                Ok((x, y))
            }
            Simulation::Diamond => {
                let theta = args.period().unwrap_or(-PI / 4.0);
                let (s, c) = theta.sin_cos();
                let u = uniform(n, d, rng);
                let v = uniform(n, d, rng);
                let eps = gaussian(n, d, noise, rng)?;
                let x = DenseMatrix::from_fn(n, d, |i, j| u.get(i, j) * c + v.get(i, j) * s);
                let y = DenseMatrix::from_fn(n, d, |i, j| {
                    -u.get(i, j) * s + v.get(i, j) * c + eps.get(i, j)
                });
                Ok((x, y))
            }
            Simulation::MultiplicativeNoise => {
                let x = gaussian(n, d, 1.0, rng)?;
                let e = gaussian(n, d, 1.0, rng)?;
                let y = DenseMatrix::from_fn(n, d, |i, j| x.get(i, j) * e.get(i, j));
                Ok((x, y))
            }
            Simulation::Independent => {
                let x = gaussian(n, d, 1.0, rng)?;
                let y = gaussian(n, d, 1.0, rng)?;
                Ok((x, y))
            }
        }
    }
}
