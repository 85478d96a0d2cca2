//! Power estimation on simulated samples.
//!
//! permtest power --test dcorr --simulation linear --samples ... --dimensions ...

use anyhow::Result;
use clap::Args;
use tracing::info;

use permtest_core::independence::DistanceCorrelation;
use permtest_core::power::PowerEstimator;
use permtest_core::simulation::{Simulation, SimulationArgs};
use permtest_linalg::DistanceMetric;

use super::{make_rng, print_power, write_json};

#[derive(Args)]
pub struct PowerArgs {
    /// Independence test (dcorr)
    #[arg(long, default_value = "dcorr")]
    test: String,

    /// Distance metric used by the test
    #[arg(long, default_value = "euclidean")]
    metric: String,

    /// Simulation: linear, sine, ellipse, diamond, multi_noise or independent
    #[arg(long)]
    simulation: String,

    /// Simulation tag selecting extra arguments (defaults to --simulation)
    #[arg(long)]
    simulation_type: Option<String>,

    /// Samples per repetition
    #[arg(long)]
    samples: usize,

    /// Dimensions per sample
    #[arg(long, default_value = "1")]
    dimensions: usize,

    /// Noise level
    #[arg(long, default_value = "1.0")]
    noise: f64,

    /// Number of repetitions
    #[arg(long, default_value = "1000")]
    repeats: usize,

    /// Type I error level
    #[arg(long, default_value = "0.05")]
    alpha: f64,

    /// Random seed (entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Emit the estimate as JSON
    #[arg(long, default_value = "false")]
    json: bool,

    /// Output file for JSON (stdout when omitted)
    #[arg(long)]
    output: Option<String>,
}

pub fn run(args: PowerArgs) -> Result<()> {
    let simulation = Simulation::from_name(&args.simulation.to_lowercase())
        .ok_or_else(|| anyhow::anyhow!("Unknown simulation: {}", args.simulation))?;
    let tag = args
        .simulation_type
        .clone()
        .unwrap_or_else(|| args.simulation.to_lowercase());
    let sim_args = SimulationArgs::from_tag(&tag, args.noise);
    let metric: DistanceMetric = args.metric.parse()?;

    info!("=== Power estimation ===");
    info!("Simulation: {} ({:?})", simulation.name(), sim_args);
    info!(
        "n = {}, d = {}, repeats = {}, alpha = {}",
        args.samples, args.dimensions, args.repeats, args.alpha
    );

    let estimator = PowerEstimator::new(args.repeats, args.alpha)?;
    let mut rng = make_rng(args.seed);

    let estimate = match args.test.to_lowercase().as_str() {
        "dcorr" => estimator.power(
            &DistanceCorrelation { metric },
            &simulation,
            args.samples,
            args.dimensions,
            &sim_args,
            &mut rng,
        )?,
        _ => anyhow::bail!("Unknown independence test: {}", args.test),
    };

    if args.json {
        return write_json(&estimate, args.output.as_deref());
    }
    print_power(&estimate, args.alpha);
    Ok(())
}
