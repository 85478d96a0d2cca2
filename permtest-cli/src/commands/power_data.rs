//! Power estimation on pre-generated samples.
//!
//! permtest power-data --data-dir ... --simulation-type ... --data-type dimension --dimensions ...

use anyhow::Result;
use clap::Args;
use tracing::info;

use permtest_core::independence::DistanceCorrelation;
use permtest_core::power::PowerEstimator;
use permtest_data::{DataAxis, SampleRepository};
use permtest_linalg::DistanceMetric;

use super::{make_rng, print_power, write_json};

#[derive(Args)]
pub struct PowerDataArgs {
    /// Root directory holding the sample_data_power_* folders
    #[arg(long)]
    data_dir: String,

    /// Simulation type in the file names (type_<sim>_...)
    #[arg(long)]
    simulation_type: String,

    /// Which sweep to read: dimension or sample_size
    #[arg(long, default_value = "dimension")]
    data_type: String,

    /// Sample size key (with --data-type sample_size)
    #[arg(long)]
    samples: Option<usize>,

    /// Dimension key (with --data-type dimension)
    #[arg(long)]
    dimensions: Option<usize>,

    /// Independence test (dcorr)
    #[arg(long, default_value = "dcorr")]
    test: String,

    /// Distance metric used by the test
    #[arg(long, default_value = "euclidean")]
    metric: String,

    /// Number of repetitions (at most the number stored)
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

fn data_axis(args: &PowerDataArgs) -> Result<DataAxis> {
    match args.data_type.to_lowercase().as_str() {
        "dimension" | "dimensions" => args
            .dimensions
            .map(DataAxis::Dimension)
            .ok_or_else(|| anyhow::anyhow!("--data-type dimension needs --dimensions")),
        "sample_size" | "samples" => args
            .samples
            .map(DataAxis::SampleSize)
            .ok_or_else(|| anyhow::anyhow!("--data-type sample_size needs --samples")),
        _ => anyhow::bail!("Unknown data type: {}", args.data_type),
    }
}

pub fn run(args: PowerDataArgs) -> Result<()> {
    let axis = data_axis(&args)?;
    let metric: DistanceMetric = args.metric.parse()?;
    let repository = SampleRepository::new(&args.data_dir);

    info!("=== Power estimation on stored samples ===");
    info!("Data directory: {}", repository.root().display());
    info!("Simulation type: {} ({})", args.simulation_type, axis);

    let estimator = PowerEstimator::new(args.repeats, args.alpha)?;
    let mut rng = make_rng(args.seed);

    let estimate = match args.test.to_lowercase().as_str() {
        "dcorr" => estimator.power_given_data(
            &DistanceCorrelation { metric },
            &repository,
            &args.simulation_type,
            axis,
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
