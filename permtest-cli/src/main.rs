//! permtest: permutation tests for multivariate dependence.
//!
//! CLI entry point using clap for argument parsing.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "permtest",
    version,
    about = "Permutation tests for dependence between multivariate observations",
    long_about = "Multivariate distance matrix regression (MDMR) with permutation p-values,\n\
                   and empirical power estimation for independence tests."
)]
struct Cli {
    /// Number of threads to use
    #[arg(long, default_value = "1", global = true)]
    threads: usize,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Test each design column against distance-matrix outcomes
    Mdmr(commands::mdmr::MdmrArgs),

    /// Estimate the power of an independence test on simulated samples
    Power(commands::power::PowerArgs),

    /// Estimate the power of an independence test on pre-generated samples
    PowerData(commands::power_data::PowerDataArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    // Set up thread pool
    rayon::ThreadPoolBuilder::new()
        .num_threads(cli.threads)
        .build_global()
        .ok();

    tracing::info!("permtest v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Using {} threads", cli.threads);

    match cli.command {
        Commands::Mdmr(args) => commands::mdmr::run(args),
        Commands::Power(args) => commands::power::run(args),
        Commands::PowerData(args) => commands::power_data::run(args),
    }
}
