pub mod mdmr;
pub mod power;
pub mod power_data;

use std::path::Path;

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;

use permtest_core::power::PowerEstimate;

/// Seeded RNG when a seed is given, otherwise seeded from OS entropy.
pub fn make_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => {
            info!("Random seed: {}", seed);
            ChaCha8Rng::seed_from_u64(seed)
        }
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Write `value` as pretty JSON to `output`, or to stdout.
pub fn write_json<T: Serialize>(value: &T, output: Option<&str>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => std::fs::write(Path::new(path), json + "\n")
            .with_context(|| format!("Failed to write {}", path)),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}

pub fn print_power(estimate: &PowerEstimate, alpha: f64) {
    println!("Repeats: {}", estimate.alternative_statistics.len());
    println!("Alpha: {}", alpha);
    println!("Null cutoff: {:.6}", estimate.cutoff);
    println!("Power: {:.4}", estimate.power);
}
