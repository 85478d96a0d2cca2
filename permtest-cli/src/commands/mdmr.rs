//! Multivariate distance matrix regression.
//!
//! permtest mdmr --design ... (--distances ... | --outcomes ...) --permutations ...

use std::path::Path;

use anyhow::Result;
use clap::Args;
use tracing::info;

use permtest_core::mdmr::{DistanceColumns, Mdmr, MdmrConfig};
use permtest_data::text::{read_matrix_txt, write_matrix_txt};
use permtest_linalg::{DenseMatrix, DistanceMetric};

use super::{make_rng, write_json};

#[derive(Args)]
pub struct MdmrArgs {
    /// Design matrix (subjects x predictors, no intercept column)
    #[arg(long)]
    design: String,

    /// Square distance matrix, or one row of condensed pairwise distances
    #[arg(long, conflicts_with = "outcomes")]
    distances: Option<String>,

    /// Outcome matrix (subjects x variables); distances are computed with --metric
    #[arg(long)]
    outcomes: Option<String>,

    /// Distance metric for --outcomes: euclidean, sqeuclidean or cityblock
    #[arg(long, default_value = "euclidean")]
    metric: String,

    /// Random permutations per predictor column
    #[arg(long, default_value = "100")]
    permutations: usize,

    /// Random seed (entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Output file (stdout when omitted)
    #[arg(long)]
    output: Option<String>,

    /// Emit the results table as JSON
    #[arg(long, default_value = "false")]
    json: bool,
}

/// Interpret a distances file: square matrix or a single condensed row / column.
fn load_distances(path: &str) -> Result<DistanceColumns> {
    let m = read_matrix_txt(Path::new(path))?;
    let columns = if m.is_square() && m.nrows() > 1 {
        DistanceColumns::from_distance_matrices(&[m])?
    } else if m.nrows() == 1 {
        DistanceColumns::from_condensed(&m.row(0))?
    } else if m.ncols() == 1 {
        DistanceColumns::from_condensed(&m.col(0))?
    } else {
        anyhow::bail!(
            "{}: expected a square distance matrix or condensed distances, got {} x {}",
            path,
            m.nrows(),
            m.ncols()
        );
    };
    Ok(columns)
}

pub fn run(args: MdmrArgs) -> Result<()> {
    info!("=== MDMR ===");
    info!("Design file: {}", args.design);

    let design: DenseMatrix = read_matrix_txt(Path::new(&args.design))?;
    info!(
        "Loaded design: {} subjects x {} predictors",
        design.nrows(),
        design.ncols()
    );

    let distances = if let Some(ref path) = args.distances {
        info!("Distance file: {}", path);
        load_distances(path)?
    } else if let Some(ref path) = args.outcomes {
        let metric: DistanceMetric = args.metric.parse()?;
        info!("Outcome file: {} (metric {})", path, args.metric);
        let outcomes = read_matrix_txt(Path::new(path))?;
        DistanceColumns::from_outcomes(&[outcomes], metric)?
    } else {
        anyhow::bail!("Must specify --distances or --outcomes");
    };

    let mut rng = make_rng(args.seed);
    let table = Mdmr::new(MdmrConfig {
        permutations: args.permutations,
    })
    .run(&distances, &design, &mut rng)?;

    if args.json {
        return write_json(&table, args.output.as_deref());
    }

    match args.output {
        Some(ref path) => {
            write_matrix_txt(
                &table.to_matrix(),
                Some(&["column", "F", "p"]),
                Path::new(path),
            )?;
            info!("Results written to {}", path);
        }
        None => {
            println!("column\tF\tp");
            for row in &table.rows {
                println!("{}\t{:.6}\t{}", row.column, row.f_statistic, row.p_value);
            }
        }
    }
    Ok(())
}
