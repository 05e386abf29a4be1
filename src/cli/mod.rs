//! Command-line interface for running sweeps

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use crate::config::SweepConfig;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::sweep::SweepRunner;

#[derive(Parser)]
#[command(name = "modelsweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Exhaustive feature-combination regression search")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a full sweep over a CSV dataset and persist the result store
    Sweep {
        /// Input CSV file
        #[arg(short, long)]
        data: PathBuf,

        /// Target column name
        #[arg(short, long)]
        target: String,

        /// Comma-separated candidate feature columns
        #[arg(short, long, value_delimiter = ',')]
        features: Vec<String>,

        /// Output directory for the result store
        #[arg(short, long)]
        out: PathBuf,

        /// Maximum feature subset size
        #[arg(long, default_value = "4")]
        max_features: usize,

        /// Comma-separated test fractions
        #[arg(long, value_delimiter = ',', default_value = "0.4,0.3,0.2,0.1")]
        test_fractions: Vec<f64>,

        /// Random seed shared by splitting and sampling
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Maximum prediction points sampled per model
        #[arg(long, default_value = "1000")]
        sample_cap: usize,

        /// Number of models in the top-models document
        #[arg(long, default_value = "10")]
        top_n: usize,

        /// Abort on the first failing evaluation instead of skipping
        #[arg(long)]
        fail_fast: bool,

        /// Worker thread count (default: all cores)
        #[arg(long)]
        threads: Option<usize>,
    },
}

/// Run a sweep and print a compact top-10 report
#[allow(clippy::too_many_arguments)]
pub fn cmd_sweep(
    data: &PathBuf,
    target: &str,
    features: Vec<String>,
    out: &PathBuf,
    max_features: usize,
    test_fractions: Vec<f64>,
    seed: u64,
    sample_cap: usize,
    top_n: usize,
    fail_fast: bool,
    threads: Option<usize>,
) -> Result<()> {
    let start = Instant::now();

    let dataset = Dataset::from_csv_path(data, target)?;
    println!(
        "Loaded {} rows from {} (target: {target})",
        dataset.n_rows(),
        data.display()
    );

    let mut config = SweepConfig::new(target, features)
        .with_max_subset_size(max_features)
        .with_test_fractions(test_fractions)
        .with_seed(seed)
        .with_sample_cap(sample_cap)
        .with_top_n(top_n)
        .with_fail_fast(fail_fast);
    if let Some(n) = threads {
        config = config.with_threads(n);
    }

    let runner = SweepRunner::new(config)?;
    let report = runner.run(&dataset, out)?;

    println!("\nTop models by R²:");
    for (rank, result) in report.ranked.top_n(10).iter().enumerate() {
        println!(
            "{:>2}. r2={:.4} rmse={:.2} split={} features=[{}]",
            rank + 1,
            result.r2,
            result.rmse,
            result.split.label(),
            result.feature_list()
        );
    }

    println!(
        "\n{} models evaluated ({} skipped), {} prediction records written to {}",
        report.ranked.len(),
        report.n_skipped,
        report.n_records,
        out.display()
    );
    println!("Done in {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}
