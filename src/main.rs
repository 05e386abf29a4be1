//! modelsweep - Main entry point

use clap::Parser;
use modelsweep::cli::{cmd_sweep, Cli, Commands};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "modelsweep=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sweep {
            data,
            target,
            features,
            out,
            max_features,
            test_fractions,
            seed,
            sample_cap,
            top_n,
            fail_fast,
            threads,
        } => {
            cmd_sweep(
                &data,
                &target,
                features,
                &out,
                max_features,
                test_fractions,
                seed,
                sample_cap,
                top_n,
                fail_fast,
                threads,
            )?;
        }
    }

    Ok(())
}
