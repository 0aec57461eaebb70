//! lmstats: fit linear models and compare nested models from the command line.
//!
//! CLI entry point using clap for argument parsing.

mod commands;
mod input;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "lmstats",
    version,
    about = "Fit linear models and compare nested models with likelihood-ratio tests",
    long_about = "Fits ordinary least-squares models from delimited data files using\n\
                  R-style formulas, and compares nested models (including mixed models\n\
                  fitted elsewhere) with likelihood-ratio tests."
)]
struct Cli {
    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit an OLS model and print its coefficient table
    Fit(commands::fit::FitArgs),

    /// Fit two nested OLS models and compare them with a likelihood-ratio test
    Compare(commands::compare::CompareArgs),

    /// Likelihood-ratio test from externally computed log-likelihoods
    Lrt(commands::lrt::LrtArgs),
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
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("lmstats v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Fit(args) => commands::fit::run(args),
        Commands::Compare(args) => commands::compare::run(args),
        Commands::Lrt(args) => commands::lrt::run(args),
    }
}
