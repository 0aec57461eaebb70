//! Fit an OLS model from a data file.
//!
//! lmstats fit --data ... --formula "pitch ~ sex" [--reference sex=female]

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use lmstats_core::diagnostics::compute_residuals;
use lmstats_core::{fit_formula, DesignMatrix, Formula};

use super::DataArgs;
use crate::report;

#[derive(Args)]
pub struct FitArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Model formula, e.g. "pitch ~ sex + age"
    #[arg(long)]
    formula: String,

    /// Also print per-observation residual diagnostics
    #[arg(long, default_value = "false")]
    residuals: bool,
}

pub fn run(args: FitArgs) -> Result<()> {
    let data = args.data.load()?;
    let options = args.data.options()?;
    let formula = Formula::parse(&args.formula)
        .with_context(|| format!("Invalid formula '{}'", args.formula))?;
    info!(rows = data.n_rows(), columns = data.n_columns(), "loaded data");

    let fit = fit_formula(&formula, &data, &options)
        .with_context(|| format!("Failed to fit '{}'", formula))?;
    print!("{}", report::FitSummary::new(&formula.to_string(), &fit));

    if args.residuals {
        let complete = data.drop_missing(&formula.referenced_columns())?;
        let design = DesignMatrix::from_formula(&formula, &complete, &options.reference_levels)?;
        let diag = compute_residuals(&fit, &design)?;

        println!();
        println!(
            "{:>6}  {:>12}  {:>12}  {:>12}  {:>12}  {:>8}",
            "row", "fitted", "residual", "std.resid", "stud.resid", "leverage"
        );
        for i in 0..diag.raw.len() {
            println!(
                "{:>6}  {:>12.6}  {:>12.6}  {:>12.6}  {:>12.6}  {:>8.4}",
                i + 1,
                fit.core.fitted_values[i],
                diag.raw[i],
                diag.standardized[i],
                diag.studentized[i],
                diag.leverage[i]
            );
        }
    }

    Ok(())
}
