//! Compare two nested OLS models with a likelihood-ratio test.
//!
//! lmstats compare --data ... --full "pitch ~ sex + age" --reduced "pitch ~ age"

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;

use lmstats_core::{compare_fits, fit_formula, Formula};

use super::DataArgs;
use crate::report;

#[derive(Args)]
pub struct CompareArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Formula of the full model
    #[arg(long)]
    full: String,

    /// Formula of the reduced model (its terms must be a subset of the full model's)
    #[arg(long)]
    reduced: String,
}

pub fn run(args: CompareArgs) -> Result<()> {
    let full = Formula::parse(&args.full)
        .with_context(|| format!("Invalid full formula '{}'", args.full))?;
    let reduced = Formula::parse(&args.reduced)
        .with_context(|| format!("Invalid reduced formula '{}'", args.reduced))?;
    if full.response() != reduced.response() {
        bail!(
            "Models have different responses ('{}' vs '{}')",
            full.response(),
            reduced.response()
        );
    }

    // Both models must see the same rows, so drop missing values over the
    // columns either formula uses before fitting
    let data = args.data.load()?;
    let mut columns = full.referenced_columns();
    for column in reduced.referenced_columns() {
        if !columns.contains(&column) {
            columns.push(column);
        }
    }
    let data = data.drop_missing(&columns)?;
    info!(rows = data.n_rows(), "complete cases for comparison");

    let options = args.data.options()?;
    let full_fit = fit_formula(&full, &data, &options)
        .with_context(|| format!("Failed to fit full model '{}'", full))?;
    let reduced_fit = fit_formula(&reduced, &data, &options)
        .with_context(|| format!("Failed to fit reduced model '{}'", reduced))?;

    let result = compare_fits(&full_fit, &reduced_fit).context("Likelihood-ratio test failed")?;
    let (full, reduced) = (full.to_string(), reduced.to_string());
    print!("{}", report::ComparisonSummary::new(&full, &reduced, &result));

    Ok(())
}
