//! Likelihood-ratio test from log-likelihoods computed elsewhere,
//! e.g. mixed models refitted with ML.
//!
//! lmstats lrt --full-loglik -396.7 --full-params 5 --reduced-loglik -403.0 --reduced-params 4

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};

use lmstats_core::{likelihood_ratio_test, EstimationMethod, ModelLikelihood};

use crate::report;

#[derive(Clone, Copy, ValueEnum)]
enum Method {
    Ml,
    Reml,
}

impl From<Method> for EstimationMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Ml => EstimationMethod::Ml,
            Method::Reml => EstimationMethod::Reml,
        }
    }
}

#[derive(Args)]
pub struct LrtArgs {
    /// Log-likelihood of the full model
    #[arg(long, allow_hyphen_values = true)]
    full_loglik: f64,

    /// Number of estimated parameters in the full model
    #[arg(long)]
    full_params: usize,

    /// Log-likelihood of the reduced model
    #[arg(long, allow_hyphen_values = true)]
    reduced_loglik: f64,

    /// Number of estimated parameters in the reduced model
    #[arg(long)]
    reduced_params: usize,

    /// Number of observations both models were fitted on
    #[arg(long, default_value = "0")]
    n: usize,

    /// Estimation method both likelihoods come from
    #[arg(long, value_enum, default_value = "ml")]
    method: Method,
}

pub fn run(args: LrtArgs) -> Result<()> {
    let method = EstimationMethod::from(args.method);
    let full = ModelLikelihood::new(args.full_loglik, args.full_params, args.n).with_method(method);
    let reduced =
        ModelLikelihood::new(args.reduced_loglik, args.reduced_params, args.n).with_method(method);

    let result = likelihood_ratio_test(&full, &reduced).context("Likelihood-ratio test failed")?;
    print!("{}", report::ComparisonSummary::new("full", "reduced", &result));

    Ok(())
}
