//! Likelihood-ratio test for nested models
//!
//! χ² = 2 (ℓ_full − ℓ_reduced) with k_full − k_reduced degrees of freedom.

use statrs::distribution::{ChiSquared, ContinuousCDF};
use tracing::{debug, warn};

use crate::errors::{StatsError, StatsResult};
use crate::types::FitResult;

/// Relative size below which a negative statistic is treated as rounding noise
const NEGATIVE_STATISTIC_TOLERANCE: f64 = 1e-8;

/// Criterion a model was fitted under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EstimationMethod {
    /// Full maximum likelihood
    #[default]
    Ml,
    /// Restricted (residual) maximum likelihood
    Reml,
}

/// The likelihood summary of one fitted model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelLikelihood {
    /// Maximized log-likelihood
    pub log_likelihood: f64,
    /// Number of estimated parameters, variance parameters included
    pub n_params: usize,
    /// Number of observations the model was fitted on
    pub n_observations: usize,
    /// Name of the response variable, when known
    pub response: Option<String>,
    /// Fixed-effect terms (design column names); empty when unknown
    pub fixed_terms: Vec<String>,
    /// Random-effect terms; empty for models without random effects
    pub random_terms: Vec<String>,
    pub method: EstimationMethod,
}

impl ModelLikelihood {
    /// A likelihood summary without term information
    ///
    /// Term-level nesting cannot be checked for such a summary; only the
    /// parameter counts are compared.
    pub fn new(log_likelihood: f64, n_params: usize, n_observations: usize) -> Self {
        Self {
            log_likelihood,
            n_params,
            n_observations,
            response: None,
            fixed_terms: Vec::new(),
            random_terms: Vec::new(),
            method: EstimationMethod::Ml,
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }

    pub fn with_fixed_terms<S: AsRef<str>>(mut self, terms: &[S]) -> Self {
        self.fixed_terms = terms.iter().map(|t| t.as_ref().to_string()).collect();
        self
    }

    pub fn with_random_terms<S: AsRef<str>>(mut self, terms: &[S]) -> Self {
        self.random_terms = terms.iter().map(|t| t.as_ref().to_string()).collect();
        self
    }

    pub fn with_method(mut self, method: EstimationMethod) -> Self {
        self.method = method;
        self
    }

    fn has_terms(&self) -> bool {
        !self.fixed_terms.is_empty() || !self.random_terms.is_empty()
    }
}

impl FitResult {
    /// Likelihood summary of an OLS fit (ML, coefficients + residual variance)
    pub fn likelihood(&self) -> ModelLikelihood {
        let likelihood = ModelLikelihood::new(
            self.diagnostics.log_likelihood,
            self.n_likelihood_params(),
            self.core.n_observations,
        )
        .with_fixed_terms(&self.terms);
        match &self.response {
            Some(response) => likelihood.with_response(response.as_str()),
            None => likelihood,
        }
    }
}

/// Result of a likelihood-ratio comparison
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    /// Chi-square statistic 2 (ℓ_full − ℓ_reduced)
    pub statistic: f64,
    /// Degrees of freedom (difference in parameter counts)
    pub df: usize,
    /// Upper-tail probability of χ²(df) at the statistic
    pub p_value: f64,
    pub full_log_likelihood: f64,
    pub reduced_log_likelihood: f64,
    pub full_params: usize,
    pub reduced_params: usize,
}

/// Likelihood-ratio test of a reduced model against a full model nesting it
pub fn likelihood_ratio_test(
    full: &ModelLikelihood,
    reduced: &ModelLikelihood,
) -> StatsResult<ComparisonResult> {
    if let (Some(a), Some(b)) = (&full.response, &reduced.response) {
        if a != b {
            return Err(StatsError::InvalidComparison(format!(
                "models have different responses ('{}' vs '{}')",
                a, b
            )));
        }
    }
    check_nested(full, reduced)?;

    if full.n_observations != reduced.n_observations {
        return Err(StatsError::InvalidComparison(format!(
            "models were fitted on different observation counts ({} vs {})",
            full.n_observations, reduced.n_observations
        )));
    }
    if full.method != reduced.method {
        return Err(StatsError::InvalidComparison(
            "cannot compare an ML fit with a REML fit".into(),
        ));
    }
    if full.method == EstimationMethod::Reml && !same_terms(&full.fixed_terms, &reduced.fixed_terms)
    {
        return Err(StatsError::InvalidComparison(
            "REML likelihoods are not comparable across different fixed effects; refit with ML"
                .into(),
        ));
    }
    if !full.log_likelihood.is_finite() || !reduced.log_likelihood.is_finite() {
        return Err(StatsError::InvalidComparison(format!(
            "non-finite log-likelihood (full {}, reduced {})",
            full.log_likelihood, reduced.log_likelihood
        )));
    }

    let mut statistic = 2.0 * (full.log_likelihood - reduced.log_likelihood);
    if statistic < 0.0 {
        let scale = 1.0_f64
            .max(full.log_likelihood.abs())
            .max(reduced.log_likelihood.abs());
        if statistic < -NEGATIVE_STATISTIC_TOLERANCE * scale {
            return Err(StatsError::InvalidComparison(format!(
                "negative chi-square statistic {:.6}: the full model fits worse than the reduced model",
                statistic
            )));
        }
        warn!(statistic, "clamping negative chi-square rounding noise to zero");
        statistic = 0.0;
    }

    let df = full.n_params - reduced.n_params;
    let chi2 = ChiSquared::new(df as f64).map_err(|e| StatsError::Distribution(e.to_string()))?;
    let p_value = chi2.sf(statistic).clamp(0.0, 1.0);

    debug!(statistic, df, p_value, "likelihood-ratio test");

    Ok(ComparisonResult {
        statistic,
        df,
        p_value,
        full_log_likelihood: full.log_likelihood,
        reduced_log_likelihood: reduced.log_likelihood,
        full_params: full.n_params,
        reduced_params: reduced.n_params,
    })
}

/// Likelihood-ratio test between two OLS fits on the same observations
pub fn compare_fits(full: &FitResult, reduced: &FitResult) -> StatsResult<ComparisonResult> {
    likelihood_ratio_test(&full.likelihood(), &reduced.likelihood())
}

fn check_nested(full: &ModelLikelihood, reduced: &ModelLikelihood) -> StatsResult<()> {
    if full.n_params <= reduced.n_params {
        return Err(StatsError::NotNested(format!(
            "full model has {} parameters, reduced model has {}",
            full.n_params, reduced.n_params
        )));
    }

    if full.has_terms() || reduced.has_terms() {
        let missing = reduced
            .fixed_terms
            .iter()
            .filter(|t| !full.fixed_terms.contains(t))
            .chain(
                reduced
                    .random_terms
                    .iter()
                    .filter(|t| !full.random_terms.contains(t)),
            )
            .cloned()
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(StatsError::NotNested(format!(
                "reduced model terms {:?} are absent from the full model",
                missing
            )));
        }
    }
    Ok(())
}

fn same_terms(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && a.iter().all(|t| b.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_lrt() {
        let full = ModelLikelihood::new(-100.0, 4, 50);
        let reduced = ModelLikelihood::new(-103.0, 3, 50);
        let result = likelihood_ratio_test(&full, &reduced).unwrap();

        assert!((result.statistic - 6.0).abs() < 1e-12);
        assert_eq!(result.df, 1);
        // P(chi2_1 > 6) = 0.01430588
        assert!((result.p_value - 0.014306).abs() < 1e-5);
    }

    #[test]
    fn test_identical_likelihoods_give_p_one() {
        let full = ModelLikelihood::new(-50.0, 3, 20);
        let reduced = ModelLikelihood::new(-50.0, 2, 20);
        let result = likelihood_ratio_test(&full, &reduced).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert!((result.p_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rounding_noise_is_clamped() {
        let full = ModelLikelihood::new(-1000.0 - 1e-9, 3, 20);
        let reduced = ModelLikelihood::new(-1000.0, 2, 20);
        let result = likelihood_ratio_test(&full, &reduced).unwrap();
        assert_eq!(result.statistic, 0.0);
    }

    #[test]
    fn test_negative_statistic_is_invalid() {
        let full = ModelLikelihood::new(-110.0, 4, 50);
        let reduced = ModelLikelihood::new(-100.0, 3, 50);
        let result = likelihood_ratio_test(&full, &reduced);
        assert!(matches!(result, Err(StatsError::InvalidComparison(_))));
    }

    #[test]
    fn test_different_responses_are_invalid() {
        let full = ModelLikelihood::new(-100.0, 4, 50).with_response("pitch");
        let reduced = ModelLikelihood::new(-130.0, 3, 50).with_response("age");
        assert!(matches!(
            likelihood_ratio_test(&full, &reduced),
            Err(StatsError::InvalidComparison(_))
        ));

        // An unnamed response is not checked
        let unnamed = ModelLikelihood::new(-130.0, 3, 50);
        assert!(likelihood_ratio_test(&full, &unnamed).is_ok());
    }

    #[test]
    fn test_parameter_counts_must_increase() {
        let full = ModelLikelihood::new(-100.0, 3, 50);
        let reduced = ModelLikelihood::new(-103.0, 3, 50);
        assert!(matches!(
            likelihood_ratio_test(&full, &reduced),
            Err(StatsError::NotNested(_))
        ));
    }

    #[test]
    fn test_reduced_terms_must_be_subset() {
        let full = ModelLikelihood::new(-100.0, 4, 50).with_fixed_terms(&["(Intercept)", "age"]);
        let reduced = ModelLikelihood::new(-103.0, 3, 50).with_fixed_terms(&["(Intercept)", "sexmale"]);
        assert!(matches!(
            likelihood_ratio_test(&full, &reduced),
            Err(StatsError::NotNested(_))
        ));
    }

    #[test]
    fn test_reml_with_different_fixed_effects_is_invalid() {
        let full = ModelLikelihood::new(-100.0, 5, 84)
            .with_fixed_terms(&["(Intercept)", "attitudepol", "gendermale"])
            .with_random_terms(&["(1 | subject)"])
            .with_method(EstimationMethod::Reml);
        let reduced = ModelLikelihood::new(-103.0, 4, 84)
            .with_fixed_terms(&["(Intercept)", "gendermale"])
            .with_random_terms(&["(1 | subject)"])
            .with_method(EstimationMethod::Reml);
        assert!(matches!(
            likelihood_ratio_test(&full, &reduced),
            Err(StatsError::InvalidComparison(_))
        ));
    }

    #[test]
    fn test_reml_random_effect_comparison_is_allowed() {
        let full = ModelLikelihood::new(-100.0, 5, 84)
            .with_fixed_terms(&["(Intercept)", "gendermale"])
            .with_random_terms(&["(1 | subject)", "(1 | scenario)"])
            .with_method(EstimationMethod::Reml);
        let reduced = ModelLikelihood::new(-104.0, 4, 84)
            .with_fixed_terms(&["(Intercept)", "gendermale"])
            .with_random_terms(&["(1 | subject)"])
            .with_method(EstimationMethod::Reml);
        let result = likelihood_ratio_test(&full, &reduced).unwrap();
        assert_eq!(result.df, 1);
    }

    #[test]
    fn test_mixed_methods_are_invalid() {
        let full = ModelLikelihood::new(-100.0, 4, 50).with_method(EstimationMethod::Reml);
        let reduced = ModelLikelihood::new(-103.0, 3, 50);
        assert!(matches!(
            likelihood_ratio_test(&full, &reduced),
            Err(StatsError::InvalidComparison(_))
        ));
    }

    #[test]
    fn test_different_observation_counts_are_invalid() {
        let full = ModelLikelihood::new(-100.0, 4, 50);
        let reduced = ModelLikelihood::new(-103.0, 3, 49);
        assert!(matches!(
            likelihood_ratio_test(&full, &reduced),
            Err(StatsError::InvalidComparison(_))
        ));
    }

    #[test]
    fn test_non_finite_likelihood_is_invalid() {
        let full = ModelLikelihood::new(f64::INFINITY, 4, 50);
        let reduced = ModelLikelihood::new(-103.0, 3, 50);
        assert!(matches!(
            likelihood_ratio_test(&full, &reduced),
            Err(StatsError::InvalidComparison(_))
        ));
    }
}
