//! Mixed-effects models as an external capability
//!
//! Estimating variance components is the job of a dedicated solver. This
//! module only fixes the interface such a solver provides and the workflow
//! for comparing two mixed models: refit both with full maximum likelihood,
//! then run a likelihood-ratio test.

use tracing::info;

use crate::comparison::{likelihood_ratio_test, ComparisonResult, EstimationMethod, ModelLikelihood};
use crate::data::Dataset;
use crate::design::Formula;
use crate::errors::{StatsError, StatsResult};

/// Estimates for one random-effect term
#[derive(Debug, Clone, PartialEq)]
pub struct RandomEffectEstimate {
    /// Term as written in the formula, e.g. `(1 | subject)`
    pub term: String,
    /// Estimated variance of each effect in the term (intercept first)
    pub variances: Vec<f64>,
    /// Conditional modes per group level: `(level, one value per effect)`
    pub conditional_modes: Vec<(String, Vec<f64>)>,
}

impl RandomEffectEstimate {
    /// Standard deviations of the effects in this term
    pub fn std_devs(&self) -> Vec<f64> {
        self.variances.iter().map(|v| v.sqrt()).collect()
    }
}

/// What a mixed-model solver reports for one fit
#[derive(Debug, Clone, PartialEq)]
pub struct MixedFit {
    pub likelihood: ModelLikelihood,
    /// Fixed-effect estimates by design column name
    pub fixed_effects: Vec<(String, f64)>,
    pub random_effects: Vec<RandomEffectEstimate>,
    /// Residual variance
    pub residual_variance: f64,
}

/// A solver for linear mixed-effects models
pub trait MixedModelSolver {
    /// Fit `formula` (which may contain random-effect terms) to `data`
    fn fit(&self, formula: &Formula, data: &Dataset, method: EstimationMethod)
        -> StatsResult<MixedFit>;
}

/// Compare two nested mixed models with a likelihood-ratio test
///
/// Both formulas are refitted with [`EstimationMethod::Ml`], since REML
/// likelihoods of models with different fixed effects are not comparable.
pub fn compare_mixed_models<S: MixedModelSolver + ?Sized>(
    solver: &S,
    full: &Formula,
    reduced: &Formula,
    data: &Dataset,
) -> StatsResult<ComparisonResult> {
    if full.response() != reduced.response() {
        return Err(StatsError::InvalidComparison(format!(
            "models have different responses ('{}' vs '{}')",
            full.response(),
            reduced.response()
        )));
    }

    info!(full = %full, reduced = %reduced, "refitting with ML for likelihood-ratio test");
    let full_fit = solver.fit(full, data, EstimationMethod::Ml)?;
    let reduced_fit = solver.fit(reduced, data, EstimationMethod::Ml)?;

    if full_fit.likelihood.method != EstimationMethod::Ml
        || reduced_fit.likelihood.method != EstimationMethod::Ml
    {
        return Err(StatsError::InvalidComparison(
            "solver did not honour the ML refit request".into(),
        ));
    }

    likelihood_ratio_test(&full_fit.likelihood, &reduced_fit.likelihood)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Returns canned likelihoods keyed by the number of fixed terms
    struct StubSolver {
        calls: RefCell<Vec<EstimationMethod>>,
    }

    impl MixedModelSolver for StubSolver {
        fn fit(
            &self,
            formula: &Formula,
            data: &Dataset,
            method: EstimationMethod,
        ) -> StatsResult<MixedFit> {
            self.calls.borrow_mut().push(method);
            let n_fixed = formula.fixed_terms().len();
            let random: Vec<String> = formula.random_terms().iter().map(|t| t.to_string()).collect();
            let mut fixed = vec!["(Intercept)".to_string()];
            fixed.extend(formula.fixed_terms().iter().cloned());

            let log_likelihood = match n_fixed {
                2 => -396.7,
                _ => -403.0,
            };
            Ok(MixedFit {
                likelihood: ModelLikelihood::new(
                    log_likelihood,
                    fixed.len() + random.len() + 1,
                    data.n_rows(),
                )
                .with_fixed_terms(&fixed)
                .with_random_terms(&random)
                .with_method(method),
                fixed_effects: fixed.iter().map(|t| (t.clone(), 0.0)).collect(),
                random_effects: Vec::new(),
                residual_variance: 1.0,
            })
        }
    }

    fn data() -> Dataset {
        Dataset::new()
            .with_numeric("frequency", vec![213.3, 204.5, 285.1, 259.7])
            .unwrap()
            .with_categorical("attitude", &["pol", "inf", "pol", "inf"])
            .unwrap()
            .with_categorical("gender", &["F", "F", "M", "M"])
            .unwrap()
            .with_categorical("subject", &["F1", "F1", "M3", "M3"])
            .unwrap()
    }

    #[test]
    fn test_compare_refits_with_ml() {
        let solver = StubSolver {
            calls: RefCell::new(Vec::new()),
        };
        let full = Formula::parse("frequency ~ attitude + gender + (1 | subject)").unwrap();
        let reduced = full.without_term("attitude").unwrap();

        let result = compare_mixed_models(&solver, &full, &reduced, &data()).unwrap();

        assert_eq!(*solver.calls.borrow(), vec![EstimationMethod::Ml, EstimationMethod::Ml]);
        assert_eq!(result.df, 1);
        assert!((result.statistic - 12.6).abs() < 1e-9);
        assert!(result.p_value < 0.001);
    }

    #[test]
    fn test_different_responses_are_rejected() {
        let solver = StubSolver {
            calls: RefCell::new(Vec::new()),
        };
        let full = Formula::parse("frequency ~ attitude + (1 | subject)").unwrap();
        let reduced = Formula::parse("pitch ~ 1 + (1 | subject)").unwrap();
        let result = compare_mixed_models(&solver, &full, &reduced, &data());
        assert!(matches!(result, Err(StatsError::InvalidComparison(_))));
        assert!(solver.calls.borrow().is_empty());
    }

    #[test]
    fn test_random_effect_std_devs() {
        let estimate = RandomEffectEstimate {
            term: "(1 | subject)".into(),
            variances: vec![4.0, 0.25],
            conditional_modes: Vec::new(),
        };
        assert_eq!(estimate.std_devs(), vec![2.0, 0.5]);
    }
}
