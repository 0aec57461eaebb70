use std::collections::HashMap;

use faer::Mat;

use crate::design::ReferenceLevel;

/// Core result from model fitting
#[derive(Debug, Clone)]
pub struct FitResultCore {
    /// Regression coefficients, one per design column (intercept first if present)
    pub coefficients: Vec<f64>,
    /// Fitted values X·β
    pub fitted_values: Vec<f64>,
    /// Residuals y − X·β
    pub residuals: Vec<f64>,
    /// R-squared (coefficient of determination)
    pub r_squared: f64,
    /// Adjusted R-squared
    pub adj_r_squared: f64,
    /// Residual standard error
    pub residual_std_error: f64,
    /// Residual sum of squares
    pub rss: f64,
    /// Total sum of squares (about the mean when the model has an intercept)
    pub tss: f64,
    /// Number of observations used
    pub n_observations: usize,
    /// Number of design columns (including intercept)
    pub n_params: usize,
    /// Residual degrees of freedom (n − p)
    pub df_residual: usize,
}

/// Coefficient inference
#[derive(Debug, Clone)]
pub struct FitResultInference {
    /// Standard errors of coefficients
    pub std_errors: Vec<f64>,
    /// t-statistics for coefficients
    pub t_values: Vec<f64>,
    /// Two-sided p-values for coefficients
    pub p_values: Vec<f64>,
    /// Lower bound of confidence intervals
    pub ci_lower: Vec<f64>,
    /// Upper bound of confidence intervals
    pub ci_upper: Vec<f64>,
    /// Confidence level used (e.g., 0.95)
    pub confidence_level: f64,
    /// F-statistic for overall model significance (None for intercept-only models)
    pub f_statistic: Option<f64>,
    /// p-value for F-statistic
    pub f_pvalue: Option<f64>,
    /// Model degrees of freedom (numerator df of the F-test)
    pub df_model: usize,
    /// (XᵀX)⁻¹, the coefficient covariance before scaling by σ̂²
    pub unscaled_covariance: Mat<f64>,
}

/// Likelihood-based diagnostics
#[derive(Debug, Clone)]
pub struct FitResultDiagnostics {
    /// Gaussian maximum log-likelihood
    pub log_likelihood: f64,
    /// AIC (Akaike Information Criterion)
    pub aic: f64,
    /// BIC (Bayesian Information Criterion)
    pub bic: f64,
}

/// Combined fit result
#[derive(Debug, Clone)]
pub struct FitResult {
    /// Name of the response variable (set when fitted from a formula)
    pub response: Option<String>,
    /// Design column names, aligned with the coefficient vector
    pub terms: Vec<String>,
    /// Whether the first design column is the intercept
    pub has_intercept: bool,
    /// Reference level of each categorical predictor
    pub reference_levels: Vec<(String, String)>,
    pub core: FitResultCore,
    pub inference: FitResultInference,
    pub diagnostics: FitResultDiagnostics,
}

impl FitResult {
    /// Index of a design column by name
    pub fn term_index(&self, name: &str) -> Option<usize> {
        self.terms.iter().position(|t| t == name)
    }

    /// Estimated coefficient of a design column by name
    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.term_index(name).map(|i| self.core.coefficients[i])
    }

    /// Number of estimated parameters for likelihood purposes
    /// (coefficients plus the residual variance)
    pub fn n_likelihood_params(&self) -> usize {
        self.core.n_params + 1
    }

    /// One row per coefficient, in design order
    pub fn coefficient_table(&self) -> Vec<CoefficientRow> {
        self.terms
            .iter()
            .enumerate()
            .map(|(i, term)| CoefficientRow {
                term: term.clone(),
                estimate: self.core.coefficients[i],
                std_error: self.inference.std_errors[i],
                t_value: self.inference.t_values[i],
                p_value: self.inference.p_values[i],
                ci_lower: self.inference.ci_lower[i],
                ci_upper: self.inference.ci_upper[i],
            })
            .collect()
    }
}

/// A single line of a coefficient table
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientRow {
    pub term: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t_value: f64,
    pub p_value: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

/// Options for OLS fitting
#[derive(Debug, Clone)]
pub struct OlsOptions {
    /// Confidence level for confidence intervals (default: 0.95)
    pub confidence_level: f64,
    /// Reference level per categorical column when fitting from a formula.
    /// Factors without an entry use [`ReferenceLevel::Sorted`].
    pub reference_levels: HashMap<String, ReferenceLevel>,
}

impl Default for OlsOptions {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            reference_levels: HashMap::new(),
        }
    }
}

impl OlsOptions {
    /// Set the reference level of one categorical column
    pub fn with_reference(mut self, column: impl Into<String>, level: ReferenceLevel) -> Self {
        self.reference_levels.insert(column.into(), level);
        self
    }
}
