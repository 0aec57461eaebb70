//! Plain-text summaries of fits and comparisons.

use std::fmt;

use lmstats_core::{ComparisonResult, FitResult};

/// Significance code for a p-value, using the usual R cut-offs
fn significance(p: f64) -> &'static str {
    if p < 0.001 {
        "***"
    } else if p < 0.01 {
        "**"
    } else if p < 0.05 {
        "*"
    } else if p < 0.1 {
        "."
    } else {
        ""
    }
}

fn format_p(p: f64) -> String {
    if p < 2e-16 {
        "<2e-16".to_string()
    } else if p < 1e-4 {
        format!("{:.2e}", p)
    } else {
        format!("{:.4}", p)
    }
}

/// Coefficient table followed by the model summary lines
pub struct FitSummary<'a> {
    formula: &'a str,
    fit: &'a FitResult,
}

impl<'a> FitSummary<'a> {
    pub fn new(formula: &'a str, fit: &'a FitResult) -> Self {
        Self { formula, fit }
    }
}

impl fmt::Display for FitSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fit = self.fit;
        let level = fit.inference.confidence_level * 100.0;

        writeln!(f, "Formula: {}", self.formula)?;
        for (factor, reference) in &fit.reference_levels {
            writeln!(f, "Reference level for {}: {}", factor, reference)?;
        }
        writeln!(f)?;

        let rows = fit.coefficient_table();
        let width = rows
            .iter()
            .map(|r| r.term.len())
            .max()
            .unwrap_or(0)
            .max("Term".len());

        writeln!(
            f,
            "{:<width$}  {:>12}  {:>12}  {:>8}  {:>10}  {:>12}  {:>12}",
            "Term",
            "Estimate",
            "Std. Error",
            "t value",
            "Pr(>|t|)",
            format!("{:.1}% low", level),
            format!("{:.1}% high", level),
            width = width
        )?;
        for row in &rows {
            writeln!(
                f,
                "{:<width$}  {:>12.6}  {:>12.6}  {:>8.3}  {:>10}  {:>12.6}  {:>12.6} {}",
                row.term,
                row.estimate,
                row.std_error,
                row.t_value,
                format_p(row.p_value),
                row.ci_lower,
                row.ci_upper,
                significance(row.p_value),
                width = width
            )?;
        }
        writeln!(f, "---")?;
        writeln!(f, "Signif. codes:  0 '***' 0.001 '**' 0.01 '*' 0.05 '.' 0.1 ' ' 1")?;
        writeln!(f)?;

        let core = &fit.core;
        writeln!(
            f,
            "Residual standard error: {:.4} on {} degrees of freedom",
            core.residual_std_error, core.df_residual
        )?;
        writeln!(
            f,
            "Multiple R-squared: {:.5},\tAdjusted R-squared: {:.5}",
            core.r_squared, core.adj_r_squared
        )?;
        if let (Some(stat), Some(p)) = (fit.inference.f_statistic, fit.inference.f_pvalue) {
            writeln!(
                f,
                "F-statistic: {:.4} on {} and {} DF,  p-value: {}",
                stat,
                fit.inference.df_model,
                core.df_residual,
                format_p(p)
            )?;
        }
        let diag = &fit.diagnostics;
        writeln!(
            f,
            "Log-likelihood: {:.4} (df={}),  AIC: {:.4},  BIC: {:.4}",
            diag.log_likelihood,
            fit.n_likelihood_params(),
            diag.aic,
            diag.bic
        )
    }
}

/// Two-row likelihood-ratio table in the layout of R's `anova()`
pub struct ComparisonSummary<'a> {
    full: &'a str,
    reduced: &'a str,
    result: &'a ComparisonResult,
}

impl<'a> ComparisonSummary<'a> {
    pub fn new(full: &'a str, reduced: &'a str, result: &'a ComparisonResult) -> Self {
        Self {
            full,
            reduced,
            result,
        }
    }
}

impl fmt::Display for ComparisonSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.result;
        writeln!(f, "reduced: {}", self.reduced)?;
        writeln!(f, "full:    {}", self.full)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<8}  {:>4}  {:>12}  {:>10}  {:>4}  {:>12}",
            "", "Df", "logLik", "Chisq", "Df", "Pr(>Chisq)"
        )?;
        writeln!(
            f,
            "{:<8}  {:>4}  {:>12.4}",
            "reduced", result.reduced_params, result.reduced_log_likelihood
        )?;
        writeln!(
            f,
            "{:<8}  {:>4}  {:>12.4}  {:>10.4}  {:>4}  {:>12} {}",
            "full",
            result.full_params,
            result.full_log_likelihood,
            result.statistic,
            result.df,
            format_p(result.p_value),
            significance(result.p_value)
        )
    }
}
