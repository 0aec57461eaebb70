//! Ordinary Least Squares (OLS) regression

use faer::linalg::triangular_inverse::invert_upper_triangular;
use faer::linalg::triangular_solve::solve_upper_triangular_in_place;
use faer::{Col, Mat, Parallelism};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, StudentsT};
use tracing::debug;

use crate::data::Dataset;
use crate::design::{DesignMatrix, Formula};
use crate::diagnostics::{compute_aic, compute_bic, gaussian_log_likelihood};
use crate::errors::{StatsError, StatsResult};
use crate::types::{FitResult, FitResultCore, FitResultDiagnostics, FitResultInference, OlsOptions};

/// A design column is linearly dependent on the others when its diagonal
/// entry of R is at most this fraction of its Euclidean norm
const RANK_TOLERANCE: f64 = 1e-7;

/// Fit an OLS regression model
///
/// # Arguments
/// * `y` - Response variable (n observations)
/// * `design` - Design matrix (n observations x p columns, intercept included by the design)
/// * `options` - Fitting options
///
/// # Returns
/// * `FitResult` with coefficients, inference, R-squared and likelihood diagnostics
pub fn fit_ols(y: &[f64], design: &DesignMatrix, options: &OlsOptions) -> StatsResult<FitResult> {
    // Validate inputs
    if y.is_empty() {
        return Err(StatsError::EmptyInput { field: "y" });
    }
    if design.ncols() == 0 {
        return Err(StatsError::EmptyInput { field: "x" });
    }
    let level = options.confidence_level;
    if !(level > 0.0 && level < 1.0) {
        return Err(StatsError::InvalidConfidenceLevel(level));
    }

    let n_obs = y.len();
    let n_params = design.ncols();

    if design.nrows() != n_obs {
        return Err(StatsError::DimensionMismatch {
            y_len: n_obs,
            x_rows: design.nrows(),
        });
    }

    if let Some(row) = y.iter().position(|v| !v.is_finite()) {
        return Err(StatsError::NonFiniteValue {
            field: "y".into(),
            row,
        });
    }
    for (j, name) in design.names().iter().enumerate() {
        if let Some(row) = (0..n_obs).find(|&i| !design.get(i, j).is_finite()) {
            return Err(StatsError::NonFiniteValue {
                field: name.clone(),
                row,
            });
        }
    }

    // Need at least one residual degree of freedom
    if n_obs <= n_params {
        return Err(StatsError::InsufficientData {
            rows: n_obs,
            cols: n_params,
        });
    }

    let LeastSquares {
        coefficients,
        unscaled_covariance,
    } = least_squares(y, design)?;
    let fitted_values: Vec<f64> = (0..n_obs)
        .map(|i| {
            coefficients
                .iter()
                .enumerate()
                .map(|(j, b)| design.get(i, j) * b)
                .sum()
        })
        .collect();
    let residuals: Vec<f64> = y
        .iter()
        .zip(&fitted_values)
        .map(|(yi, fi)| yi - fi)
        .collect();

    let df_residual = n_obs - n_params;
    let df_model = if design.has_intercept() {
        n_params - 1
    } else {
        n_params
    };

    let rss: f64 = residuals.iter().map(|e| e * e).sum();
    let sum_sq: f64 = y.iter().map(|v| v * v).sum();
    let tss: f64 = if design.has_intercept() {
        let mean = y.iter().sum::<f64>() / n_obs as f64;
        y.iter().map(|v| (v - mean) * (v - mean)).sum()
    } else {
        sum_sq
    };
    // A constant response leaves only rounding error in the centered TSS
    let no_variation = tss <= f64::EPSILON * sum_sq;

    let r_squared = if df_model == 0 {
        0.0
    } else if no_variation {
        f64::NAN
    } else {
        1.0 - rss / tss
    };
    let n_intercept = n_params - df_model;
    let adj_r_squared =
        1.0 - (1.0 - r_squared) * (n_obs - n_intercept) as f64 / df_residual as f64;

    let sigma2 = rss / df_residual as f64;
    let residual_std_error = sigma2.sqrt();

    let t_dist = StudentsT::new(0.0, 1.0, df_residual as f64)
        .map_err(|e| StatsError::Distribution(e.to_string()))?;
    let t_crit = t_dist.inverse_cdf((1.0 + level) / 2.0);

    let std_errors: Vec<f64> = (0..n_params)
        .map(|j| residual_std_error * unscaled_covariance[(j, j)].sqrt())
        .collect();
    let t_values: Vec<f64> = coefficients
        .iter()
        .zip(&std_errors)
        .map(|(b, se)| b / se)
        .collect();
    let p_values: Vec<f64> = t_values
        .iter()
        .map(|&t| two_sided_p_value(&t_dist, t))
        .collect();
    let ci_lower: Vec<f64> = coefficients
        .iter()
        .zip(&std_errors)
        .map(|(b, se)| b - t_crit * se)
        .collect();
    let ci_upper: Vec<f64> = coefficients
        .iter()
        .zip(&std_errors)
        .map(|(b, se)| b + t_crit * se)
        .collect();

    // Undefined without predictors or without variation to explain
    let (f_statistic, f_pvalue) = if df_model == 0 || no_variation {
        (None, None)
    } else {
        // Rounding can leave RSS marginally above TSS
        let f = ((tss - rss).max(0.0) / df_model as f64) / sigma2;
        let f_pvalue = if f.is_infinite() {
            0.0
        } else {
            FisherSnedecor::new(df_model as f64, df_residual as f64)
                .map_err(|e| StatsError::Distribution(e.to_string()))?
                .sf(f)
        };
        (Some(f), Some(f_pvalue))
    };

    // The residual variance counts as an estimated parameter
    let k = n_params + 1;
    let log_likelihood = gaussian_log_likelihood(rss, n_obs)?;
    let aic = compute_aic(log_likelihood, k)?;
    let bic = compute_bic(log_likelihood, n_obs, k)?;

    debug!(
        n_obs,
        n_params,
        r_squared,
        residual_std_error,
        log_likelihood,
        "fitted OLS model"
    );

    Ok(FitResult {
        response: None,
        terms: design.names().to_vec(),
        has_intercept: design.has_intercept(),
        reference_levels: design.reference_levels().to_vec(),
        core: FitResultCore {
            coefficients,
            fitted_values,
            residuals,
            r_squared,
            adj_r_squared,
            residual_std_error,
            rss,
            tss,
            n_observations: n_obs,
            n_params,
            df_residual,
        },
        inference: FitResultInference {
            std_errors,
            t_values,
            p_values,
            ci_lower,
            ci_upper,
            confidence_level: level,
            f_statistic,
            f_pvalue,
            df_model,
            unscaled_covariance,
        },
        diagnostics: FitResultDiagnostics {
            log_likelihood,
            aic,
            bic,
        },
    })
}

/// Fit an OLS model described by a formula over a dataset
///
/// Rows with a missing value in any column the formula references are
/// dropped before the design matrix is built.
pub fn fit_formula(formula: &Formula, data: &Dataset, options: &OlsOptions) -> StatsResult<FitResult> {
    if let Some(term) = formula.random_terms().first() {
        return Err(StatsError::UnsupportedTerm(term.to_string()));
    }

    let complete = data.drop_missing(&formula.referenced_columns())?;
    if complete.n_rows() < data.n_rows() {
        debug!(
            dropped = data.n_rows() - complete.n_rows(),
            "dropped rows with missing values"
        );
    }
    if complete.n_rows() == 0 {
        return Err(StatsError::EmptyInput { field: "data" });
    }

    let y = complete.numeric(formula.response())?;
    let design = DesignMatrix::from_formula(formula, &complete, &options.reference_levels)?;
    let mut fit = fit_ols(y, &design, options)?;
    fit.response = Some(formula.response().to_string());
    Ok(fit)
}

/// Least-squares coefficients and `(XᵀX)⁻¹`, both in design column order
struct LeastSquares {
    coefficients: Vec<f64>,
    unscaled_covariance: Mat<f64>,
}

/// Solve `min ‖y − Xβ‖` through a column-pivoted QR decomposition `XP = QR`
fn least_squares(y: &[f64], design: &DesignMatrix) -> StatsResult<LeastSquares> {
    let x = design.matrix();
    let p = x.ncols();

    let qr = x.col_piv_qr();
    let r = qr.compute_thin_r();
    let q = qr.compute_thin_q();
    // perm[k] is the design column at pivot position k, perm_inv its inverse
    let (perm, perm_inv) = qr.col_permutation().arrays();

    for (k, &column) in perm.iter().enumerate() {
        if r[(k, k)].abs() <= RANK_TOLERANCE * x.col(column).norm_l2() {
            return Err(StatsError::RankDeficient {
                column: design.names()[column].clone(),
            });
        }
    }

    // R β̃ = Qᵀy, with β̃ in pivoted order
    let y = Col::from_fn(y.len(), |i| y[i]);
    let mut beta = q.transpose() * y.as_ref();
    solve_upper_triangular_in_place(r.as_ref(), beta.as_mut().as_2d_mut(), Parallelism::None);

    // (XᵀX)⁻¹ = P R⁻¹ R⁻ᵀ Pᵀ
    let mut r_inv = Mat::<f64>::zeros(p, p);
    invert_upper_triangular(r_inv.as_mut(), r.as_ref(), Parallelism::None);
    let pivoted = r_inv.as_ref() * r_inv.transpose();

    Ok(LeastSquares {
        coefficients: (0..p).map(|j| beta[perm_inv[j]]).collect(),
        unscaled_covariance: Mat::from_fn(p, p, |i, j| pivoted[(perm_inv[i], perm_inv[j])]),
    })
}

/// Two-sided p-value of a t statistic, NaN when the statistic is undefined
/// (a zero coefficient with a zero standard error)
fn two_sided_p_value(t_dist: &StudentsT, t: f64) -> f64 {
    if t.is_nan() {
        f64::NAN
    } else if t.is_infinite() {
        0.0
    } else {
        (2.0 * t_dist.sf(t.abs())).min(1.0)
    }
}
