//! Log-likelihood and information criteria for model selection (AIC, BIC)

use std::f64::consts::PI;

use crate::errors::{StatsError, StatsResult};

/// Maximized Gaussian log-likelihood of a linear model
///
/// ℓ = −n/2 · (ln 2π + ln(RSS/n) + 1)
///
/// This is the full maximum-likelihood value (σ̂² = RSS/n), the quantity a
/// likelihood-ratio test between nested linear models needs. A perfect fit
/// (RSS = 0) has unbounded likelihood and returns `+∞`.
pub fn gaussian_log_likelihood(rss: f64, n: usize) -> StatsResult<f64> {
    if n == 0 {
        return Err(StatsError::InvalidInput("n must be > 0".into()));
    }
    if !(rss >= 0.0) {
        return Err(StatsError::InvalidInput("RSS must be non-negative".into()));
    }
    if rss == 0.0 {
        return Ok(f64::INFINITY);
    }

    let n_f = n as f64;
    Ok(-0.5 * n_f * ((2.0 * PI).ln() + (rss / n_f).ln() + 1.0))
}

/// Compute AIC (Akaike Information Criterion)
///
/// AIC = −2ℓ + 2k
///
/// where k is the number of estimated parameters (coefficients plus any
/// variance parameters). Lower AIC indicates better model fit (accounting
/// for complexity).
pub fn compute_aic(log_likelihood: f64, k: usize) -> StatsResult<f64> {
    if log_likelihood.is_nan() {
        return Err(StatsError::InvalidInput("log-likelihood is NaN".into()));
    }
    Ok(-2.0 * log_likelihood + 2.0 * k as f64)
}

/// Compute AICc (corrected AIC for small samples)
///
/// AICc = AIC + (2k² + 2k) / (n − k − 1)
///
/// Use AICc when n/k < 40
pub fn compute_aicc(log_likelihood: f64, n: usize, k: usize) -> StatsResult<f64> {
    let aic = compute_aic(log_likelihood, k)?;

    if n <= k + 1 {
        return Err(StatsError::InsufficientData { rows: n, cols: k });
    }

    let n_f = n as f64;
    let k_f = k as f64;

    let correction = (2.0 * k_f * k_f + 2.0 * k_f) / (n_f - k_f - 1.0);
    Ok(aic + correction)
}

/// Compute BIC (Bayesian Information Criterion)
///
/// BIC = −2ℓ + k · ln(n)
///
/// BIC penalizes model complexity more heavily than AIC for larger samples.
pub fn compute_bic(log_likelihood: f64, n: usize, k: usize) -> StatsResult<f64> {
    if n == 0 {
        return Err(StatsError::InvalidInput("n must be > 0".into()));
    }
    if log_likelihood.is_nan() {
        return Err(StatsError::InvalidInput("log-likelihood is NaN".into()));
    }
    Ok(-2.0 * log_likelihood + k as f64 * (n as f64).ln())
}
