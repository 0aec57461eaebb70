//! Residual diagnostics for fitted linear models

use crate::design::DesignMatrix;
use crate::errors::{StatsError, StatsResult};
use crate::types::FitResult;

/// Type of residuals to compute
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResidualType {
    /// Raw residuals: e = y - y_hat
    Raw,
    /// Standardized residuals: e / s (where s = residual std error)
    Standardized,
    /// Studentized residuals: e / (s * sqrt(1 - h_ii)) where h_ii is leverage
    Studentized,
}

/// Result containing different types of residuals
#[derive(Debug, Clone)]
pub struct ResidualsResult {
    /// Raw residuals
    pub raw: Vec<f64>,
    /// Standardized residuals
    pub standardized: Vec<f64>,
    /// Internally studentized residuals
    pub studentized: Vec<f64>,
    /// Leverage values (hat diagonal)
    pub leverage: Vec<f64>,
}

impl ResidualsResult {
    pub fn get(&self, kind: ResidualType) -> &[f64] {
        match kind {
            ResidualType::Raw => &self.raw,
            ResidualType::Standardized => &self.standardized,
            ResidualType::Studentized => &self.studentized,
        }
    }
}

/// Compute residual diagnostics for a fit against the design it was fitted on
///
/// Leverage is h_ii = x_iᵀ (XᵀX)⁻¹ x_i, using the unscaled covariance the fit
/// already carries, so no further decomposition is needed.
pub fn compute_residuals(fit: &FitResult, design: &DesignMatrix) -> StatsResult<ResidualsResult> {
    let n = fit.core.n_observations;
    let p = fit.core.n_params;

    if design.nrows() != n {
        return Err(StatsError::DimensionMismatch {
            y_len: n,
            x_rows: design.nrows(),
        });
    }
    if design.names() != fit.terms.as_slice() {
        return Err(StatsError::InvalidInput(
            "design columns do not match the fitted terms".into(),
        ));
    }

    let cov = &fit.inference.unscaled_covariance;
    let leverage: Vec<f64> = (0..n)
        .map(|i| {
            let mut h_ii = 0.0;
            for j in 0..p {
                for l in 0..p {
                    h_ii += design.get(i, j) * cov[(j, l)] * design.get(i, l);
                }
            }
            h_ii
        })
        .collect();

    let raw = fit.core.residuals.clone();
    let s = fit.core.residual_std_error;

    let standardized = if s > 0.0 {
        raw.iter().map(|e| e / s).collect()
    } else {
        raw.clone()
    };

    let studentized = raw
        .iter()
        .zip(&leverage)
        .map(|(e, h)| {
            let denom = s * (1.0 - h).max(1e-10).sqrt();
            if denom > 0.0 {
                e / denom
            } else {
                *e
            }
        })
        .collect();

    Ok(ResidualsResult {
        raw,
        standardized,
        studentized,
        leverage,
    })
}
