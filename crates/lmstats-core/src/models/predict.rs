//! Prediction from fitted models
//!
//! Computes X_new · β for a design matrix laid out like the one the model was fitted on.

use crate::design::DesignMatrix;
use crate::errors::{StatsError, StatsResult};
use crate::types::FitResult;

/// Make predictions for the rows of `design` using a fitted model
///
/// # Arguments
/// * `fit` - Result of a previous fit
/// * `design` - New design matrix; its columns must match `fit.terms` exactly
///
/// # Returns
/// * Vector of predicted values (one per row of `design`)
pub fn predict(fit: &FitResult, design: &DesignMatrix) -> StatsResult<Vec<f64>> {
    let coefficients = &fit.core.coefficients;

    if design.ncols() != coefficients.len() {
        return Err(StatsError::DimensionMismatch {
            y_len: coefficients.len(),
            x_rows: design.ncols(),
        });
    }
    if design.names() != fit.terms.as_slice() {
        return Err(StatsError::InvalidInput(format!(
            "design columns {:?} do not match fitted terms {:?}",
            design.names(),
            fit.terms
        )));
    }

    let predictions = (0..design.nrows())
        .map(|i| {
            coefficients
                .iter()
                .enumerate()
                .map(|(j, coef)| coef * design.get(i, j))
                .sum()
        })
        .collect();

    Ok(predictions)
}
