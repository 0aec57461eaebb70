//! Diagnostic functions for regression models

mod information_criteria;
mod residuals;

pub use information_criteria::{compute_aic, compute_aicc, compute_bic, gaussian_log_likelihood};
pub use residuals::{compute_residuals, ResidualType, ResidualsResult};
