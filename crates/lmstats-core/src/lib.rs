//! lmstats-core: linear models with full inference and likelihood-ratio comparison
//!
//! This crate fits ordinary least-squares models (from raw columns or from a
//! formula over a dataset with categorical predictors) and compares nested
//! models, including mixed models fitted by an external solver, with a
//! likelihood-ratio test.

pub mod comparison;
pub mod data;
pub mod design;
pub mod diagnostics;
pub mod errors;
pub mod mixed;
pub mod models;
pub mod types;

pub use comparison::{
    compare_fits, likelihood_ratio_test, ComparisonResult, EstimationMethod, ModelLikelihood,
};
pub use data::{Column, Dataset};
pub use design::{DesignMatrix, Formula, ReferenceLevel};
pub use errors::{StatsError, StatsResult};
pub use mixed::{compare_mixed_models, MixedFit, MixedModelSolver, RandomEffectEstimate};
pub use models::{fit_formula, fit_ols, predict};
pub use types::*;
