//! Model comparison

mod lrt;

pub use lrt::{
    compare_fits, likelihood_ratio_test, ComparisonResult, EstimationMethod, ModelLikelihood,
};
