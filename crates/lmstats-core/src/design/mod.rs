//! Model specification: formulas, factor encoding and design matrices

pub mod encoding;
pub mod formula;
mod matrix;

pub use encoding::{Factor, ReferenceLevel};
pub use formula::{Formula, RandomTerm};
pub use matrix::{DesignMatrix, INTERCEPT};
