//! Treatment (dummy) coding of categorical predictors
//!
//! A factor with levels `{a, b, c}` and reference `a` expands into the
//! indicator columns `b` and `c`. The reference level is always chosen
//! explicitly and stored on the [`Factor`].

use crate::errors::{StatsError, StatsResult};

/// How the reference level of a factor is chosen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReferenceLevel {
    /// First level in lexicographic order (R's `factor()` convention)
    #[default]
    Sorted,
    /// First level in order of appearance
    First,
    /// A specific level by label
    Named(String),
}

/// A categorical predictor with an explicit reference level
#[derive(Debug, Clone, PartialEq)]
pub struct Factor {
    name: String,
    /// Distinct levels in order of first appearance
    levels: Vec<String>,
    reference: usize,
    /// Level index for each observation
    codes: Vec<usize>,
}

impl Factor {
    /// Build a factor from complete (non-missing) labels.
    pub fn from_labels<S: AsRef<str>>(
        name: &str,
        labels: &[S],
        reference: &ReferenceLevel,
    ) -> StatsResult<Self> {
        if labels.is_empty() {
            return Err(StatsError::EmptyInput { field: "labels" });
        }

        let mut levels: Vec<String> = Vec::new();
        let codes = labels
            .iter()
            .map(|label| {
                let label = label.as_ref();
                match levels.iter().position(|l| l == label) {
                    Some(idx) => idx,
                    None => {
                        levels.push(label.to_string());
                        levels.len() - 1
                    }
                }
            })
            .collect();

        if levels.len() < 2 {
            return Err(StatsError::SingleLevel(name.to_string()));
        }

        let reference = match reference {
            ReferenceLevel::First => 0,
            ReferenceLevel::Sorted => levels
                .iter()
                .enumerate()
                .min_by(|a, b| a.1.cmp(b.1))
                .map(|(idx, _)| idx)
                .unwrap_or(0),
            ReferenceLevel::Named(level) => {
                levels
                    .iter()
                    .position(|l| l == level)
                    .ok_or_else(|| StatsError::UnknownLevel {
                        factor: name.to_string(),
                        level: level.clone(),
                    })?
            }
        };

        Ok(Self {
            name: name.to_string(),
            levels,
            reference,
            codes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn reference(&self) -> &str {
        &self.levels[self.reference]
    }

    pub fn n_observations(&self) -> usize {
        self.codes.len()
    }

    /// Non-reference levels, in the order their indicator columns appear
    pub fn contrast_levels(&self) -> impl Iterator<Item = &str> {
        self.levels
            .iter()
            .enumerate()
            .filter(move |(idx, _)| *idx != self.reference)
            .map(|(_, level)| level.as_str())
    }

    /// One 0/1 indicator column per non-reference level, named `<factor><level>`
    pub fn indicator_columns(&self) -> Vec<(String, Vec<f64>)> {
        (0..self.levels.len())
            .filter(|&idx| idx != self.reference)
            .map(|idx| self.indicator(idx))
            .collect()
    }

    /// One indicator column for every level, reference level first.
    ///
    /// This is the coding of a factor in a model without an intercept, where
    /// no column absorbs the reference level.
    pub fn full_indicator_columns(&self) -> Vec<(String, Vec<f64>)> {
        std::iter::once(self.reference)
            .chain((0..self.levels.len()).filter(|&idx| idx != self.reference))
            .map(|idx| self.indicator(idx))
            .collect()
    }

    fn indicator(&self, idx: usize) -> (String, Vec<f64>) {
        let column = self
            .codes
            .iter()
            .map(|&code| if code == idx { 1.0 } else { 0.0 })
            .collect();
        (format!("{}{}", self.name, self.levels[idx]), column)
    }
}
