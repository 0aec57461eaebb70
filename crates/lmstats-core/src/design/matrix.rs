//! Design matrix construction

use std::collections::HashMap;

use faer::Mat;

use super::encoding::{Factor, ReferenceLevel};
use super::formula::Formula;
use crate::data::{Column, Dataset};
use crate::errors::{StatsError, StatsResult};

/// Name given to the intercept column
pub const INTERCEPT: &str = "(Intercept)";

/// An n × p model matrix with named columns
#[derive(Debug, Clone)]
pub struct DesignMatrix {
    names: Vec<String>,
    matrix: Mat<f64>,
    has_intercept: bool,
    /// Formula term -> indices of the columns it produced
    term_columns: Vec<(String, Vec<usize>)>,
    /// Reference level chosen for every categorical term
    references: Vec<(String, String)>,
}

impl DesignMatrix {
    /// Build from raw predictor columns (each `Vec<f64>` is one column)
    pub fn from_columns<S: AsRef<str>>(
        names: &[S],
        columns: &[Vec<f64>],
        intercept: bool,
    ) -> StatsResult<Self> {
        if names.len() != columns.len() {
            return Err(StatsError::InvalidInput(format!(
                "{} column names for {} columns",
                names.len(),
                columns.len()
            )));
        }
        let n_rows = match columns.first() {
            Some(col) => col.len(),
            None if intercept => {
                return Err(StatsError::InvalidInput(
                    "intercept-only design needs a row count, use DesignMatrix::intercept_only"
                        .into(),
                ))
            }
            None => return Err(StatsError::EmptyInput { field: "columns" }),
        };

        let mut builder = Builder::new(n_rows, intercept);
        for (name, column) in names.iter().zip(columns) {
            let name = name.as_ref();
            builder.push_term(name, vec![(name.to_string(), column.clone())])?;
        }
        Ok(builder.finish())
    }

    /// An n × 1 column of ones
    pub fn intercept_only(n_rows: usize) -> StatsResult<Self> {
        if n_rows == 0 {
            return Err(StatsError::EmptyInput { field: "rows" });
        }
        Ok(Builder::new(n_rows, true).finish())
    }

    /// Build the fixed-effect design of `formula` over `data`.
    ///
    /// Categorical columns are expanded with treatment coding. The reference
    /// level for a factor is looked up in `reference_levels` by column name and
    /// defaults to [`ReferenceLevel::Sorted`]. In a model without an intercept
    /// the first factor gets one column per level and has no reference level.
    /// Rows must not contain missing values in the referenced columns (see
    /// [`Dataset::drop_missing`]).
    pub fn from_formula(
        formula: &Formula,
        data: &Dataset,
        reference_levels: &HashMap<String, ReferenceLevel>,
    ) -> StatsResult<Self> {
        let n_rows = data.n_rows();
        if n_rows == 0 {
            return Err(StatsError::EmptyInput { field: "data" });
        }

        let mut builder = Builder::new(n_rows, formula.has_intercept());
        // Without an intercept the first factor keeps all of its levels
        let mut full_coding = !formula.has_intercept();
        for term in formula.fixed_terms() {
            match data.column(term)? {
                Column::Numeric(values) => {
                    builder.push_term(term, vec![(term.clone(), values.clone())])?;
                }
                Column::Categorical(labels) => {
                    let labels: Vec<&str> = labels
                        .iter()
                        .enumerate()
                        .map(|(row, label)| {
                            label.as_deref().ok_or_else(|| StatsError::NonFiniteValue {
                                field: term.clone(),
                                row,
                            })
                        })
                        .collect::<StatsResult<_>>()?;
                    let reference = reference_levels.get(term).cloned().unwrap_or_default();
                    let factor = Factor::from_labels(term, &labels, &reference)?;
                    if full_coding {
                        full_coding = false;
                        builder.push_term(term, factor.full_indicator_columns())?;
                    } else {
                        builder
                            .references
                            .push((term.clone(), factor.reference().to_string()));
                        builder.push_term(term, factor.indicator_columns())?;
                    }
                }
            }
        }
        Ok(builder.finish())
    }

    pub fn nrows(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.matrix.ncols()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn has_intercept(&self) -> bool {
        self.has_intercept
    }

    pub fn matrix(&self) -> &Mat<f64> {
        &self.matrix
    }

    /// Value at row `i`, column `j`
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix[(i, j)]
    }

    /// Formula terms in order, with the design columns each one produced
    pub fn term_columns(&self) -> &[(String, Vec<usize>)] {
        &self.term_columns
    }

    /// Reference level used for each categorical term
    pub fn reference_levels(&self) -> &[(String, String)] {
        &self.references
    }
}

struct Builder {
    n_rows: usize,
    has_intercept: bool,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    term_columns: Vec<(String, Vec<usize>)>,
    references: Vec<(String, String)>,
}

impl Builder {
    fn new(n_rows: usize, intercept: bool) -> Self {
        let mut builder = Self {
            n_rows,
            has_intercept: intercept,
            names: Vec::new(),
            columns: Vec::new(),
            term_columns: Vec::new(),
            references: Vec::new(),
        };
        if intercept {
            builder.names.push(INTERCEPT.to_string());
            builder.columns.push(vec![1.0; n_rows]);
        }
        builder
    }

    fn push_term(&mut self, term: &str, columns: Vec<(String, Vec<f64>)>) -> StatsResult<()> {
        let mut indices = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            if values.len() != self.n_rows {
                return Err(StatsError::DimensionMismatch {
                    y_len: self.n_rows,
                    x_rows: values.len(),
                });
            }
            if self.names.contains(&name) {
                return Err(StatsError::InvalidInput(format!(
                    "duplicate design column '{}'",
                    name
                )));
            }
            indices.push(self.columns.len());
            self.names.push(name);
            self.columns.push(values);
        }
        self.term_columns.push((term.to_string(), indices));
        Ok(())
    }

    fn finish(self) -> DesignMatrix {
        let columns = self.columns;
        let matrix = Mat::from_fn(self.n_rows, columns.len(), |i, j| columns[j][i]);
        DesignMatrix {
            names: self.names,
            matrix,
            has_intercept: self.has_intercept,
            term_columns: self.term_columns,
            references: self.references,
        }
    }
}
