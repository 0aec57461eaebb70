//! In-memory observation sets
//!
//! A [`Dataset`] is an ordered collection of equally long named columns.
//! Numeric columns use `NaN` for missing values, categorical columns `None`.

use crate::errors::{StatsError, StatsResult};

/// A single column of observations
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Continuous values (`NaN` marks a missing value)
    Numeric(Vec<f64>),
    /// Labels from a finite set (`None` marks a missing value)
    Categorical(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the value at `row` is missing
    pub fn is_missing(&self, row: usize) -> bool {
        match self {
            Column::Numeric(v) => !v[row].is_finite(),
            Column::Categorical(v) => v[row].is_none(),
        }
    }

    fn select(&self, rows: &[usize]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(rows.iter().map(|&i| v[i]).collect()),
            Column::Categorical(v) => {
                Column::Categorical(rows.iter().map(|&i| v[i].clone()).collect())
            }
        }
    }
}

/// Ordered set of named columns sharing one row count
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a column. The first column fixes the row count.
    pub fn insert(&mut self, name: impl Into<String>, column: Column) -> StatsResult<()> {
        let name = name.into();
        if let Some(n_rows) = self.n_rows_if_any() {
            if column.len() != n_rows {
                return Err(StatsError::DimensionMismatch {
                    y_len: n_rows,
                    x_rows: column.len(),
                });
            }
        }

        match self.names.iter().position(|n| *n == name) {
            Some(idx) => self.columns[idx] = column,
            None => {
                self.names.push(name);
                self.columns.push(column);
            }
        }
        Ok(())
    }

    /// Builder-style [`Dataset::insert`] for a numeric column
    pub fn with_numeric(mut self, name: impl Into<String>, values: Vec<f64>) -> StatsResult<Self> {
        self.insert(name, Column::Numeric(values))?;
        Ok(self)
    }

    /// Builder-style [`Dataset::insert`] for a categorical column
    pub fn with_categorical<S: AsRef<str>>(
        mut self,
        name: impl Into<String>,
        labels: &[S],
    ) -> StatsResult<Self> {
        let labels = labels
            .iter()
            .map(|s| Some(s.as_ref().to_string()))
            .collect();
        self.insert(name, Column::Categorical(labels))?;
        Ok(self)
    }

    fn n_rows_if_any(&self) -> Option<usize> {
        self.columns.first().map(Column::len)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows_if_any().unwrap_or(0)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn column(&self, name: &str) -> StatsResult<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| &self.columns[idx])
            .ok_or_else(|| StatsError::UnknownColumn(name.to_string()))
    }

    /// Numeric view of a column
    pub fn numeric(&self, name: &str) -> StatsResult<&[f64]> {
        match self.column(name)? {
            Column::Numeric(v) => Ok(v),
            Column::Categorical(_) => Err(StatsError::InvalidInput(format!(
                "column '{}' is categorical, expected numeric",
                name
            ))),
        }
    }

    /// Listwise deletion: keep only rows with no missing value in `columns`
    pub fn drop_missing<S: AsRef<str>>(&self, columns: &[S]) -> StatsResult<Dataset> {
        let checked: Vec<&Column> = columns
            .iter()
            .map(|name| self.column(name.as_ref()))
            .collect::<StatsResult<_>>()?;

        let keep: Vec<usize> = (0..self.n_rows())
            .filter(|&row| checked.iter().all(|col| !col.is_missing(row)))
            .collect();

        Ok(Dataset {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.select(&keep)).collect(),
        })
    }
}
