//! Delimited data-file reader.
//!
//! Reads tab, comma or whitespace delimited files with a header row into a
//! [`Dataset`]. Columns whose non-missing values all parse as numbers become
//! numeric; everything else (and any column named with `--factor`) becomes
//! categorical.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};

use lmstats_core::{Column, Dataset, ReferenceLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delimiter {
    Tab,
    Comma,
    Whitespace,
}

impl Delimiter {
    /// Detect the delimiter from the header line
    fn detect(header: &str) -> Self {
        if header.contains('\t') {
            Delimiter::Tab
        } else if header.contains(',') {
            Delimiter::Comma
        } else {
            Delimiter::Whitespace
        }
    }

    fn split<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self {
            Delimiter::Tab => line.split('\t').map(str::trim).collect(),
            Delimiter::Comma => line.split(',').map(str::trim).collect(),
            Delimiter::Whitespace => line.split_whitespace().collect(),
        }
    }
}

/// Read a data file into a dataset
pub fn read_dataset(path: &Path, factors: &[String]) -> Result<Dataset> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file: {}", path.display()))?;
    parse_dataset(&contents, factors)
        .with_context(|| format!("Failed to parse data file: {}", path.display()))
}

/// Parse delimited text with a header row
pub fn parse_dataset(contents: &str, factors: &[String]) -> Result<Dataset> {
    let mut lines = contents.lines().filter(|l| !l.trim().is_empty());
    let header_line = lines.next().ok_or_else(|| anyhow!("Empty data file"))?;

    let delim = Delimiter::detect(header_line);
    let headers: Vec<String> = delim
        .split(header_line)
        .into_iter()
        .map(|h| h.trim_matches('"').to_string())
        .collect();

    for (i, name) in headers.iter().enumerate() {
        if name.is_empty() {
            bail!("Header column {} has no name", i + 1);
        }
        if headers[..i].contains(name) {
            bail!("Duplicate column '{}' in header", name);
        }
    }
    for factor in factors {
        if !headers.contains(factor) {
            bail!("Factor column '{}' not found in header", factor);
        }
    }

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (line_num, line) in lines.enumerate() {
        let fields = delim.split(line);
        if fields.len() != headers.len() {
            bail!(
                "Row {} has {} fields (expected {})",
                line_num + 2,
                fields.len(),
                headers.len()
            );
        }
        for (column, field) in raw.iter_mut().zip(fields) {
            column.push(field.trim_matches('"').to_string());
        }
    }

    let mut data = Dataset::new();
    for (name, values) in headers.into_iter().zip(raw) {
        let column = if factors.contains(&name) {
            categorical(&values)
        } else {
            numeric(&values).unwrap_or_else(|| categorical(&values))
        };
        data.insert(name, column)?;
    }
    Ok(data)
}

/// Parse a `column=level` reference-level assignment
pub fn parse_reference(assignment: &str) -> Result<(String, ReferenceLevel)> {
    let (column, level) = assignment
        .split_once('=')
        .ok_or_else(|| anyhow!("Reference '{}' is not of the form column=level", assignment))?;
    let (column, level) = (column.trim(), level.trim());
    if column.is_empty() || level.is_empty() {
        bail!("Reference '{}' is not of the form column=level", assignment);
    }
    Ok((column.to_string(), ReferenceLevel::Named(level.to_string())))
}

fn is_missing(s: &str) -> bool {
    matches!(s, "NA" | "na" | "Na" | "." | "" | "NaN" | "nan")
}

/// Numeric column if every non-missing value parses
fn numeric(values: &[String]) -> Option<Column> {
    values
        .iter()
        .map(|s| {
            if is_missing(s) {
                Some(f64::NAN)
            } else {
                s.parse::<f64>().ok().filter(|v| v.is_finite())
            }
        })
        .collect::<Option<Vec<f64>>>()
        .map(Column::Numeric)
}

fn categorical(values: &[String]) -> Column {
    Column::Categorical(
        values
            .iter()
            .map(|s| (!is_missing(s)).then(|| s.clone()))
            .collect(),
    )
}
