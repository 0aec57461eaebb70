pub mod compare;
pub mod fit;
pub mod lrt;

use std::path::Path;

use anyhow::{Context, Result};

use lmstats_core::{Dataset, OlsOptions};

use crate::input;

/// Data-file arguments shared by the commands that fit OLS models
#[derive(clap::Args)]
pub struct DataArgs {
    /// Delimited data file with a header row (tab, comma or whitespace)
    #[arg(long)]
    data: String,

    /// Reference level of a categorical column, as column=level (repeatable)
    #[arg(long = "reference")]
    references: Vec<String>,

    /// Treat a column as categorical even if its values are numeric (repeatable)
    #[arg(long = "factor")]
    factors: Vec<String>,

    /// Confidence level for coefficient intervals
    #[arg(long, default_value = "0.95")]
    confidence: f64,
}

impl DataArgs {
    pub fn load(&self) -> Result<Dataset> {
        input::read_dataset(Path::new(&self.data), &self.factors)
    }

    pub fn options(&self) -> Result<OlsOptions> {
        let mut options = OlsOptions {
            confidence_level: self.confidence,
            ..OlsOptions::default()
        };
        for assignment in &self.references {
            let (column, level) = input::parse_reference(assignment)
                .with_context(|| format!("Invalid --reference '{}'", assignment))?;
            options = options.with_reference(column, level);
        }
        Ok(options)
    }
}
