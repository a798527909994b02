//! Pipeline configuration
//!
//! All paths and constants of a run live in [`PipelineConfig`]. It can be
//! built in code, loaded from JSON, or assembled from command line flags.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::algorithm::normalize::RenameTable;
use crate::algorithm::reshape::DuplicatePolicy;
use crate::error::util::{safe_create_file, safe_open_file};
use crate::error::{Error, Result};
use crate::schema::ColumnNames;
use crate::utils::io::TableFormat;

/// Indicator period the cancer datasets are aligned to by default
pub const DEFAULT_ALIGNMENT_PERIOD: i64 = 2016;

/// A cancer dataset to merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// Logical name, used in logs and schema errors
    pub name: String,
    /// Input file
    pub path: PathBuf,
    /// Indicator period every row is matched against
    #[serde(default = "default_alignment_period")]
    pub alignment_period: i64,
}

fn default_alignment_period() -> i64 {
    DEFAULT_ALIGNMENT_PERIOD
}

impl DatasetSpec {
    /// Create a dataset spec
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, alignment_period: i64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            alignment_period,
        }
    }
}

/// Configuration of a full clean-and-merge run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Long-form indicator table
    pub indicators: PathBuf,
    /// Where to write the cleaned wide indicator table, if anywhere
    pub cleaned_output: Option<PathBuf>,
    /// Cancer datasets in processing order
    pub datasets: Vec<DatasetSpec>,
    /// Merged output table
    pub output: PathBuf,
    /// Literal column names
    pub columns: ColumnNames,
    /// Health-region rename table
    pub renames: RenameTable,
    /// Duplicate aggregation rule for the pivot
    pub duplicates: DuplicatePolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            indicators: PathBuf::from("data/raw/SDOH_Indicators.csv"),
            cleaned_output: Some(PathBuf::from("data/processed/SDOH_Clean_Wide.csv")),
            datasets: vec![
                DatasetSpec::new(
                    "incidence",
                    "data/processed/PHO_Cancer_Incidence_2010_2014.csv",
                    DEFAULT_ALIGNMENT_PERIOD,
                ),
                DatasetSpec::new(
                    "mortality",
                    "data/processed/PHO_Cancer_Mortality_2003_2015.csv",
                    DEFAULT_ALIGNMENT_PERIOD,
                ),
            ],
            output: PathBuf::from("data/processed/Merged_Cancer_SDOH.csv"),
            columns: ColumnNames::default(),
            renames: RenameTable::default(),
            duplicates: DuplicatePolicy::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file
    ///
    /// Absent fields take their default values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = safe_open_file(path, "pipeline configuration")?;
        let config: Self = serde_json::from_reader(file)
            .map_err(Error::Json)
            .with_context(|| format!("Invalid pipeline configuration in {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let file = safe_create_file(path, "pipeline configuration")?;
        serde_json::to_writer_pretty(file, self).map_err(Error::Json)?;
        Ok(())
    }

    /// Set the alignment period of every dataset
    #[must_use]
    pub fn with_alignment_period(mut self, period: i64) -> Self {
        for dataset in &mut self.datasets {
            dataset.alignment_period = period;
        }
        self
    }

    /// Check the configuration before any file is touched
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfig`] for an empty or duplicated dataset
    /// list or bad column names, and [`Error::UnsupportedFormat`] for a path
    /// whose extension is neither CSV nor Parquet
    pub fn validate(&self) -> Result<()> {
        self.columns.validate()?;

        if self.datasets.is_empty() {
            return Err(Error::InvalidConfig("no cancer datasets configured".into()).into());
        }
        let mut names = BTreeSet::new();
        for dataset in &self.datasets {
            if dataset.name.trim().is_empty() {
                return Err(Error::InvalidConfig("dataset names must not be empty".into()).into());
            }
            if !names.insert(dataset.name.as_str()) {
                return Err(Error::InvalidConfig(format!("dataset '{}' is configured twice", dataset.name)).into());
            }
            TableFormat::from_path(&dataset.path)?;
        }

        TableFormat::from_path(&self.indicators)?;
        TableFormat::from_path(&self.output)?;
        if let Some(cleaned) = &self.cleaned_output {
            TableFormat::from_path(cleaned)?;
        }
        Ok(())
    }
}

impl fmt::Display for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline Configuration:")?;
        writeln!(f, "  Indicators: {}", self.indicators.display())?;
        if let Some(cleaned) = &self.cleaned_output {
            writeln!(f, "  Cleaned Indicators: {}", cleaned.display())?;
        }
        for dataset in &self.datasets {
            writeln!(
                f,
                "  Dataset '{}': {} (aligned to {})",
                dataset.name,
                dataset.path.display(),
                dataset.alignment_period
            )?;
        }
        writeln!(f, "  Output: {}", self.output.display())?;
        writeln!(
            f,
            "  Rename Table: {} ({} entries)",
            self.renames.version(),
            self.renames.len()
        )?;
        writeln!(f, "  Duplicate Policy: {}", self.duplicates)?;
        Ok(())
    }
}
