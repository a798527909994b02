//! End-to-end pipeline: clean the indicator table, then merge the cancer datasets
//!
//! Stages only touch files at the edges: tables are read once, transformed in
//! memory, and written once.

use std::fmt;
use std::path::Path;
use std::time::Instant;

use indicatif::ProgressBar;
use log::info;

use crate::algorithm::merge::merge_datasets;
use crate::algorithm::reshape::{CleanedIndicators, ImputationReport, PivotStats, clean_indicators};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{CancerDataset, MergedTable, WideIndicatorTable};
use crate::utils::io::{read_table, write_table};
use crate::utils::logging::advance_stage;

/// Logical name of the indicator table in logs and errors
pub const INDICATOR_TABLE: &str = "indicators";

/// Number of progress stages reported by [`Pipeline::run`]
pub const RUN_STAGES: u64 = 4;

/// What a full run produced
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Pivot counters
    pub pivot: PivotStats,
    /// Imputation results
    pub imputation: ImputationReport,
    /// The merged output table
    pub merged: MergedTable,
}

/// Runs the configured stages
pub struct Pipeline {
    config: PipelineConfig,
    progress: Option<ProgressBar>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl Pipeline {
    /// Create a pipeline after validating the configuration
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            progress: None,
        })
    }

    /// Report stage progress on the given bar
    #[must_use]
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// The configuration in use
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn stage(&self, next: &str) {
        if let Some(pb) = &self.progress {
            advance_stage(pb, next);
        }
    }

    /// Read the long-form indicator table, reshape it, and impute medians
    ///
    /// Writes the cleaned wide table (with its canonical key column) when a
    /// cleaned output path is configured.
    pub fn clean(&self) -> Result<CleanedIndicators> {
        let raw = read_table(&self.config.indicators, INDICATOR_TABLE)?;
        let cleaned = clean_indicators(
            &raw,
            INDICATOR_TABLE,
            &self.config.columns,
            self.config.duplicates,
        )?;

        if let Some(path) = &self.config.cleaned_output {
            let batch = cleaned
                .table
                .to_batch(&self.config.columns, Some(&self.config.renames))?;
            write_table(&batch, path)?;
        }
        Ok(cleaned)
    }

    /// Read an already cleaned wide indicator table
    pub fn load_wide_indicators(&self, path: &Path) -> Result<WideIndicatorTable> {
        let batch = read_table(path, INDICATOR_TABLE)?;
        WideIndicatorTable::from_batch(&batch, INDICATOR_TABLE, &self.config.columns)
    }

    /// Read every configured cancer dataset, in configuration order
    pub fn load_datasets(&self) -> Result<Vec<CancerDataset>> {
        self.config
            .datasets
            .iter()
            .map(|spec| {
                let batch = read_table(&spec.path, &spec.name)?;
                Ok(CancerDataset::new(spec.name.clone(), batch, spec.alignment_period))
            })
            .collect()
    }

    /// Merge the configured cancer datasets with an indicator table and
    /// write the result to the configured output path
    pub fn merge(&self, indicators: &WideIndicatorTable) -> Result<MergedTable> {
        let datasets = self.load_datasets()?;
        self.stage("merging datasets");

        let merged = merge_datasets(
            indicators,
            &datasets,
            &self.config.columns,
            &self.config.renames,
        )?;
        self.stage("writing output");

        write_table(&merged.batch, &self.config.output)?;
        Ok(merged)
    }

    /// Run every stage: clean, load, merge, write
    pub fn run(&self) -> Result<PipelineReport> {
        let start = Instant::now();
        info!("Starting pipeline run\n{}", self.config);

        let cleaned = self.clean()?;
        self.stage("loading cancer datasets");

        let merged = self.merge(&cleaned.table)?;
        self.stage("done");

        info!(
            "Pipeline finished in {:?}: {} output rows from {} datasets",
            start.elapsed(),
            merged.num_rows(),
            merged.segments.len()
        );
        Ok(PipelineReport {
            pivot: cleaned.pivot,
            imputation: cleaned.imputation,
            merged,
        })
    }
}
