//! sdoh-merge CLI - Merge SDOH indicators with cancer statistics
//!
//! ```bash
//! sdoh-merge run --config pipeline.json     # Full pipeline
//! sdoh-merge clean -i long.csv -o wide.csv  # Reshape and impute only
//! sdoh-merge merge --indicators wide.csv --incidence inc.csv --mortality mort.csv -o merged.csv
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;
use sdoh_merge::pipeline::RUN_STAGES;
use sdoh_merge::utils::logging::{create_main_progress_bar, finish_progress_bar};
use sdoh_merge::{
    DatasetSpec, DuplicatePolicy, Pipeline, PipelineConfig, RenameTable, Result,
    DEFAULT_ALIGNMENT_PERIOD,
};

#[derive(Parser)]
#[command(name = "sdoh-merge", version)]
#[command(about = "Merge social determinants of health indicators with cancer statistics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Indicator year every cancer dataset is aligned to
    #[arg(long, global = true)]
    alignment_year: Option<i64>,

    /// JSON rename table replacing the built-in one
    #[arg(long, global = true)]
    renames: Option<PathBuf>,

    /// How duplicate indicator values are combined (mean, first, last, reject)
    #[arg(long, global = true)]
    duplicates: Option<DuplicatePolicy>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Reshape the long-form indicator table and impute missing values
    Clean {
        /// Long-form indicator table (CSV or Parquet)
        #[arg(short, long)]
        input: PathBuf,

        /// Cleaned wide table
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Merge a cleaned indicator table with the cancer tables
    Merge {
        /// Cleaned wide indicator table
        #[arg(long)]
        indicators: PathBuf,

        /// Cancer incidence table
        #[arg(long)]
        incidence: PathBuf,

        /// Cancer mortality table
        #[arg(long)]
        mortality: PathBuf,

        /// Merged output table
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Run the full pipeline
    Run {
        /// JSON pipeline configuration (defaults are used when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Apply the global flags on top of a configuration
    fn apply_overrides(&self, mut config: PipelineConfig) -> Result<PipelineConfig> {
        if let Some(year) = self.alignment_year {
            config = config.with_alignment_period(year);
        }
        if let Some(path) = &self.renames {
            config.renames = RenameTable::from_json_file(path)?;
        }
        if let Some(policy) = self.duplicates {
            config.duplicates = policy;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match &cli.command {
        Commands::Clean { input, output } => {
            let config = cli.apply_overrides(PipelineConfig {
                indicators: input.clone(),
                cleaned_output: Some(output.clone()),
                ..PipelineConfig::default()
            })?;
            let cleaned = Pipeline::new(config)?.clean()?;
            info!(
                "Wrote {} rows x {} indicators to {}",
                cleaned.table.num_rows(),
                cleaned.table.attributes().len(),
                output.display()
            );
        }
        Commands::Merge {
            indicators,
            incidence,
            mortality,
            output,
        } => {
            let config = cli.apply_overrides(PipelineConfig {
                datasets: vec![
                    DatasetSpec::new("incidence", incidence.clone(), DEFAULT_ALIGNMENT_PERIOD),
                    DatasetSpec::new("mortality", mortality.clone(), DEFAULT_ALIGNMENT_PERIOD),
                ],
                output: output.clone(),
                cleaned_output: None,
                ..PipelineConfig::default()
            })?;
            let pb = create_main_progress_bar(2, Some("loading cancer datasets"));
            let pipeline = Pipeline::new(config)?.with_progress(pb.clone());
            let wide = pipeline.load_wide_indicators(indicators)?;
            let merged = pipeline.merge(&wide)?;
            finish_progress_bar(&pb, Some("merge complete"));
            info!("Wrote {} merged rows to {}", merged.num_rows(), output.display());
        }
        Commands::Run { config } => {
            let base = match config {
                Some(path) => PipelineConfig::from_json_file(path)?,
                None => PipelineConfig::default(),
            };
            let config = cli.apply_overrides(base)?;
            let pb = create_main_progress_bar(RUN_STAGES, Some("cleaning indicators"));
            let report = Pipeline::new(config)?.with_progress(pb.clone()).run()?;
            finish_progress_bar(&pb, Some("pipeline complete"));

            for segment in &report.merged.segments {
                info!(
                    "{}: {} rows, {} matched, {} without indicator data",
                    segment.dataset,
                    segment.rows,
                    segment.matched,
                    segment.unmatched()
                );
            }
            let degenerate: Vec<&str> = report.imputation.degenerate_columns().collect();
            if !degenerate.is_empty() {
                info!("Indicators left without values: {}", degenerate.join(", "));
            }
        }
    }

    Ok(())
}
