use std::fs;
use std::path::{Path, PathBuf};

use arrow::array::{Array, Float64Array, StringArray};
use arrow::record_batch::RecordBatch;
use sdoh_merge::{DatasetSpec, PipelineConfig, Result};

/// Long-form indicator table with one duplicate triple, one unparseable
/// value and one historical region name
pub const INDICATORS_CSV: &str = "\
Geography,Year,Indicator,Value
Huron County Health Unit,2016,Median income,50000
Huron County Health Unit,2016,Unemployment rate,6.5
Toronto,2016,Median income,60000
Toronto,2016,Unemployment rate,x
Ottawa,2016,Median income,70000
Ottawa,2016,Unemployment rate,8.5
Ottawa,2011,Median income,65000
Toronto,2016,Median income,62000
";

/// Incidence table: renamed region, case/whitespace variant, unknown region
pub const INCIDENCE_CSV: &str = "\
Geography,Year,Cancer,Rate
Huron Perth Public Health,2012,Lung,70.1
TORONTO ,2012,Lung,55.0
Atlantis,2013,Breast,40.0
";

/// Mortality table with a historical region name
pub const MORTALITY_CSV: &str = "\
Geography,Year,Deaths
Ottawa,2010,120
Perth District Health Unit,2011,30
";

/// Write a text fixture, creating parent directories
pub fn write_fixture(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

/// Write the standard input files under `dir` and return a configuration
/// pointing at them
pub fn fixture_config(dir: &Path) -> Result<PipelineConfig> {
    let raw = dir.join("raw");
    write_fixture(&raw.join("indicators.csv"), INDICATORS_CSV)?;
    write_fixture(&raw.join("incidence.csv"), INCIDENCE_CSV)?;
    write_fixture(&raw.join("mortality.csv"), MORTALITY_CSV)?;

    Ok(PipelineConfig {
        indicators: raw.join("indicators.csv"),
        cleaned_output: Some(output_path(dir, "wide.csv")),
        datasets: vec![
            DatasetSpec::new("incidence", raw.join("incidence.csv"), 2016),
            DatasetSpec::new("mortality", raw.join("mortality.csv"), 2016),
        ],
        output: output_path(dir, "merged.csv"),
        ..PipelineConfig::default()
    })
}

/// Path of a file under the output directory of a fixture run
#[must_use]
pub fn output_path(dir: &Path, name: &str) -> PathBuf {
    dir.join("processed").join(name)
}

/// Column names of a batch in order
#[must_use]
pub fn column_names(batch: &RecordBatch) -> Vec<String> {
    batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect()
}

/// String values of a named column
#[must_use]
pub fn strings(batch: &RecordBatch, column: &str) -> Vec<Option<String>> {
    let idx = batch.schema().index_of(column).expect("column present");
    let array = batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .expect("Utf8 column");
    array.iter().map(|v| v.map(str::to_string)).collect()
}

/// Float values of a named column
#[must_use]
pub fn floats(batch: &RecordBatch, column: &str) -> Vec<Option<f64>> {
    let idx = batch.schema().index_of(column).expect("column present");
    let array = batch
        .column(idx)
        .as_any()
        .downcast_ref::<Float64Array>()
        .expect("Float64 column");
    array.iter().collect()
}
