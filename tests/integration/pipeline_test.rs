use std::fs;

use sdoh_merge::{Error, Pipeline, Result, read_table};

use crate::utils::{column_names, fixture_config, floats, output_path, strings, write_fixture};

/// Test a full run on the fixture files
#[test]
fn test_full_run_merges_both_datasets() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = fixture_config(dir.path())?;
    let report = Pipeline::new(config)?.run()?;
    let merged = &report.merged;

    // Every cancer row appears exactly once, incidence first
    assert_eq!(merged.num_rows(), 5);
    assert_eq!(merged.segment_range("incidence"), Some(0..3));
    assert_eq!(merged.segment_range("mortality"), Some(3..5));
    assert_eq!(merged.segments[0].matched, 2);
    assert_eq!(merged.segments[1].matched, 2);

    assert_eq!(
        column_names(&merged.batch),
        vec![
            "Geography",
            "Year",
            "Cancer",
            "Rate",
            "SDOH_Year",
            "Geography_clean",
            "Median income",
            "Unemployment rate",
            "Deaths",
        ]
    );

    assert_eq!(
        strings(&merged.batch, "Geography_clean"),
        vec![
            Some("huron perth public health".to_string()),
            Some("toronto".to_string()),
            Some("atlantis".to_string()),
            Some("ottawa".to_string()),
            Some("huron perth public health".to_string()),
        ]
    );
    assert_eq!(
        strings(&merged.batch, "Geography")[4].as_deref(),
        Some("Huron Perth Public Health")
    );

    // Toronto's income is the mean of its duplicates, its unemployment the
    // column median
    assert_eq!(
        floats(&merged.batch, "Median income"),
        vec![Some(50000.0), Some(61000.0), None, Some(70000.0), Some(50000.0)]
    );
    assert_eq!(
        floats(&merged.batch, "Unemployment rate"),
        vec![Some(6.5), Some(7.5), None, Some(8.5), Some(6.5)]
    );

    assert_eq!(report.pivot.duplicate_cells, 1);
    assert_eq!(report.imputation.total_filled(), 2);

    let written = read_table(&output_path(dir.path(), "merged.csv"), "merged")?;
    assert_eq!(written.num_rows(), 5);
    assert_eq!(column_names(&written), column_names(&merged.batch));

    let cleaned = read_table(&output_path(dir.path(), "wide.csv"), "cleaned")?;
    assert_eq!(cleaned.num_rows(), 4);
    assert!(column_names(&cleaned).contains(&"Geography_clean".to_string()));
    Ok(())
}

/// Two runs over identical files must produce byte-identical output
#[test]
fn test_runs_are_deterministic() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut config = fixture_config(dir.path())?;

    Pipeline::new(config.clone())?.run()?;
    let first = fs::read(&config.output)?;

    config.output = output_path(dir.path(), "merged_again.csv");
    Pipeline::new(config.clone())?.run()?;
    let second = fs::read(&config.output)?;

    assert!(!first.is_empty());
    assert_eq!(first, second);
    Ok(())
}

/// Cleaning then merging from the written wide table matches a full run
#[test]
fn test_clean_then_merge_matches_full_run() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = fixture_config(dir.path())?;
    let pipeline = Pipeline::new(config.clone())?;
    let report = pipeline.run()?;

    let wide_path = config.cleaned_output.clone().expect("fixture writes cleaned output");
    let wide = pipeline.load_wide_indicators(&wide_path)?;
    let merged = pipeline.merge(&wide)?;

    assert_eq!(merged.segments, report.merged.segments);
    assert_eq!(merged.batch, report.merged.batch);
    Ok(())
}

/// Output written as Parquet reads back with the same shape
#[test]
fn test_parquet_output() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut config = fixture_config(dir.path())?;
    config.output = output_path(dir.path(), "merged.parquet");
    config.cleaned_output = None;

    let report = Pipeline::new(config.clone())?.run()?;
    let written = read_table(&config.output, "merged")?;
    assert_eq!(written.num_rows(), report.merged.num_rows());
    assert_eq!(column_names(&written), column_names(&report.merged.batch));
    assert_eq!(
        floats(&written, "Unemployment rate"),
        floats(&report.merged.batch, "Unemployment rate")
    );
    Ok(())
}

/// A cancer table without a period column halts the run with a schema error
#[test]
fn test_missing_column_names_table_and_column() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = fixture_config(dir.path())?;
    write_fixture(&config.datasets[1].path, "Geography,Deaths\nOttawa,120\n")?;

    let err = Pipeline::new(config.clone())?.run().unwrap_err();
    match err.downcast_ref::<Error>() {
        Some(Error::MissingColumn { table, column }) => {
            assert_eq!(table, "mortality");
            assert_eq!(column, "Year");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!config.output.exists());
    Ok(())
}

/// A missing input file is reported with its purpose
#[test]
fn test_missing_input_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let mut config = fixture_config(dir.path())?;
    config.indicators = dir.path().join("raw").join("absent.csv");

    let err = Pipeline::new(config)?.run().unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("absent.csv"));
    assert!(message.contains("indicators"));
    Ok(())
}
