use sdoh_merge::algorithm::reshape::{column_median, impute_medians};
use sdoh_merge::schema::ColumnNames;
use sdoh_merge::utils::arrow::{int_column, string_column};
use sdoh_merge::{
    DuplicatePolicy, Error, RecordBatch, Result, WideIndicatorTable, clean_indicators, read_table,
};

use crate::utils::{INDICATORS_CSV, write_fixture};

fn long_form() -> Result<RecordBatch> {
    Ok(RecordBatch::try_from_iter(vec![
        (
            "Geography",
            string_column(&[Some("B"), Some("A"), Some("A"), Some("C"), Some("B"), None]),
        ),
        (
            "Year",
            int_column(&[Some(2016), Some(2016), Some(2016), Some(2016), Some(2011), Some(2016)]),
        ),
        (
            "Indicator",
            string_column(&[Some("x"), Some("x"), Some("y"), Some("x"), Some("y"), Some("x")]),
        ),
        (
            "Value",
            string_column(&[Some("10"), Some("n/a"), Some("3"), Some("40"), Some("5"), Some("1")]),
        ),
    ])?)
}

/// One row per distinct (entity, period) and one column per distinct attribute
#[test]
fn test_pivot_shape() -> Result<()> {
    let cleaned = clean_indicators(
        &long_form()?,
        "indicators",
        &ColumnNames::default(),
        DuplicatePolicy::Mean,
    )?;
    let table = &cleaned.table;

    assert_eq!(table.num_rows(), 4);
    assert_eq!(table.entities(), ["A", "B", "B", "C"]);
    assert_eq!(table.periods(), [2016, 2011, 2016, 2016]);
    assert_eq!(table.attributes(), ["x", "y"]);
    assert_eq!(cleaned.pivot.skipped_rows, 1);
    assert_eq!(cleaned.pivot.coerced_missing, 1);
    Ok(())
}

/// Imputation fills only the missing cells, with the column median
#[test]
fn test_imputation_fills_median() -> Result<()> {
    let mut table = WideIndicatorTable::new(
        vec!["a".into(), "b".into(), "c".into(), "d".into()],
        vec![2016; 4],
        vec!["x".into()],
        vec![vec![Some(10.0), None, Some(30.0), Some(40.0)]],
    )?;
    let report = impute_medians(&mut table);

    assert_eq!(
        table.column("x"),
        Some([Some(10.0), Some(30.0), Some(30.0), Some(40.0)].as_slice())
    );
    assert_eq!(report.total_filled(), 1);
    assert_eq!(column_median(&[Some(1.0), Some(4.0)]), Some(2.5));
    Ok(())
}

/// A column with no numeric values stays missing
#[test]
fn test_degenerate_column_left_missing() -> Result<()> {
    let cleaned = clean_indicators(
        &long_form()?,
        "indicators",
        &ColumnNames::default(),
        DuplicatePolicy::Mean,
    )?;
    // "x" for A is unparseable but the column has other values
    assert_eq!(cleaned.table.value(0, "x"), Some(25.0));

    let mut table = WideIndicatorTable::new(
        vec!["a".into()],
        vec![2016],
        vec!["empty".into()],
        vec![vec![None]],
    )?;
    let report = impute_medians(&mut table);
    assert_eq!(report.degenerate_columns().collect::<Vec<_>>(), vec!["empty"]);
    assert_eq!(table.value(0, "empty"), None);
    Ok(())
}

/// Duplicate policies apply to values read from a file
#[test]
fn test_duplicate_policies_on_file_input() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("long.csv");
    write_fixture(&path, INDICATORS_CSV)?;
    let batch = read_table(&path, "indicators")?;
    let columns = ColumnNames::default();

    let income = |policy| -> Result<Option<f64>> {
        let cleaned = clean_indicators(&batch, "indicators", &columns, policy)?;
        Ok(cleaned.table.value(3, "Median income"))
    };
    assert_eq!(income(DuplicatePolicy::Mean)?, Some(61000.0));
    assert_eq!(income(DuplicatePolicy::First)?, Some(60000.0));
    assert_eq!(income(DuplicatePolicy::Last)?, Some(62000.0));

    let err = clean_indicators(&batch, "indicators", &columns, DuplicatePolicy::Reject).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::DuplicateEntry { entity, period: 2016, attribute })
            if entity == "Toronto" && attribute == "Median income"
    ));
    Ok(())
}

/// A long-form table without a value column is a schema error
#[test]
fn test_missing_value_column() -> Result<()> {
    let batch = RecordBatch::try_from_iter(vec![
        ("Geography", string_column(&[Some("A")])),
        ("Year", int_column(&[Some(2016)])),
        ("Indicator", string_column(&[Some("x")])),
    ])?;
    let err = clean_indicators(&batch, "indicators", &ColumnNames::default(), DuplicatePolicy::Mean)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::MissingColumn { column, .. }) if column == "Value"
    ));
    Ok(())
}
