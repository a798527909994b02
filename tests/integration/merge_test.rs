use sdoh_merge::utils::arrow::{float_column, int_column, string_column};
use sdoh_merge::{
    CancerDataset, ColumnNames, RecordBatch, RenameTable, Result, WideIndicatorTable, canonical_key,
    merge_datasets,
};

use crate::utils::{column_names, floats, strings};

fn indicators() -> Result<WideIndicatorTable> {
    WideIndicatorTable::new(
        vec![
            "Huron County Health Unit".into(),
            "Ottawa".into(),
            "Ottawa".into(),
        ],
        vec![2016, 2011, 2016],
        vec!["Income".into()],
        vec![vec![Some(1.0), Some(2.0), Some(3.0)]],
    )
}

fn dataset(name: &str, regions: &[&str], period: i64) -> Result<CancerDataset> {
    let years: Vec<Option<i64>> = regions.iter().map(|_| Some(2012)).collect();
    let rates: Vec<Option<f64>> = (0..regions.len()).map(|i| Some(i as f64)).collect();
    let batch = RecordBatch::try_from_iter(vec![
        (
            "Geography",
            string_column(&regions.iter().map(|r| Some(*r)).collect::<Vec<_>>()),
        ),
        ("Year", int_column(&years)),
        ("Rate", float_column(&rates)),
    ])?;
    Ok(CancerDataset::new(name, batch, period))
}

/// Historical names and case/whitespace variants of the current name share a key
#[test]
fn test_rename_variants_share_a_key() {
    let renames = RenameTable::default();
    let expected = "huron perth public health";
    for name in [
        "Huron County Health Unit",
        "Perth District Health Unit",
        "Huron Perth Public Health",
        "  HURON PERTH PUBLIC HEALTH ",
        " huron perth public health",
    ] {
        assert_eq!(canonical_key(name, &renames), expected, "{name:?}");
    }
    assert_eq!(canonical_key(expected, &renames), expected);
}

/// A lowercased historical name is not renamed and keeps its own key
#[test]
fn test_case_variant_of_historical_name_is_kept() -> Result<()> {
    let datasets = vec![dataset("incidence", &["huron county health unit"], 2016)?];
    let merged = merge_datasets(
        &indicators()?,
        &datasets,
        &ColumnNames::default(),
        &RenameTable::default(),
    )?;

    assert_eq!(
        strings(&merged.batch, "Geography"),
        vec![Some("huron county health unit".to_string())]
    );
    assert_eq!(
        strings(&merged.batch, "Geography_clean"),
        vec![Some("huron county health unit".to_string())]
    );
    assert_eq!(merged.segments[0].matched, 0);
    Ok(())
}

/// Each segment keeps exactly its input rows, in input order
#[test]
fn test_join_coverage_and_order() -> Result<()> {
    let datasets = vec![
        dataset("incidence", &["Ottawa", "Nowhere", "Huron County Health Unit"], 2016)?,
        dataset("mortality", &["Perth District Health Unit", "ottawa"], 2011)?,
    ];
    let merged = merge_datasets(
        &indicators()?,
        &datasets,
        &ColumnNames::default(),
        &RenameTable::default(),
    )?;

    assert_eq!(merged.num_rows(), 5);
    assert_eq!(floats(&merged.batch, "Rate"), vec![Some(0.0), Some(1.0), Some(2.0), Some(0.0), Some(1.0)]);
    assert_eq!(
        floats(&merged.batch, "Income"),
        vec![Some(3.0), None, Some(1.0), None, Some(2.0)]
    );
    assert_eq!(
        strings(&merged.batch, "Geography"),
        vec![
            Some("Ottawa".to_string()),
            Some("Nowhere".to_string()),
            Some("Huron Perth Public Health".to_string()),
            Some("Huron Perth Public Health".to_string()),
            Some("ottawa".to_string()),
        ]
    );
    Ok(())
}

/// A dataset with no matches still contributes all of its rows
#[test]
fn test_zero_matches_is_not_an_error() -> Result<()> {
    let datasets = vec![dataset("incidence", &["Ottawa", "Toronto"], 1999)?];
    let merged = merge_datasets(
        &indicators()?,
        &datasets,
        &ColumnNames::default(),
        &RenameTable::default(),
    )?;

    assert_eq!(merged.num_rows(), 2);
    assert_eq!(merged.segments[0].matched, 0);
    assert_eq!(merged.segments[0].unmatched(), 2);
    assert_eq!(floats(&merged.batch, "Income"), vec![None, None]);
    Ok(())
}

/// Custom column names flow through the join
#[test]
fn test_custom_column_names() -> Result<()> {
    let columns = ColumnNames {
        entity: "Region".into(),
        period: "Period".into(),
        entity_clean: "region_key".into(),
        alignment_period: "aligned_period".into(),
        ..ColumnNames::default()
    };
    let batch = RecordBatch::try_from_iter(vec![
        ("Region", string_column(&[Some("Ottawa")])),
        ("Period", int_column(&[Some(2014)])),
    ])?;
    let datasets = vec![CancerDataset::new("incidence", batch, 2016)];
    let merged = merge_datasets(&indicators()?, &datasets, &columns, &RenameTable::default())?;

    assert_eq!(
        column_names(&merged.batch),
        vec!["Region", "Period", "aligned_period", "region_key", "Income"]
    );
    assert_eq!(floats(&merged.batch, "Income"), vec![Some(3.0)]);
    Ok(())
}

/// Extending the rename table changes matching without touching the data
#[test]
fn test_extended_rename_table() -> Result<()> {
    let renames = RenameTable::default().with_rename(
        "local-2024",
        "Ottawa-Carleton Health Unit",
        "Ottawa",
    )?;
    let datasets = vec![dataset("incidence", &["Ottawa-Carleton Health Unit"], 2016)?];
    let merged = merge_datasets(&indicators()?, &datasets, &ColumnNames::default(), &renames)?;

    assert_eq!(merged.segments[0].matched, 1);
    assert_eq!(floats(&merged.batch, "Income"), vec![Some(3.0)]);
    assert_eq!(renames.version(), "local-2024");
    Ok(())
}
