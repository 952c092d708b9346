//! End-to-end integration tests for the survey ETL pipeline.
//!
//! These tests exercise the full path from a CSV file on disk through
//! ingestion, validation, standardization and both sinks, using the seeded
//! synthetic generator for inputs.

use geosmart_etl::{EtlConfig, EtlPipeline, IntegrityValidator, Standardizer, synthetic};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::path::PathBuf;

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("geosmart-etl-integration-tests")
        .join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn pipeline_for(dir: &PathBuf) -> EtlPipeline {
    EtlPipeline::new(
        EtlConfig::builder()
            .output_dir(dir.join("processed"))
            .build()
            .unwrap(),
    )
    .unwrap()
}

fn set_indicator(df: &mut DataFrame, column: &str, row: usize, value: i8) {
    let mut values: Vec<i8> = df
        .column(column)
        .unwrap()
        .as_materialized_series()
        .i8()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect();
    values[row] = value;
    df.replace(column, Series::new(column.into(), values))
        .unwrap();
}

// ----------------------------------------------------------------------------
// Happy path
// ----------------------------------------------------------------------------

#[test]
fn test_full_run_on_clean_survey() {
    let dir = scratch_dir("clean");
    let input = dir.join("survey.csv");
    synthetic::write_survey_csv(&input, 1000, 17).unwrap();

    let outcome = pipeline_for(&dir).process(&input).unwrap();

    assert_eq!(outcome.rows, 1000);
    assert_eq!(outcome.summary.dataset_rows, 1000);
    assert!(outcome.cleaned_data_path.exists());
    assert!(outcome.profile_path.exists());

    // Profile content is well-formed JSON with the expected fields.
    let profile: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&outcome.profile_path).unwrap()).unwrap();
    assert_eq!(profile["dataset_rows"], 1000);
    assert!(profile["top_5_soil_types"].is_array());
    assert!(profile["top_5_soil_types"].as_array().unwrap().len() <= 5);
    assert!(profile["elevation_mean"].as_f64().unwrap() > 1000.0);
    assert!(profile["elevation_std"].as_f64().unwrap() > 0.0);

    let balance = profile["cover_type_balance"].as_object().unwrap();
    let total: f64 = balance.values().map(|v| v.as_f64().unwrap()).sum();
    assert!((total - 1.0).abs() < 1e-9);

    let top_sum: f64 = profile["top_5_soil_types"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["fraction"].as_f64().unwrap())
        .sum();
    assert!(top_sum <= 1.0 + 1e-9);
}

#[test]
fn test_cleaned_parquet_is_standardized() {
    let dir = scratch_dir("parquet");
    let input = dir.join("survey.csv");
    synthetic::write_survey_csv(&input, 400, 5).unwrap();

    let outcome = pipeline_for(&dir).process(&input).unwrap();

    let file = std::fs::File::open(&outcome.cleaned_data_path).unwrap();
    let df = ParquetReader::new(file).finish().unwrap();

    assert_eq!(df.height(), 400);
    assert_eq!(df.width(), 55);

    let elevation: Vec<f64> = df
        .column("Elevation")
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect();
    let mean: f64 = elevation.iter().sum::<f64>() / elevation.len() as f64;
    assert!(mean.abs() < 1e-3, "persisted elevation not standardized");

    // Indicators survive untouched.
    assert_eq!(df.column("Soil_Type1").unwrap().dtype(), &DataType::Int8);
}

#[test]
fn test_run_without_label_column() {
    let dir = scratch_dir("no_label");
    let input = dir.join("inference.csv");

    let mut df = synthetic::generate_survey(100, 8).unwrap();
    let _ = df.drop_in_place("Cover_Type").unwrap();
    synthetic::write_csv(&input, &mut df).unwrap();

    let outcome = pipeline_for(&dir).process(&input).unwrap();

    assert_eq!(outcome.rows, 100);
    assert!(outcome.summary.cover_type_balance.is_none());

    let profile = std::fs::read_to_string(&outcome.profile_path).unwrap();
    assert!(!profile.contains("cover_type_balance"));
}

// ----------------------------------------------------------------------------
// Circuit breaker
// ----------------------------------------------------------------------------

#[test]
fn test_corrupt_indicator_group_halts_run() {
    let dir = scratch_dir("corrupt_group");
    let input = dir.join("survey.csv");

    let mut df = synthetic::generate_survey(200, 23).unwrap();
    // Row 0 now belongs to two wilderness areas.
    set_indicator(&mut df, "Wilderness_Area1", 0, 1);
    set_indicator(&mut df, "Wilderness_Area2", 0, 1);
    synthetic::write_csv(&input, &mut df).unwrap();

    let processed = dir.join("processed");
    let err = pipeline_for(&dir).process(&input).unwrap_err();

    assert_eq!(err.error_code(), "LOGICAL_CONSISTENCY");
    assert!(err.is_integrity_failure());
    assert!(err.to_string().contains("wilderness_area"));

    // No partial artifacts.
    assert!(!processed.join("survey_cleaned.parquet").exists());
    assert!(!processed.join("survey_profile.json").exists());
}

#[test]
fn test_missing_value_halts_run() {
    let dir = scratch_dir("missing_value");
    let input = dir.join("survey.csv");

    let mut df = synthetic::generate_survey(80, 19).unwrap();
    let mut slopes: Vec<Option<f32>> = df
        .column("Slope")
        .unwrap()
        .as_materialized_series()
        .f32()
        .unwrap()
        .into_iter()
        .collect();
    slopes[17] = None;
    df.replace("Slope", Series::new("Slope".into(), slopes))
        .unwrap();
    synthetic::write_csv(&input, &mut df).unwrap();

    let processed = dir.join("processed");
    let err = pipeline_for(&dir).process(&input).unwrap_err();

    assert_eq!(err.error_code(), "NULL_VALUES");
    assert!(err.is_integrity_failure());

    // No partial artifacts.
    assert!(!processed.join("survey_cleaned.parquet").exists());
    assert!(!processed.join("survey_profile.json").exists());
}

#[test]
fn test_missing_required_column_halts_run() {
    let dir = scratch_dir("missing_column");
    let input = dir.join("survey.csv");

    let mut df = synthetic::generate_survey(50, 23).unwrap();
    let _ = df.drop_in_place("Hillshade_Noon").unwrap();
    synthetic::write_csv(&input, &mut df).unwrap();

    let err = pipeline_for(&dir).process(&input).unwrap_err();
    assert_eq!(err.error_code(), "SCHEMA_VIOLATION");
    assert!(err.to_string().contains("Hillshade_Noon"));
}

#[test]
fn test_missing_source_reported() {
    let dir = scratch_dir("no_source");
    let err = pipeline_for(&dir)
        .process(dir.join("does_not_exist.csv"))
        .unwrap_err();
    assert_eq!(err.error_code(), "SOURCE_NOT_FOUND");
}

// ----------------------------------------------------------------------------
// Library-level composition
// ----------------------------------------------------------------------------

#[test]
fn test_validator_and_standardizer_compose() {
    let mut df = synthetic::generate_survey(150, 31).unwrap();

    IntegrityValidator::validate(&df).unwrap();
    let params = Standardizer::fit_transform(&mut df).unwrap();

    // One fitted parameter set per continuous column.
    assert_eq!(params.columns.len(), 10);
    for scale in &params.columns {
        assert!(scale.scale > 0.0);
    }

    // Standardized table still passes integrity checks.
    IntegrityValidator::validate(&df).unwrap();
}

#[test]
fn test_repeated_runs_are_deterministic() {
    let dir = scratch_dir("determinism");
    let input = dir.join("survey.csv");
    synthetic::write_survey_csv(&input, 250, 13).unwrap();

    let pipeline = pipeline_for(&dir);
    let first = pipeline.process(&input).unwrap();
    let second = pipeline.process(&input).unwrap();

    assert_eq!(first.summary.elevation_mean, second.summary.elevation_mean);
    assert_eq!(first.summary.top_soil_types, second.summary.top_soil_types);
    assert_eq!(
        first.summary.cover_type_balance,
        second.summary.cover_type_balance
    );
}
