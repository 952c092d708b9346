//! Seeded synthetic survey generator.
//!
//! Produces schema-conforming fixtures for integration tests and local dry
//! runs: strictly one-hot indicator groups, plausible continuous ranges and
//! labels 1..7. Not part of the pipeline contract.

use crate::error::Result;
use crate::schema;
use polars::prelude::*;
use rand::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Generate a `rows`-observation survey table from a fixed seed.
///
/// Row 0 gets a deliberately extreme elevation so standardization has a
/// visible outlier to absorb.
pub fn generate_survey(rows: usize, seed: u64) -> Result<DataFrame> {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut columns: Vec<Column> = Vec::with_capacity(55);

    let mut elevation: Vec<f32> = (0..rows)
        .map(|_| rng.gen_range(2300.0..2700.0))
        .collect();
    if !elevation.is_empty() {
        elevation[0] = 3500.0;
    }
    columns.push(Column::new("Elevation".into(), elevation));
    columns.push(Column::new(
        "Aspect".into(),
        (0..rows)
            .map(|_| rng.gen_range(0.0f32..360.0))
            .collect::<Vec<_>>(),
    ));
    columns.push(Column::new(
        "Slope".into(),
        (0..rows)
            .map(|_| rng.gen_range(0.0f32..45.0))
            .collect::<Vec<_>>(),
    ));
    for name in [
        "Horizontal_Distance_To_Hydrology",
        "Vertical_Distance_To_Hydrology",
        "Horizontal_Distance_To_Roadways",
        "Horizontal_Distance_To_Fire_Points",
    ] {
        columns.push(Column::new(
            name.into(),
            (0..rows)
                .map(|_| rng.gen_range(-50.0f32..5000.0))
                .collect::<Vec<_>>(),
        ));
    }
    for name in ["Hillshade_9am", "Hillshade_Noon", "Hillshade_3pm"] {
        columns.push(Column::new(
            name.into(),
            (0..rows)
                .map(|_| rng.gen_range(0..255) as f32)
                .collect::<Vec<_>>(),
        ));
    }

    // One-hot groups: draw one slot per row, set exactly that column to 1.
    let wilderness_slots: Vec<usize> = (0..rows)
        .map(|_| rng.gen_range(0..schema::WILDERNESS_COUNT))
        .collect();
    for (slot, name) in schema::wilderness_columns().iter().enumerate() {
        let values: Vec<i8> = wilderness_slots.iter().map(|&s| (s == slot) as i8).collect();
        columns.push(Column::new(name.as_str().into(), values));
    }

    let soil_slots: Vec<usize> = (0..rows)
        .map(|_| rng.gen_range(0..schema::SOIL_COUNT))
        .collect();
    for (slot, name) in schema::soil_columns().iter().enumerate() {
        let values: Vec<i8> = soil_slots.iter().map(|&s| (s == slot) as i8).collect();
        columns.push(Column::new(name.as_str().into(), values));
    }

    let labels: Vec<i8> = (0..rows).map(|_| rng.gen_range(1..8)).collect();
    columns.push(Column::new(schema::LABEL_COLUMN.into(), labels));

    Ok(DataFrame::new(columns)?)
}

/// Write a generated survey straight to a CSV file.
pub fn write_survey_csv(path: impl AsRef<Path>, rows: usize, seed: u64) -> Result<()> {
    let mut df = generate_survey(rows, seed)?;
    write_csv(path.as_ref(), &mut df)?;
    info!("Synthetic survey written ({} rows)", rows);
    Ok(())
}

/// Write any DataFrame as a headered CSV.
pub fn write_csv(path: &Path, df: &mut DataFrame) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(df)?;
    Ok(())
}
