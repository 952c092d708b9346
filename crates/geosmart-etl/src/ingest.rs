//! Memory-optimized typed ingestion of the raw survey CSV.
//!
//! The reader applies an explicit per-column storage width instead of letting
//! the CSV parser default 0/1 indicators to 8-byte integers: indicator and
//! label columns are read as Int8, continuous columns as Float32. The
//! resulting footprint is bounded by `rows * (10*4 + 44*1 [+1])` bytes plus
//! any passthrough columns.

use crate::error::{EtlError, Result, ResultExt};
use crate::schema;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Read the survey table from `path` with the registry's storage discipline.
///
/// The optional label column (`Cover_Type`) is detected from the header
/// before it is declared typed, so inference-only inputs without supervision
/// data ingest cleanly. Every other registered column is required.
///
/// # Errors
///
/// - [`EtlError::SourceNotFound`] when the path does not exist or cannot be
///   opened.
/// - [`EtlError::SchemaViolation`] when a required column is absent, or when
///   a registered column carries a value that cannot be read under its
///   declared storage type (text in a continuous column, an indicator
///   outside the Int8 range).
pub fn ingest(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(EtlError::SourceNotFound(path.display().to_string()));
    }

    info!("Loading survey data from: {}", path.display());

    let header = probe_header(path)?;
    check_required_columns(&header)?;

    let has_label = header.iter().any(|c| c == schema::LABEL_COLUMN);
    if !has_label {
        debug!("No '{}' column; ingesting as inference-only input", schema::LABEL_COLUMN);
    }

    // Storage overrides for every registered column actually present.
    let mut overrides = Schema::with_capacity(header.len());
    for name in &header {
        if let Some(dtype) = schema::storage_type(name) {
            overrides.with_column(name.as_str().into(), dtype);
        }
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_schema_overwrite(Some(Arc::new(overrides)))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
        .map_err(classify_read_error)?;

    info!("Loaded {} rows x {} columns", df.height(), df.width());
    Ok(df)
}

/// Classify a typed-read failure.
///
/// A value that cannot be parsed under a registered column's storage type is
/// a schema violation (wrong representation, not a reader fault); anything
/// else stays a Polars error.
fn classify_read_error(e: PolarsError) -> EtlError {
    let message = e.to_string();
    if message.contains("could not parse") {
        let registered =
            schema::required_columns().chain(std::iter::once(schema::LABEL_COLUMN));
        for column in registered {
            if message.contains(&format!("'{}'", column)) {
                let detail = message.lines().next().unwrap_or_default().to_string();
                return EtlError::SchemaViolation {
                    column: column.to_string(),
                    reason: format!("has an incompatible representation: {}", detail),
                };
            }
        }
    }
    EtlError::Polars(e)
}

/// Read just the header row to learn which columns the source carries.
fn probe_header(path: &Path) -> Result<Vec<String>> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_n_rows(Some(1))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .context(format!("Failed to open CSV source {}", path.display()))?
        .finish()
        .context(format!("Failed to read CSV header of {}", path.display()))?;

    Ok(df
        .get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect())
}

fn check_required_columns(header: &[String]) -> Result<()> {
    for required in schema::required_columns() {
        if !header.iter().any(|c| c == required) {
            return Err(EtlError::SchemaViolation {
                column: required.to_string(),
                reason: "is missing".to_string(),
            });
        }
    }
    Ok(())
}
