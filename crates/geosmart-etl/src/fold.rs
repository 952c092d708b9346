//! Dimensionality folding of one-hot indicator groups.
//!
//! Folding decodes a group of 0/1 columns back into a single sequence of
//! category indices so the profile can report "soil type 29: 12%" instead of
//! shipping 40 sparse columns to the language model. The folded series is
//! used only for frequency aggregation and is never persisted as a column.

use crate::error::{EtlError, Result};
use crate::schema::{self, IndicatorGroup};
use polars::prelude::*;
use tracing::debug;

/// Decode `group` into one 1-based category index per row, in row order.
///
/// Rows with zero or multiple active indicators are rejected with
/// [`EtlError::FoldAmbiguity`] instead of silently picking a column; a table
/// that passed [`crate::IntegrityValidator`] can never trigger this.
pub fn fold(df: &DataFrame, group: IndicatorGroup) -> Result<Vec<u32>> {
    let columns = group.columns();
    let mut arrays = Vec::with_capacity(columns.len());
    let mut indices = Vec::with_capacity(columns.len());

    for name in columns {
        let index = schema::indicator_index(name, group).ok_or_else(|| {
            EtlError::SchemaViolation {
                column: name.clone(),
                reason: format!("is not a valid '{}' indicator column", group.name()),
            }
        })?;
        let col = df.column(name)?;
        arrays.push(col.as_materialized_series().i8()?.clone());
        indices.push(index);
    }

    let mut folded = Vec::with_capacity(df.height());

    for row in 0..df.height() {
        let mut active = 0usize;
        let mut category = 0u32;

        for (array, &index) in arrays.iter().zip(&indices) {
            if array.get(row) == Some(1) {
                active += 1;
                category = index;
            }
        }

        if active != 1 {
            return Err(EtlError::FoldAmbiguity {
                group: group.name().to_string(),
                row,
                active,
            });
        }

        folded.push(category);
    }

    debug!("Folded '{}' into {} category indices", group.name(), folded.len());
    Ok(folded)
}
