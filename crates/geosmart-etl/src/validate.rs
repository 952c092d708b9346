//! Integrity gate ("circuit breaker") for the ingested survey table.
//!
//! Every observation must be complete and must belong to exactly one
//! wilderness area and exactly one soil type. Accepting violating data would
//! silently corrupt downstream statistics, so validation halts the pipeline
//! on the first failed check with no partial cleaning.

use crate::error::{EtlError, Result};
use crate::schema::IndicatorGroup;
use polars::prelude::*;
use tracing::{debug, info};

/// Structural and logical checks over an ingested table. Pure, no mutation.
pub struct IntegrityValidator;

impl IntegrityValidator {
    /// Run all integrity checks in order, failing fast on the first violation.
    ///
    /// # Errors
    ///
    /// - [`EtlError::NullValues`] when any missing value exists anywhere.
    /// - [`EtlError::LogicalConsistency`] when an indicator group's per-row
    ///   sum differs from exactly 1 on any row.
    pub fn validate(df: &DataFrame) -> Result<()> {
        info!("Running integrity checks...");

        Self::check_completeness(df)?;
        Self::check_exclusivity(df, IndicatorGroup::Wilderness)?;
        Self::check_exclusivity(df, IndicatorGroup::Soil)?;

        info!("Integrity checks passed");
        Ok(())
    }

    /// Check 1: zero tolerance for missing values.
    ///
    /// Imputation policy is a business decision outside this pipeline, so
    /// nulls are treated as non-recoverable.
    fn check_completeness(df: &DataFrame) -> Result<()> {
        let null_count: usize = df.get_columns().iter().map(|col| col.null_count()).sum();

        if null_count > 0 {
            return Err(EtlError::NullValues { count: null_count });
        }

        debug!("Completeness check passed (0 missing values)");
        Ok(())
    }

    /// Check 2/3: every row carries exactly one active indicator per group.
    fn check_exclusivity(df: &DataFrame, group: IndicatorGroup) -> Result<()> {
        let sums = indicator_row_sums(df, group)?;
        let offending_rows = sums.iter().filter(|&&s| s != 1).count();

        if offending_rows > 0 {
            return Err(EtlError::LogicalConsistency {
                group: group.name().to_string(),
                offending_rows,
            });
        }

        debug!("Exclusivity check passed for '{}'", group.name());
        Ok(())
    }
}

/// Per-row sum over an indicator group's columns.
pub(crate) fn indicator_row_sums(df: &DataFrame, group: IndicatorGroup) -> Result<Vec<i32>> {
    let mut sums = vec![0i32; df.height()];

    for name in group.columns() {
        let col = df.column(name)?;
        let series = col.as_materialized_series();
        let values = series.i8()?;

        for (i, value) in values.into_iter().enumerate() {
            if let Some(v) = value {
                sums[i] += v as i32;
            }
        }
    }

    Ok(sums)
}
