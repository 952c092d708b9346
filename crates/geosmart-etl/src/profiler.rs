//! Profile synthesis: a small, fixed-shape statistical summary of the table.
//!
//! The summary is built for inclusion in a language-model prompt, so every
//! aggregate is bounded: the full soil distribution is truncated to the top-k
//! categories and the label balance has at most one entry per distinct label.
//! Elevation statistics are reported on the raw scale, sourced from the
//! fitted scaling parameters rather than the (already standardized) column.

use crate::error::{EtlError, Result};
use crate::schema;
use crate::types::{CategoryShare, DatasetSummary, ScalingParams};
use polars::prelude::*;
use std::collections::BTreeMap;
use tracing::info;

/// Builds a [`DatasetSummary`] from a validated table and its derived series.
pub struct ProfileSynthesizer {
    top_k: usize,
}

impl ProfileSynthesizer {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    /// Aggregate row count, label balance, soil distribution and elevation
    /// statistics into one summary value.
    ///
    /// `folded_soil` must be the fold of the soil indicator group, one index
    /// per row in row order. The label balance is omitted when the table has
    /// no `Cover_Type` column.
    pub fn synthesize(
        &self,
        df: &DataFrame,
        folded_soil: &[u32],
        params: &ScalingParams,
    ) -> Result<DatasetSummary> {
        info!("Synthesizing dataset profile (top_k={})...", self.top_k);

        let elevation = params.get("Elevation").ok_or_else(|| {
            EtlError::InvalidConfig("scaling parameters missing 'Elevation'".to_string())
        })?;

        Ok(DatasetSummary {
            dataset_rows: df.height(),
            cover_type_balance: self.label_balance(df)?,
            top_soil_types: self.top_categories(folded_soil),
            elevation_mean: elevation.mean,
            elevation_std: elevation.std,
        })
    }

    /// Relative frequency of each label value, when the label is present.
    fn label_balance(&self, df: &DataFrame) -> Result<Option<BTreeMap<String, f64>>> {
        let Ok(col) = df.column(schema::LABEL_COLUMN) else {
            return Ok(None);
        };

        let values = col.as_materialized_series().i8()?;
        let total = values.len() as f64;
        if total == 0.0 {
            return Ok(Some(BTreeMap::new()));
        }

        let mut counts: BTreeMap<i8, usize> = BTreeMap::new();
        for value in values.into_iter().flatten() {
            *counts.entry(value).or_insert(0) += 1;
        }

        Ok(Some(
            counts
                .into_iter()
                .map(|(label, count)| (label.to_string(), count as f64 / total))
                .collect(),
        ))
    }

    /// Top-k categories by fraction of the full distribution.
    ///
    /// Fractions are normalized over all rows before truncation, so the
    /// reported values sum to at most 1 (exactly 1 when k covers every
    /// distinct category). Sorted by descending fraction, ties broken by
    /// ascending category index for determinism.
    fn top_categories(&self, folded: &[u32]) -> Vec<CategoryShare> {
        let total = folded.len() as f64;
        if total == 0.0 {
            return Vec::new();
        }

        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for &category in folded {
            *counts.entry(category).or_insert(0) += 1;
        }

        let mut shares: Vec<CategoryShare> = counts
            .into_iter()
            .map(|(soil_type, count)| CategoryShare {
                soil_type,
                fraction: count as f64 / total,
            })
            .collect();

        shares.sort_by(|a, b| {
            b.fraction
                .partial_cmp(&a.fraction)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.soil_type.cmp(&b.soil_type))
        });
        shares.truncate(self.top_k);
        shares
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standardize::Standardizer;
    use crate::synthetic;
    use pretty_assertions::assert_eq;

    fn params_for(df: &mut DataFrame) -> ScalingParams {
        Standardizer::fit_transform(df).unwrap()
    }

    #[test]
    fn test_profile_shape() {
        let mut df = synthetic::generate_survey(300, 33).unwrap();
        let folded = crate::fold::fold(&df, schema::IndicatorGroup::Soil).unwrap();
        let params = params_for(&mut df);

        let summary = ProfileSynthesizer::new(5)
            .synthesize(&df, &folded, &params)
            .unwrap();

        assert_eq!(summary.dataset_rows, 300);
        assert!(summary.top_soil_types.len() <= 5);

        let sum: f64 = summary.top_soil_types.iter().map(|s| s.fraction).sum();
        assert!(sum <= 1.0 + 1e-9);

        // Sorted by descending fraction.
        for pair in summary.top_soil_types.windows(2) {
            assert!(pair[0].fraction >= pair[1].fraction);
        }
    }

    #[test]
    fn test_label_balance_sums_to_one() {
        let mut df = synthetic::generate_survey(200, 33).unwrap();
        let folded = crate::fold::fold(&df, schema::IndicatorGroup::Soil).unwrap();
        let params = params_for(&mut df);

        let summary = ProfileSynthesizer::new(5)
            .synthesize(&df, &folded, &params)
            .unwrap();

        let balance = summary.cover_type_balance.unwrap();
        let total: f64 = balance.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_label_balance_omitted_without_label() {
        let mut df = synthetic::generate_survey(50, 33).unwrap();
        let _ = df.drop_in_place(schema::LABEL_COLUMN).unwrap();
        let folded = crate::fold::fold(&df, schema::IndicatorGroup::Soil).unwrap();
        let params = params_for(&mut df);

        let summary = ProfileSynthesizer::new(5)
            .synthesize(&df, &folded, &params)
            .unwrap();
        assert!(summary.cover_type_balance.is_none());
    }

    #[test]
    fn test_elevation_reported_on_raw_scale() {
        let mut df = synthetic::generate_survey(400, 33).unwrap();
        let folded = crate::fold::fold(&df, schema::IndicatorGroup::Soil).unwrap();
        let params = params_for(&mut df);

        let summary = ProfileSynthesizer::new(5)
            .synthesize(&df, &folded, &params)
            .unwrap();

        // The synthetic generator centers elevation around 2500 m; the
        // standardized column itself is ~0, so a raw-scale mean proves the
        // parameters were used.
        assert!(summary.elevation_mean > 1000.0);
        assert!(summary.elevation_std > 0.0);
    }

    #[test]
    fn test_tie_break_ascending_index() {
        // Two categories with identical counts: lower index must come first.
        let folded = vec![7u32, 7, 3, 3, 12, 12, 12];
        let shares = ProfileSynthesizer::new(5).top_categories(&folded);

        assert_eq!(shares[0].soil_type, 12);
        assert_eq!(shares[1].soil_type, 3);
        assert_eq!(shares[2].soil_type, 7);
    }

    #[test]
    fn test_truncation_to_top_k() {
        let folded: Vec<u32> = (1..=10).flat_map(|c| vec![c; c as usize]).collect();
        let shares = ProfileSynthesizer::new(3).top_categories(&folded);

        assert_eq!(shares.len(), 3);
        assert_eq!(shares[0].soil_type, 10);
        assert_eq!(shares[1].soil_type, 9);
        assert_eq!(shares[2].soil_type, 8);
    }
}
