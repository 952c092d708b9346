//! Z-score standardization of the continuous survey columns.

use crate::error::Result;
use crate::schema;
use crate::types::{ColumnScale, ScalingParams};
use polars::prelude::*;
use tracing::{debug, info};

/// Fits and applies a zero-mean/unit-variance transform in place.
pub struct Standardizer;

impl Standardizer {
    /// Rewrite every continuous column as `(v - mean) / std` in Float32.
    ///
    /// Statistics use the sample standard deviation (ddof = 1). Constant
    /// columns get a scale divisor of 1.0, so they are centered to zero
    /// rather than producing NaN. The fitted parameters are returned for the
    /// profile synthesizer (they are exactly the raw-scale statistics) and
    /// are not retained anywhere else.
    ///
    /// Deterministic given identical input; all other columns and the row
    /// count are untouched.
    pub fn fit_transform(df: &mut DataFrame) -> Result<ScalingParams> {
        info!(
            "Standardizing {} continuous columns...",
            schema::CONTINUOUS_COLUMNS.len()
        );

        let mut params = ScalingParams::default();

        for name in schema::CONTINUOUS_COLUMNS {
            let series = df.column(name)?.as_materialized_series();
            let float_series = series.cast(&DataType::Float64)?;

            let mean = float_series.mean().unwrap_or(0.0);
            let std = sample_std(&float_series, mean)?;
            let scale = if std == 0.0 { 1.0 } else { std };

            let values: Vec<f32> = float_series
                .f64()?
                .into_iter()
                .map(|v| v.map(|val| ((val - mean) / scale) as f32).unwrap_or(f32::NAN))
                .collect();

            df.replace(name, Series::new(name.into(), values))?;

            debug!("  {}: mean={:.3}, std={:.3}", name, mean, std);
            params.columns.push(ColumnScale {
                name: name.to_string(),
                mean,
                std,
                scale,
            });
        }

        Ok(params)
    }
}

/// Sample standard deviation (ddof = 1) of a Float64 series.
fn sample_std(series: &Series, mean: f64) -> Result<f64> {
    let n = series.len() as f64;
    if n <= 1.0 {
        return Ok(0.0);
    }

    let variance: f64 = series
        .f64()?
        .into_iter()
        .filter_map(|v| v.map(|val| (val - mean).powi(2)))
        .sum::<f64>()
        / (n - 1.0);

    Ok(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic;

    fn column_values(df: &DataFrame, name: &str) -> Vec<f64> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .cast(&DataType::Float64)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect()
    }

    #[test]
    fn test_standardized_columns_are_zero_mean_unit_variance() {
        let mut df = synthetic::generate_survey(500, 21).unwrap();
        Standardizer::fit_transform(&mut df).unwrap();

        for name in schema::CONTINUOUS_COLUMNS {
            let values = column_values(&df, name);
            let n = values.len() as f64;
            let mean: f64 = values.iter().sum::<f64>() / n;
            let std =
                (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt();

            assert!(mean.abs() < 1e-4, "{}: mean {} not ~0", name, mean);
            assert!((std - 1.0).abs() < 1e-3, "{}: std {} not ~1", name, std);
        }
    }

    #[test]
    fn test_params_carry_raw_statistics() {
        let mut df = synthetic::generate_survey(200, 21).unwrap();
        let raw = column_values(&df, "Elevation");
        let raw_mean: f64 = raw.iter().sum::<f64>() / raw.len() as f64;

        let params = Standardizer::fit_transform(&mut df).unwrap();
        let elevation = params.get("Elevation").unwrap();

        assert!((elevation.mean - raw_mean).abs() < 1e-6);
        assert!(elevation.std > 0.0);
        assert_eq!(elevation.scale, elevation.std);
    }

    #[test]
    fn test_constant_column_centered_without_nan() {
        let mut df = synthetic::generate_survey(50, 21).unwrap();
        df.replace("Slope", Series::new("Slope".into(), vec![7.5f32; 50]))
            .unwrap();

        let params = Standardizer::fit_transform(&mut df).unwrap();
        let slope = params.get("Slope").unwrap();
        assert_eq!(slope.std, 0.0);
        assert_eq!(slope.scale, 1.0);

        let values = column_values(&df, "Slope");
        assert!(values.iter().all(|v| v.is_finite()));
        assert!(values.iter().all(|v| v.abs() < 1e-6));
    }

    #[test]
    fn test_other_columns_untouched() {
        let mut df = synthetic::generate_survey(50, 21).unwrap();
        let wilderness_before: Vec<i8> = df
            .column("Wilderness_Area1")
            .unwrap()
            .as_materialized_series()
            .i8()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect();

        Standardizer::fit_transform(&mut df).unwrap();

        let wilderness_after: Vec<i8> = df
            .column("Wilderness_Area1")
            .unwrap()
            .as_materialized_series()
            .i8()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect();
        assert_eq!(wilderness_before, wilderness_after);
        assert_eq!(df.height(), 50);
    }
}
