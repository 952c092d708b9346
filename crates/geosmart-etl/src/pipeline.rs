//! End-to-end pipeline orchestration.
//!
//! One `process` call runs the full sequence: ingest, integrity validation,
//! standardization, soil folding, profile synthesis and the two sinks. The
//! sinks are all-or-nothing: both artifacts are staged to `.tmp` paths and
//! renamed into place only after every stage has succeeded, so a failed run
//! leaves no partial output behind.

use crate::config::EtlConfig;
use crate::error::{EtlError, Result, ResultExt};
use crate::fold;
use crate::ingest;
use crate::profiler::ProfileSynthesizer;
use crate::schema::IndicatorGroup;
use crate::standardize::Standardizer;
use crate::types::PipelineOutcome;
use crate::validate::IntegrityValidator;
use polars::prelude::*;
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// The survey ETL pipeline.
///
/// Holds only immutable configuration; all per-run state lives inside
/// [`EtlPipeline::process`], so one pipeline value can serve many runs.
#[derive(Debug)]
pub struct EtlPipeline {
    config: EtlConfig,
}

impl EtlPipeline {
    /// Create a pipeline from a validated configuration.
    pub fn new(config: EtlConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| EtlError::InvalidConfig(e.to_string()))?;
        Ok(Self { config })
    }

    /// Create a pipeline with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: EtlConfig::default(),
        }
    }

    pub fn config(&self) -> &EtlConfig {
        &self.config
    }

    /// Run the full pipeline against one CSV source.
    ///
    /// On success both sinks exist: `{name}_cleaned.parquet` with the
    /// standardized table and `{name}_profile.json` with the statistical
    /// summary. On any error, neither exists.
    pub fn process(&self, input: impl AsRef<Path>) -> Result<PipelineOutcome> {
        let input = input.as_ref();
        let started = Instant::now();
        info!("Pipeline run started for {}", input.display());

        let mut df = ingest::ingest(input)?;

        IntegrityValidator::validate(&df).context("Integrity validation failed")?;

        let params = Standardizer::fit_transform(&mut df)?;
        let folded_soil = fold::fold(&df, IndicatorGroup::Soil)?;

        let summary = ProfileSynthesizer::new(self.config.top_k)
            .synthesize(&df, &folded_soil, &params)?;

        let name = self.artifact_name(input)?;
        let (cleaned_data_path, profile_path) = self.write_sinks(&name, &mut df, &summary)?;

        let duration_ms = started.elapsed().as_millis() as u64;
        info!(
            "Pipeline run finished: {} rows in {} ms",
            df.height(),
            duration_ms
        );

        Ok(PipelineOutcome {
            rows: df.height(),
            cleaned_data_path,
            profile_path,
            summary,
            duration_ms,
            finished_at: chrono::Local::now().to_rfc3339(),
        })
    }

    /// Base name for the output artifacts: the configured name, else the
    /// input file stem.
    fn artifact_name(&self, input: &Path) -> Result<String> {
        if let Some(name) = &self.config.output_name {
            return Ok(name.clone());
        }
        input
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                EtlError::InvalidConfig(format!(
                    "cannot derive output name from '{}'",
                    input.display()
                ))
            })
    }

    /// Stage both artifacts to `.tmp` paths, then rename into place.
    fn write_sinks(
        &self,
        name: &str,
        df: &mut DataFrame,
        summary: &crate::types::DatasetSummary,
    ) -> Result<(PathBuf, PathBuf)> {
        fs::create_dir_all(&self.config.output_dir)
            .context("Failed to create output directory")?;

        let parquet_path = self.config.output_dir.join(format!("{name}_cleaned.parquet"));
        let profile_path = self.config.output_dir.join(format!("{name}_profile.json"));
        let parquet_tmp = parquet_path.with_extension("parquet.tmp");
        let profile_tmp = profile_path.with_extension("json.tmp");

        let write_result = (|| -> Result<()> {
            let file = File::create(&parquet_tmp)?;
            ParquetWriter::new(file).finish(df)?;

            let json = serde_json::to_string_pretty(summary)?;
            fs::write(&profile_tmp, json)?;
            Ok(())
        })();

        if let Err(e) = write_result {
            // Best-effort cleanup of the staged files.
            for staged in [&parquet_tmp, &profile_tmp] {
                if staged.exists() && fs::remove_file(staged).is_err() {
                    warn!("Could not remove staged file {}", staged.display());
                }
            }
            return Err(e.with_context("Failed to write sinks"));
        }

        fs::rename(&parquet_tmp, &parquet_path).context("Failed to commit parquet sink")?;
        fs::rename(&profile_tmp, &profile_path).context("Failed to commit profile sink")?;

        info!("Cleaned data saved to {}", parquet_path.display());
        info!("Profile saved to {}", profile_path.display());
        Ok((parquet_path, profile_path))
    }
}

static_assertions::assert_impl_all!(EtlPipeline: Send);
