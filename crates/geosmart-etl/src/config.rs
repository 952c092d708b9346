//! Configuration types for the ETL pipeline.
//!
//! The configuration is an immutable value built once and handed to the
//! pipeline; all per-run state (the table and derived artifacts) lives in the
//! `process` call itself, so independent pipeline values can run concurrently.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default number of soil categories reported in the profile.
const DEFAULT_TOP_K: usize = 5;

/// Configuration for the ETL pipeline.
///
/// Use [`EtlConfig::builder()`] for fluent construction.
///
/// # Example
///
/// ```rust,ignore
/// use geosmart_etl::EtlConfig;
///
/// let config = EtlConfig::builder()
///     .output_dir("processed")
///     .output_name("train")
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtlConfig {
    /// Directory where the cleaned table and profile are written.
    /// Default: "processed"
    pub output_dir: PathBuf,

    /// Base name for the output artifacts (`{name}_cleaned.parquet`,
    /// `{name}_profile.json`). If None, derived from the input file stem.
    /// Default: None
    pub output_name: Option<String>,

    /// Number of soil categories to keep in the profile. Truncation exists to
    /// bound the payload handed to the insight collaborator.
    /// Default: 5
    pub top_k: usize,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("processed"),
            output_name: None,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl EtlConfig {
    /// Create a new configuration builder.
    pub fn builder() -> EtlConfigBuilder {
        EtlConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.top_k == 0 {
            return Err(ConfigValidationError::InvalidTopK(self.top_k));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyOutputDir);
        }
        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid top_k: {0} (must be at least 1)")]
    InvalidTopK(usize),

    #[error("Output directory must not be empty")]
    EmptyOutputDir,
}

/// Builder for [`EtlConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct EtlConfigBuilder {
    output_dir: Option<PathBuf>,
    output_name: Option<String>,
    top_k: Option<usize>,
}

impl EtlConfigBuilder {
    /// Set the output directory for the cleaned table and profile.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set a custom base name for the output artifacts.
    ///
    /// If not set, the input file stem is used.
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Set the number of soil categories kept in the profile.
    pub fn top_k(mut self, k: usize) -> Self {
        self.top_k = Some(k);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `EtlConfig` or an error if validation fails.
    pub fn build(self) -> Result<EtlConfig, ConfigValidationError> {
        let config = EtlConfig {
            output_dir: self.output_dir.unwrap_or_else(|| PathBuf::from("processed")),
            output_name: self.output_name,
            top_k: self.top_k.unwrap_or(DEFAULT_TOP_K),
        };

        config.validate()?;
        Ok(config)
    }
}
