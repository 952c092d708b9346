//! Shared data types flowing through the pipeline and its collaborators.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Fitted standardization parameters for one continuous column.
///
/// `std` is the raw sample standard deviation; `scale` is the divisor that
/// was actually applied (1.0 when the column is constant, so the transform
/// never divides by zero).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnScale {
    pub name: String,
    pub mean: f64,
    pub std: f64,
    pub scale: f64,
}

/// Per-column scaling parameters fitted by one `fit_transform` call.
///
/// Transient by design: parameters live only for the duration of a single
/// pipeline run and are never persisted or reused across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScalingParams {
    pub columns: Vec<ColumnScale>,
}

impl ScalingParams {
    /// Look up the fitted parameters for a column by name.
    pub fn get(&self, name: &str) -> Option<&ColumnScale> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// One entry of the top-k soil-type distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub soil_type: u32,
    pub fraction: f64,
}

/// Compact statistical profile of a validated survey table.
///
/// This is the payload handed to the insight collaborator, so it is kept
/// small and serializes to primitive values only. The elevation statistics
/// are always raw-scale (pre-standardization) values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub dataset_rows: usize,
    /// Label-value relative frequencies; omitted for inference-only inputs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_type_balance: Option<BTreeMap<String, f64>>,
    /// Top soil categories by fraction of the full distribution, sorted by
    /// descending fraction with ties broken by ascending soil index.
    ///
    /// The external field name is fixed to `top_5_soil_types` regardless of
    /// the configured truncation depth; downstream consumers and prompts
    /// parse a stable key, and 5 is the documented default.
    #[serde(rename = "top_5_soil_types")]
    pub top_soil_types: Vec<CategoryShare>,
    pub elevation_mean: f64,
    pub elevation_std: f64,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutcome {
    pub rows: usize,
    pub cleaned_data_path: PathBuf,
    pub profile_path: PathBuf,
    pub summary: DatasetSummary,
    pub duration_ms: u64,
    pub finished_at: String,
}

/// Status of a storage upload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Success,
    Error,
}

/// Result of handing an artifact to the storage collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResult {
    pub status: UploadStatus,
    pub url: String,
    pub provider: String,
}

/// Token accounting reported by the insight collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Answer produced by the insight collaborator for one question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub answer: String,
    pub usage: TokenUsage,
}
