//! Land-Cover Survey ETL Library
//!
//! A validation-and-profiling ETL pipeline for forest land-cover survey
//! datasets, built with Rust and Polars.
//!
//! # Overview
//!
//! The pipeline ingests a raw survey CSV, enforces integrity before anything
//! else touches the data, and produces two artifacts:
//!
//! - **Typed Ingestion**: Explicit per-column storage widths (Float32
//!   continuous features, Int8 indicators and label)
//! - **Integrity Gate**: Zero missing values; exactly one active indicator
//!   per row in the wilderness and soil groups
//! - **Standardization**: Z-score transform of all continuous columns, with
//!   the fitted raw-scale statistics retained for the profile
//! - **Dimensionality Folding**: One-hot soil indicators decoded into a
//!   single category series for frequency reporting
//! - **Profile Synthesis**: A compact, LLM-ready JSON summary (row count,
//!   label balance, top soil types, raw elevation statistics)
//! - **All-or-Nothing Sinks**: Cleaned parquet and profile JSON committed
//!   together or not at all
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use geosmart_etl::{EtlConfig, EtlPipeline};
//!
//! let pipeline = EtlPipeline::new(
//!     EtlConfig::builder()
//!         .output_dir("processed")
//!         .output_name("train")
//!         .build()?,
//! )?;
//!
//! let outcome = pipeline.process("data/covertype.csv")?;
//! println!("{} rows cleaned in {} ms", outcome.rows, outcome.duration_ms);
//! println!("Profile at {}", outcome.profile_path.display());
//! ```
//!
//! # Insight Collaborator
//!
//! With the `ai` feature (on by default), the generated profile can be
//! queried in natural language through the [`ai::InsightProvider`] trait;
//! [`ai::ChatCompletionsProvider`] works against any OpenAI-compatible API.
//!
//! # Storage Collaborators
//!
//! Artifacts can be published through [`storage::StorageProvider`]. The
//! built-in providers copy to a local directory or simulate an object-store
//! upload when no credentials are configured.

#[cfg(feature = "ai")]
pub mod ai;
pub mod config;
pub mod error;
pub mod fold;
pub mod ingest;
pub mod pipeline;
pub mod profiler;
pub mod schema;
pub mod standardize;
pub mod storage;
pub mod synthetic;
pub mod types;
pub mod validate;

// Re-exports for convenient access
pub use config::{ConfigValidationError, EtlConfig, EtlConfigBuilder};
pub use error::{EtlError, Result, ResultExt};
pub use pipeline::EtlPipeline;
pub use profiler::ProfileSynthesizer;
pub use schema::{ColumnRole, IndicatorGroup};
pub use standardize::Standardizer;
pub use storage::{LocalDirStorage, MockStorage, StorageConfig, StorageProvider};
pub use types::{
    CategoryShare, ColumnScale, DatasetSummary, Insight, PipelineOutcome, ScalingParams,
    TokenUsage, UploadResult, UploadStatus,
};
pub use validate::IntegrityValidator;
