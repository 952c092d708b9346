//! Custom error types for the survey ETL pipeline.
//!
//! The pipeline is a hard gate: every check is local and unconditional, and
//! any failure aborts the run before a sink is written. Errors carry enough
//! context (which check, how many offending rows) for the caller to decide
//! remediation, and serialize as `{code, message}` for service boundaries.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the ETL pipeline.
#[derive(Error, Debug)]
pub enum EtlError {
    /// Input source missing or unreadable; nothing was ingested.
    #[error("Source not found or unreadable: {0}")]
    SourceNotFound(String),

    /// A required column is absent or carries values that cannot be read
    /// under its declared storage type (the optional label is exempt from
    /// the absence rule, not the representation rule).
    #[error("Schema violation: column '{column}' {reason}")]
    SchemaViolation { column: String, reason: String },

    /// Missing values detected; the pipeline never imputes.
    #[error("Dataset contains {count} missing value(s); cleaning aborted")]
    NullValues { count: usize },

    /// An indicator group failed its one-hot exclusivity invariant.
    #[error(
        "Logical consistency violation in '{group}': {offending_rows} row(s) do not sum to exactly 1"
    )]
    LogicalConsistency { group: String, offending_rows: usize },

    /// A row is ambiguous for categorical folding (zero or multiple active indicators).
    #[error("Fold ambiguity in '{group}' at row {row}: {active} active indicator(s)")]
    FoldAmbiguity {
        group: String,
        row: usize,
        active: usize,
    },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error (insight collaborator, only with "ai" feature).
    #[cfg(feature = "ai")]
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EtlError>,
    },
}

impl EtlError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EtlError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for callers that dispatch on failure class.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SourceNotFound(_) => "SOURCE_NOT_FOUND",
            Self::SchemaViolation { .. } => "SCHEMA_VIOLATION",
            Self::NullValues { .. } => "NULL_VALUES",
            Self::LogicalConsistency { .. } => "LOGICAL_CONSISTENCY",
            Self::FoldAmbiguity { .. } => "FOLD_AMBIGUITY",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            #[cfg(feature = "ai")]
            Self::HttpRequest(_) => "HTTP_REQUEST_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether this error was raised by an integrity check (as opposed to an
    /// IO or environment failure). Integrity failures indicate bad input data.
    pub fn is_integrity_failure(&self) -> bool {
        match self {
            Self::NullValues { .. }
            | Self::LogicalConsistency { .. }
            | Self::FoldAmbiguity { .. }
            | Self::SchemaViolation { .. } => true,
            Self::WithContext { source, .. } => source.is_integrity_failure(),
            _ => false,
        }
    }
}

/// Serialize implementation for service-boundary compatibility.
///
/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for EtlError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EtlError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, EtlError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EtlError::Io(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EtlError::Polars(e).with_context(context))
    }
}
