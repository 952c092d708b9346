//! Insight provider trait for abstracting LLM interactions.
//!
//! The pipeline produces a compact JSON profile; answering questions about it
//! is delegated to an implementation of [`InsightProvider`], so the core
//! pipeline never depends on a specific AI backend.

use crate::error::Result;
use crate::types::Insight;
use std::path::Path;

/// A backend that can answer analytical questions about a dataset profile.
///
/// Implementations must be `Send + Sync` to allow usage across threads.
pub trait InsightProvider: Send + Sync {
    /// Answer `query` using the profile JSON stored at `profile_path`.
    ///
    /// The implementation reads the profile, embeds it in its prompt and
    /// returns the model's answer together with token accounting.
    ///
    /// # Errors
    ///
    /// Returns an error when the profile cannot be read, the backend call
    /// fails, or the response carries no answer.
    fn ask(&self, profile_path: &Path, query: &str) -> Result<Insight>;

    /// Provider name for logging and debugging.
    fn name(&self) -> &str;

    /// The model being used, when the provider exposes one.
    fn model(&self) -> Option<&str> {
        None
    }
}
