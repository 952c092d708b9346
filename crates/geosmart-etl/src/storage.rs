//! Storage collaborators for publishing pipeline artifacts.
//!
//! The pipeline itself only writes local sinks; pushing an artifact to a
//! shared location is a separate, optional step behind [`StorageProvider`].
//! Two implementations ship: a local-directory provider for air-gapped or
//! development use, and a mock that fabricates object URLs without touching
//! any backend (useful when no credentials are configured).

use crate::error::{EtlError, Result};
use crate::types::{UploadResult, UploadStatus};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A destination that can receive a finished artifact.
pub trait StorageProvider {
    /// Upload one artifact, returning the canonical URL it is reachable at.
    fn upload(&self, artifact: &Path) -> Result<UploadResult>;

    /// Provider name for logging and the upload receipt.
    fn name(&self) -> &str;
}

/// Connection settings for an object-store style destination.
///
/// `endpoint` switches between virtual-host addressing (None, AWS-style) and
/// path-style addressing (Some, MinIO and friends).
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub endpoint: Option<String>,
}

impl StorageConfig {
    pub fn builder() -> StorageConfigBuilder {
        StorageConfigBuilder::default()
    }

    /// Whether real credentials are present. Without them only the mock
    /// provider is usable.
    pub fn has_credentials(&self) -> bool {
        self.access_key.is_some() && self.secret_key.is_some()
    }

    /// Canonical URL of an object in this bucket.
    pub fn object_url(&self, key: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key),
            None => format!("https://{}.s3.{}.amazonaws.com/{}", self.bucket, self.region, key),
        }
    }
}

/// Builder for [`StorageConfig`].
#[derive(Debug, Default)]
pub struct StorageConfigBuilder {
    bucket: Option<String>,
    region: Option<String>,
    access_key: Option<String>,
    secret_key: Option<String>,
    endpoint: Option<String>,
}

impl StorageConfigBuilder {
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn access_key(mut self, key: impl Into<String>) -> Self {
        self.access_key = Some(key.into());
        self
    }

    pub fn secret_key(mut self, key: impl Into<String>) -> Self {
        self.secret_key = Some(key.into());
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn build(self) -> Result<StorageConfig> {
        let bucket = self
            .bucket
            .ok_or_else(|| EtlError::InvalidConfig("storage bucket is required".to_string()))?;
        if bucket.is_empty() {
            return Err(EtlError::InvalidConfig(
                "storage bucket must not be empty".to_string(),
            ));
        }
        Ok(StorageConfig {
            bucket,
            region: self.region.unwrap_or_else(|| "us-east-1".to_string()),
            access_key: self.access_key,
            secret_key: self.secret_key,
            endpoint: self.endpoint,
        })
    }
}

/// Copies artifacts into a directory and reports `file://` URLs.
pub struct LocalDirStorage {
    target_dir: PathBuf,
}

impl LocalDirStorage {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
        }
    }
}

impl StorageProvider for LocalDirStorage {
    fn upload(&self, artifact: &Path) -> Result<UploadResult> {
        let file_name = artifact
            .file_name()
            .ok_or_else(|| {
                EtlError::InvalidConfig(format!("not a file path: {}", artifact.display()))
            })?;

        fs::create_dir_all(&self.target_dir)?;
        let target = self.target_dir.join(file_name);
        fs::copy(artifact, &target)?;

        info!("Uploaded {} to {}", artifact.display(), target.display());
        Ok(UploadResult {
            status: UploadStatus::Success,
            url: format!("file://{}", target.display()),
            provider: self.name().to_string(),
        })
    }

    fn name(&self) -> &str {
        "local-dir"
    }
}

/// Pretends to upload. Verifies the artifact exists, then fabricates the URL
/// the configured bucket would serve it at.
pub struct MockStorage {
    config: StorageConfig,
}

impl MockStorage {
    pub fn new(config: StorageConfig) -> Self {
        if !config.has_credentials() {
            warn!("No storage credentials configured; uploads are simulated");
        }
        Self { config }
    }
}

impl StorageProvider for MockStorage {
    fn upload(&self, artifact: &Path) -> Result<UploadResult> {
        if !artifact.exists() {
            return Err(EtlError::SourceNotFound(artifact.display().to_string()));
        }
        let key = artifact
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                EtlError::InvalidConfig(format!("not a file path: {}", artifact.display()))
            })?;

        info!("[mock] Upload of {} simulated", artifact.display());
        Ok(UploadResult {
            status: UploadStatus::Success,
            url: self.config.object_url(key),
            provider: self.name().to_string(),
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
