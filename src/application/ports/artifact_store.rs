use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::domain::ArtifactKey;

/// Durable object storage for produced artifacts.
///
/// Operations are safe to re-attempt at the transport level but the adapter
/// never retries internally; retry policy belongs to the caller.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Transfer a completed local artifact into durable storage. Fails if
    /// the destination key already exists; existing artifacts are never
    /// silently overwritten.
    async fn upload(&self, local_path: &Path, key: &ArtifactKey)
        -> Result<u64, ArtifactStoreError>;

    /// Retrieve a stored artifact to local disk for downstream processing.
    async fn download(
        &self,
        key: &ArtifactKey,
        local_path: &Path,
    ) -> Result<u64, ArtifactStoreError>;

    /// Issue a time-limited retrieval URL for direct client download.
    async fn sign(&self, key: &ArtifactKey, ttl: Duration) -> Result<Url, ArtifactStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactStoreError {
    #[error("artifact already exists: {0}")]
    AlreadyExists(String),
    #[error("artifact not found: {0}")]
    NotFound(String),
    #[error("upload failed: {0}")]
    UploadFailed(String),
    #[error("download failed: {0}")]
    DownloadFailed(String),
    #[error("signing failed: {0}")]
    SignFailed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
