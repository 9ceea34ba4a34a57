use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use object_store::local::LocalFileSystem;
use object_store::path::Path as StorePath;
use url::Url;

use crate::application::ports::{ArtifactStore, ArtifactStoreError};
use crate::domain::ArtifactKey;

use super::transfer;

/// Filesystem-backed artifact store for development and tests.
///
/// The filesystem has no capability URLs, so `sign` composes the configured
/// public base URL with an expiry query; whatever serves `public_base_url`
/// is expected to enforce the expiry.
pub struct LocalArtifactStore {
    inner: Arc<LocalFileSystem>,
    public_base_url: Url,
}

impl LocalArtifactStore {
    pub fn new(base_path: PathBuf, public_base_url: Url) -> Result<Self, ArtifactStoreError> {
        std::fs::create_dir_all(&base_path)?;
        let fs = LocalFileSystem::new_with_prefix(base_path)
            .map_err(|e| ArtifactStoreError::UploadFailed(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(fs),
            public_base_url,
        })
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn upload(
        &self,
        local_path: &Path,
        key: &ArtifactKey,
    ) -> Result<u64, ArtifactStoreError> {
        let store_path = StorePath::from(key.as_str());
        transfer::put_file(self.inner.as_ref(), &store_path, local_path).await
    }

    async fn download(
        &self,
        key: &ArtifactKey,
        local_path: &Path,
    ) -> Result<u64, ArtifactStoreError> {
        let store_path = StorePath::from(key.as_str());
        transfer::fetch_to_file(self.inner.as_ref(), &store_path, local_path).await
    }

    async fn sign(&self, key: &ArtifactKey, ttl: Duration) -> Result<Url, ArtifactStoreError> {
        let mut url = self.public_base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ArtifactStoreError::SignFailed("public base URL cannot be a base".into())
            })?;
            for segment in key.as_str().split('/') {
                segments.push(segment);
            }
        }

        let expires_at = Utc::now() + chrono::Duration::seconds(ttl.as_secs() as i64);
        url.query_pairs_mut()
            .append_pair("expires", &expires_at.timestamp().to_string());

        Ok(url)
    }
}
