use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::application::ports::{ArtifactStore, ArtifactStoreError};
use crate::domain::ArtifactKey;

/// In-memory artifact store for tests. Uploads capture file contents;
/// downloads write them back out; signing mints a stable fake URL.
#[derive(Default)]
pub struct MockArtifactStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MockArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &ArtifactKey) -> bool {
        self.objects
            .lock()
            .expect("mock store lock")
            .contains_key(key.as_str())
    }
}

#[async_trait]
impl ArtifactStore for MockArtifactStore {
    async fn upload(
        &self,
        local_path: &Path,
        key: &ArtifactKey,
    ) -> Result<u64, ArtifactStoreError> {
        let data = tokio::fs::read(local_path).await?;
        let mut objects = self.objects.lock().expect("mock store lock");
        if objects.contains_key(key.as_str()) {
            return Err(ArtifactStoreError::AlreadyExists(key.as_str().to_string()));
        }
        let size = data.len() as u64;
        objects.insert(key.as_str().to_string(), data);
        Ok(size)
    }

    async fn download(
        &self,
        key: &ArtifactKey,
        local_path: &Path,
    ) -> Result<u64, ArtifactStoreError> {
        let data = {
            let objects = self.objects.lock().expect("mock store lock");
            objects
                .get(key.as_str())
                .cloned()
                .ok_or_else(|| ArtifactStoreError::NotFound(key.as_str().to_string()))?
        };
        tokio::fs::write(local_path, &data).await?;
        Ok(data.len() as u64)
    }

    async fn sign(&self, key: &ArtifactKey, ttl: Duration) -> Result<Url, ArtifactStoreError> {
        let url = format!(
            "https://mock.store/{}?expires={}",
            key.as_str(),
            ttl.as_secs()
        );
        Url::parse(&url).map_err(|e| ArtifactStoreError::SignFailed(e.to_string()))
    }
}
