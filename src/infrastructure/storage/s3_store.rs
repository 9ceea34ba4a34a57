use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as StorePath;
use object_store::signer::Signer;
use url::Url;

use crate::application::ports::{ArtifactStore, ArtifactStoreError};
use crate::domain::ArtifactKey;

use super::transfer;

/// S3-compatible artifact store. Credentials come from the standard AWS
/// environment variables; signing uses presigned GET URLs.
pub struct S3ArtifactStore {
    inner: Arc<AmazonS3>,
}

impl S3ArtifactStore {
    pub fn new(
        bucket: &str,
        region: &str,
        endpoint: Option<&str>,
        allow_http: bool,
    ) -> Result<Self, ArtifactStoreError> {
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(bucket)
            .with_region(region)
            .with_allow_http(allow_http);

        if let Some(endpoint) = endpoint {
            builder = builder.with_endpoint(endpoint);
        }

        let store = builder
            .build()
            .map_err(|e| ArtifactStoreError::UploadFailed(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(store),
        })
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
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
        let store_path = StorePath::from(key.as_str());
        self.inner
            .signed_url(Method::GET, &store_path, ttl)
            .await
            .map_err(|e| ArtifactStoreError::SignFailed(e.to_string()))
    }
}
