use std::path::PathBuf;
use std::sync::Arc;

use url::Url;

use crate::application::ports::{ArtifactStore, ArtifactStoreError};
use crate::presentation::config::{StorageProviderSetting, StorageSettings};

use super::local_store::LocalArtifactStore;
use super::s3_store::S3ArtifactStore;

pub struct ArtifactStoreFactory;

impl ArtifactStoreFactory {
    pub fn create(
        settings: &StorageSettings,
    ) -> Result<Arc<dyn ArtifactStore>, ArtifactStoreError> {
        match settings.provider {
            StorageProviderSetting::Local => {
                let base_url = Url::parse(&settings.public_base_url)
                    .map_err(|e| ArtifactStoreError::SignFailed(format!("public_base_url: {}", e)))?;
                let store = LocalArtifactStore::new(PathBuf::from(&settings.local_path), base_url)?;
                Ok(Arc::new(store))
            }
            StorageProviderSetting::S3 => {
                let bucket = settings.s3_bucket.as_deref().ok_or_else(|| {
                    ArtifactStoreError::UploadFailed("s3_bucket required".into())
                })?;
                let region = settings.s3_region.as_deref().ok_or_else(|| {
                    ArtifactStoreError::UploadFailed("s3_region required".into())
                })?;
                let store = S3ArtifactStore::new(
                    bucket,
                    region,
                    settings.s3_endpoint.as_deref(),
                    settings.s3_allow_http,
                )?;
                Ok(Arc::new(store))
            }
        }
    }
}
