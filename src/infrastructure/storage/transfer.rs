use std::path::Path;

use bytes::Bytes;
use futures::StreamExt;
use object_store::path::Path as StorePath;
use object_store::{MultipartUpload, ObjectStore, PutPayload};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use crate::application::ports::ArtifactStoreError;

const UPLOAD_PART_SIZE: usize = 1024 * 1024;

/// Stream a local file into the store under `path`, refusing to overwrite
/// an existing object.
pub(super) async fn put_file(
    store: &dyn ObjectStore,
    path: &StorePath,
    local_path: &Path,
) -> Result<u64, ArtifactStoreError> {
    if store.head(path).await.is_ok() {
        return Err(ArtifactStoreError::AlreadyExists(path.to_string()));
    }

    let mut file = tokio::fs::File::open(local_path).await?;
    let mut upload = store
        .put_multipart(path)
        .await
        .map_err(|e| ArtifactStoreError::UploadFailed(e.to_string()))?;

    let mut total_bytes: u64 = 0;
    let mut buf = vec![0u8; UPLOAD_PART_SIZE];

    loop {
        let n = match file.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                let _ = upload.abort().await;
                return Err(ArtifactStoreError::Io(e));
            }
        };
        total_bytes += n as u64;
        let part = PutPayload::from(Bytes::copy_from_slice(&buf[..n]));
        if let Err(e) = upload.put_part(part).await {
            let _ = upload.abort().await;
            return Err(ArtifactStoreError::UploadFailed(e.to_string()));
        }
    }

    upload
        .complete()
        .await
        .map_err(|e| ArtifactStoreError::UploadFailed(e.to_string()))?;

    Ok(total_bytes)
}

/// Stream an object from the store into a local file.
pub(super) async fn fetch_to_file(
    store: &dyn ObjectStore,
    path: &StorePath,
    local_path: &Path,
) -> Result<u64, ArtifactStoreError> {
    let result = store.get(path).await.map_err(|e| match e {
        object_store::Error::NotFound { .. } => ArtifactStoreError::NotFound(path.to_string()),
        other => ArtifactStoreError::DownloadFailed(other.to_string()),
    })?;

    let mut stream = result.into_stream();
    let mut file = tokio::fs::File::create(local_path).await?;
    let mut total_bytes: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let bytes = chunk.map_err(|e| ArtifactStoreError::DownloadFailed(e.to_string()))?;
        total_bytes += bytes.len() as u64;
        file.write_all(&bytes).await?;
    }

    file.flush().await?;
    Ok(total_bytes)
}
