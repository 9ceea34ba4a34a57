use std::path::Path;

use async_trait::async_trait;

/// Metadata resolved from a source reference before any transcode work.
#[derive(Debug, Clone)]
pub struct SourceMetadata {
    pub title: String,
}

/// Acquisition and transcode boundary: resolves source metadata and produces
/// a normalized constant-bitrate MP3 at a caller-chosen path.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn probe(&self, url: &str) -> Result<SourceMetadata, MediaSourceError>;

    /// Stream the source's audio-only track through the transcoder into
    /// `output`. On success the file exists at `output` with non-zero size;
    /// a partial file is never reported as success.
    async fn extract_audio(&self, url: &str, output: &Path) -> Result<(), MediaSourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MediaSourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),
    #[error("no audio track: {0}")]
    NoAudioTrack(String),
    #[error("transcode failed: {0}")]
    TranscodeFailed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
