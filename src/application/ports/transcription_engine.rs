use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

/// External transcription capability: local audio file in, plain text out.
///
/// Narrow on purpose so the engine can be swapped (subprocess, remote API,
/// in-process model) without touching orchestration logic.
#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(&self, audio_path: &Path) -> Result<String, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("transcription engine failed: {0}")]
    EngineFailed(String),
    #[error("transcription timed out after {0:?}")]
    Timeout(Duration),
    #[error("transcription engine produced no output")]
    EmptyOutput,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
