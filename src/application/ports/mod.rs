mod artifact_store;
mod conversion_repository;
mod media_source;
mod repository_error;
mod transcription_engine;

pub use artifact_store::{ArtifactStore, ArtifactStoreError};
pub use conversion_repository::{ConversionRepository, ConversionUpdate};
pub use media_source::{MediaSource, MediaSourceError, SourceMetadata};
pub use repository_error::RepositoryError;
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
