use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::Instrument;

use crate::application::ports::{
    ArtifactStore, ArtifactStoreError, ConversionRepository, ConversionUpdate, MediaSource,
    MediaSourceError, RepositoryError, TranscriptionEngine, TranscriptionError,
};
use crate::domain::{sanitize_title, ArtifactKey, Conversion, ConversionId};

const TERMINAL_WRITE_ATTEMPTS: u32 = 3;
const TERMINAL_WRITE_BACKOFF: Duration = Duration::from_millis(200);

/// Orchestrates the two pipeline legs per conversion record.
///
/// Each leg claims its in-progress status with a conditional update, performs
/// the stage work, and finishes with a single terminal write. Legs for
/// distinct records run on independent tasks bounded by a semaphore; a
/// failure in one record's leg never affects another record.
pub struct ConversionPipeline {
    repository: Arc<dyn ConversionRepository>,
    media_source: Arc<dyn MediaSource>,
    artifact_store: Arc<dyn ArtifactStore>,
    transcription_engine: Arc<dyn TranscriptionEngine>,
    limiter: Arc<Semaphore>,
}

struct AudioOutcome {
    title: String,
    audio_artifact: ArtifactKey,
}

impl ConversionPipeline {
    pub fn new(
        repository: Arc<dyn ConversionRepository>,
        media_source: Arc<dyn MediaSource>,
        artifact_store: Arc<dyn ArtifactStore>,
        transcription_engine: Arc<dyn TranscriptionEngine>,
        max_concurrent_legs: usize,
    ) -> Self {
        Self {
            repository,
            media_source,
            artifact_store,
            transcription_engine,
            limiter: Arc::new(Semaphore::new(max_concurrent_legs)),
        }
    }

    /// Dispatch the audio leg for a freshly created record. Returns
    /// immediately; the work runs on its own task. With `then_transcribe`
    /// the text leg is chained after a successful audio leg, which keeps all
    /// mutations of one record serialized on a single task.
    pub fn spawn_audio_leg(self: &Arc<Self>, conversion: Conversion, then_transcribe: bool) {
        let pipeline = Arc::clone(self);
        let span = tracing::info_span!(
            "audio_leg",
            conversion_id = %conversion.id.as_uuid(),
            session_id = %conversion.session_id,
        );

        tokio::spawn(
            async move {
                let _permit = match pipeline.limiter.clone().acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return,
                };

                match pipeline.run_audio_leg(&conversion).await {
                    Ok(()) if then_transcribe => {
                        if let Err(e) = pipeline.run_text_leg(conversion.id).await {
                            tracing::error!(error = %e, "Chained text leg failed");
                        }
                    }
                    Ok(()) => {}
                    Err(e) => tracing::error!(error = %e, "Audio leg failed"),
                }
            }
            .instrument(span),
        );
    }

    /// Dispatch the text leg for an already-converted record.
    pub fn spawn_text_leg(self: &Arc<Self>, id: ConversionId) {
        let pipeline = Arc::clone(self);
        let span = tracing::info_span!("text_leg", conversion_id = %id.as_uuid());

        tokio::spawn(
            async move {
                let _permit = match pipeline.limiter.clone().acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return,
                };

                if let Err(e) = pipeline.run_text_leg(id).await {
                    tracing::error!(error = %e, "Text leg failed");
                }
            }
            .instrument(span),
        );
    }

    /// Drive one record through acquisition, transcode and upload.
    pub async fn run_audio_leg(&self, conversion: &Conversion) -> Result<(), PipelineError> {
        if !self.repository.claim_audio_leg(conversion.id).await? {
            tracing::info!("Audio leg not claimed: record missing or already in progress");
            return Err(PipelineError::NotEligible);
        }
        tracing::debug!(status = "converting_mp3", "Conversion status transition");

        match self.process_audio(conversion).await {
            Ok(outcome) => {
                tracing::info!(
                    title = %outcome.title,
                    artifact = %outcome.audio_artifact,
                    "Audio conversion completed"
                );
                self.finalize(
                    conversion.id,
                    ConversionUpdate::completed_audio(outcome.title, outcome.audio_artifact),
                )
                .await
            }
            Err(e) => {
                tracing::warn!(error = %e, "Audio conversion failed");
                self.finalize(conversion.id, ConversionUpdate::failed(e.to_string()))
                    .await?;
                Err(e)
            }
        }
    }

    /// Drive one record through artifact download and transcription.
    pub async fn run_text_leg(&self, id: ConversionId) -> Result<(), PipelineError> {
        let conversion = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(PipelineError::NotEligible)?;

        if !self.repository.claim_text_leg(id).await? {
            tracing::info!("Text leg not claimed: no stored audio artifact or transcript present");
            return Err(PipelineError::NotEligible);
        }
        tracing::debug!(status = "converting_text", "Conversion status transition");

        match self.process_text(&conversion).await {
            Ok(transcript) => {
                tracing::info!(chars = transcript.len(), "Text conversion completed");
                self.finalize(id, ConversionUpdate::completed_text(transcript))
                    .await
            }
            Err(e) => {
                tracing::warn!(error = %e, "Text conversion failed");
                self.finalize(id, ConversionUpdate::failed(e.to_string()))
                    .await?;
                Err(e)
            }
        }
    }

    async fn process_audio(&self, conversion: &Conversion) -> Result<AudioOutcome, PipelineError> {
        // Resolve metadata first so an unreachable source fails before any
        // transcode work starts.
        let metadata = self.media_source.probe(&conversion.source_url).await?;

        let mut title = sanitize_title(&metadata.title);
        if title.is_empty() {
            title = "audio".to_string();
        }
        let filename = format!("{}-{}.mp3", title, conversion.id.short());

        let scratch = tempfile::tempdir()?;
        let output = scratch.path().join(&filename);

        self.media_source
            .extract_audio(&conversion.source_url, &output)
            .await?;

        let key = ArtifactKey::new(&conversion.id, &filename);
        let bytes = self.artifact_store.upload(&output, &key).await?;
        tracing::debug!(bytes, artifact = %key, "Artifact uploaded");

        Ok(AudioOutcome {
            title,
            audio_artifact: key,
        })
    }

    async fn process_text(&self, conversion: &Conversion) -> Result<String, PipelineError> {
        let key = conversion
            .audio_artifact
            .as_ref()
            .ok_or(PipelineError::NotEligible)?;

        // Scratch dir is dropped on every exit path, taking the staged copy
        // with it.
        let scratch = tempfile::tempdir()?;
        let local_path = scratch.path().join(key.filename());

        let bytes = self.artifact_store.download(key, &local_path).await?;
        tracing::debug!(bytes, artifact = %key, "Artifact staged for transcription");

        let transcript = self.transcription_engine.transcribe(&local_path).await?;
        Ok(transcript)
    }

    /// The terminal write is the only durable record of outcome, so unlike
    /// intermediate writes it is retried before being given up on.
    async fn finalize(
        &self,
        id: ConversionId,
        update: ConversionUpdate,
    ) -> Result<(), PipelineError> {
        let mut backoff = TERMINAL_WRITE_BACKOFF;
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.repository.update(id, update.clone()).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < TERMINAL_WRITE_ATTEMPTS => {
                    tracing::warn!(error = %e, attempt, "Terminal status write failed; retrying");
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                Err(e) => {
                    tracing::error!(error = %e, attempt, "Terminal status write dropped");
                    return Err(PipelineError::Repository(e));
                }
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("media source: {0}")]
    MediaSource(#[from] MediaSourceError),
    #[error("artifact store: {0}")]
    ArtifactStore(#[from] ArtifactStoreError),
    #[error("transcription: {0}")]
    Transcription(#[from] TranscriptionError),
    #[error("repository: {0}")]
    Repository(#[from] RepositoryError),
    #[error("scratch dir: {0}")]
    Scratch(#[from] std::io::Error),
    #[error("record is not eligible for this stage")]
    NotEligible,
}
