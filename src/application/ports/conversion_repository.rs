use async_trait::async_trait;

use crate::domain::{ArtifactKey, Conversion, ConversionId, ConversionStatus, SessionId};

use super::RepositoryError;

/// Durable store for conversion records.
///
/// All pipeline mutations go through `update` and the two claim operations;
/// the claims are conditional single-statement transitions so that a replayed
/// trigger can never start a duplicate leg for the same record.
#[async_trait]
pub trait ConversionRepository: Send + Sync {
    async fn create(&self, conversion: &Conversion) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: ConversionId) -> Result<Option<Conversion>, RepositoryError>;

    /// Partial update: only the fields present in `update` are written,
    /// `updated_at` is always refreshed. Moving to a non-failed status
    /// clears any previous `error_message`. A status write that is not a
    /// legal edge of the transition graph is a constraint violation and
    /// leaves the record untouched.
    async fn update(
        &self,
        id: ConversionId,
        update: ConversionUpdate,
    ) -> Result<(), RepositoryError>;

    /// Atomically move `pending -> converting_mp3`. Returns `false` when the
    /// record is missing or not in `pending` (already claimed, or terminal).
    async fn claim_audio_leg(&self, id: ConversionId) -> Result<bool, RepositoryError>;

    /// Atomically move `completed -> converting_text`, gated on a stored
    /// audio artifact and an absent transcript. Returns `false` when the
    /// record is missing or ineligible.
    async fn claim_text_leg(&self, id: ConversionId) -> Result<bool, RepositoryError>;

    async fn list_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<Conversion>, RepositoryError>;
}

/// Field set for a partial record update.
#[derive(Debug, Clone, Default)]
pub struct ConversionUpdate {
    pub status: Option<ConversionStatus>,
    pub title: Option<String>,
    pub audio_artifact: Option<ArtifactKey>,
    pub transcript: Option<String>,
    pub error_message: Option<String>,
}

impl ConversionUpdate {
    /// Terminal write for a successful audio leg.
    pub fn completed_audio(title: String, audio_artifact: ArtifactKey) -> Self {
        Self {
            status: Some(ConversionStatus::Completed),
            title: Some(title),
            audio_artifact: Some(audio_artifact),
            ..Self::default()
        }
    }

    /// Terminal write for a successful text leg.
    pub fn completed_text(transcript: String) -> Self {
        Self {
            status: Some(ConversionStatus::Completed),
            transcript: Some(transcript),
            ..Self::default()
        }
    }

    /// Terminal write for a failed leg.
    pub fn failed(error_message: String) -> Self {
        Self {
            status: Some(ConversionStatus::Failed),
            error_message: Some(error_message),
            ..Self::default()
        }
    }
}
