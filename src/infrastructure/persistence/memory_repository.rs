use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::application::ports::{ConversionRepository, ConversionUpdate, RepositoryError};
use crate::domain::{Conversion, ConversionId, ConversionStatus, SessionId};

/// In-memory conversion store with the same claim and partial-update
/// semantics as the Postgres repository. Used by tests and as the fallback
/// when no database is configured.
#[derive(Default)]
pub struct InMemoryConversionRepository {
    records: Mutex<HashMap<Uuid, Conversion>>,
}

impl InMemoryConversionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Uuid, Conversion>>, RepositoryError>
    {
        self.records
            .lock()
            .map_err(|_| RepositoryError::ConnectionFailed("store lock poisoned".into()))
    }
}

#[async_trait]
impl ConversionRepository for InMemoryConversionRepository {
    async fn create(&self, conversion: &Conversion) -> Result<(), RepositoryError> {
        let mut records = self.lock()?;
        if records.contains_key(&conversion.id.as_uuid()) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "duplicate id: {}",
                conversion.id.as_uuid()
            )));
        }
        records.insert(conversion.id.as_uuid(), conversion.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: ConversionId) -> Result<Option<Conversion>, RepositoryError> {
        let records = self.lock()?;
        Ok(records.get(&id.as_uuid()).cloned())
    }

    async fn update(
        &self,
        id: ConversionId,
        update: ConversionUpdate,
    ) -> Result<(), RepositoryError> {
        let mut records = self.lock()?;
        let record = records
            .get_mut(&id.as_uuid())
            .ok_or_else(|| RepositoryError::NotFound(id.as_uuid().to_string()))?;

        if let Some(status) = update.status {
            if !record.status.can_transition_to(status) {
                return Err(RepositoryError::ConstraintViolation(format!(
                    "illegal status transition: {} -> {}",
                    record.status, status
                )));
            }
            record.status = status;
            if status != ConversionStatus::Failed {
                record.error_message = None;
            }
        }
        if let Some(title) = update.title {
            record.title = Some(title);
        }
        if let Some(artifact) = update.audio_artifact {
            record.audio_artifact = Some(artifact);
        }
        if let Some(transcript) = update.transcript {
            record.transcript = Some(transcript);
        }
        if let Some(error_message) = update.error_message {
            record.error_message = Some(error_message);
        }
        record.updated_at = Utc::now();

        Ok(())
    }

    async fn claim_audio_leg(&self, id: ConversionId) -> Result<bool, RepositoryError> {
        let mut records = self.lock()?;
        match records.get_mut(&id.as_uuid()) {
            Some(record) if record.status == ConversionStatus::Pending => {
                record.status = ConversionStatus::ConvertingMp3;
                record.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn claim_text_leg(&self, id: ConversionId) -> Result<bool, RepositoryError> {
        let mut records = self.lock()?;
        match records.get_mut(&id.as_uuid()) {
            Some(record)
                if record.status == ConversionStatus::Completed
                    && record.audio_artifact.is_some()
                    && record.transcript.is_none() =>
            {
                record.status = ConversionStatus::ConvertingText;
                record.error_message = None;
                record.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<Conversion>, RepositoryError> {
        let records = self.lock()?;
        let mut matching: Vec<Conversion> = records
            .values()
            .filter(|c| &c.session_id == session_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matching)
    }
}
