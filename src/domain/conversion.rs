use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{ArtifactKey, ConversionStatus};

/// One submitted source URL and everything the pipeline has produced for it.
///
/// Mutated exclusively by the pipeline orchestrator after creation; the
/// submission path only ever inserts records in `Pending`.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub id: ConversionId,
    pub session_id: SessionId,
    pub source_url: String,
    pub status: ConversionStatus,
    pub title: Option<String>,
    pub audio_artifact: Option<ArtifactKey>,
    pub transcript: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversion {
    pub fn new(session_id: SessionId, source_url: String) -> Self {
        let now = Utc::now();
        Self {
            id: ConversionId::new(),
            session_id,
            source_url,
            status: ConversionStatus::Pending,
            title: None,
            audio_artifact: None,
            transcript: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversionId(Uuid);

impl ConversionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// First eight hex characters, used as a filename suffix so artifacts
    /// from records with identical titles stay distinguishable.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for ConversionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Groups the records created by one submitting client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
