use std::fmt;

use super::ConversionId;

/// Durable-storage key for a produced artifact: `{record_id}/{filename}`.
///
/// Prefixing with the record id guarantees no cross-record collisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactKey(String);

impl ArtifactKey {
    pub fn new(conversion_id: &ConversionId, filename: &str) -> Self {
        Self(format!("{}/{}", conversion_id.as_uuid(), filename))
    }

    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Final path segment, used when the artifact is staged back to local
    /// disk for downstream processing.
    pub fn filename(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
