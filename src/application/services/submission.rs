use std::sync::Arc;

use crate::application::ports::ConversionRepository;
use crate::domain::{Conversion, SessionId};

use super::ConversionPipeline;

/// Which pipeline legs a submission asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionType {
    Mp3,
    Mp3Text,
}

impl ConversionType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "mp3" => Some(ConversionType::Mp3),
            "mp3_text" => Some(ConversionType::Mp3Text),
            _ => None,
        }
    }
}

/// Turns a validated submission into pending records and dispatched legs.
pub struct SubmissionService {
    repository: Arc<dyn ConversionRepository>,
    pipeline: Arc<ConversionPipeline>,
}

impl SubmissionService {
    pub fn new(repository: Arc<dyn ConversionRepository>, pipeline: Arc<ConversionPipeline>) -> Self {
        Self {
            repository,
            pipeline,
        }
    }

    /// Create one pending record per URL and dispatch its audio leg. URLs
    /// whose record creation fails are skipped, not retried. Returns the
    /// number of records created; the pipeline work continues in the
    /// background.
    pub async fn submit(
        &self,
        urls: Vec<String>,
        session_id: SessionId,
        conversion_type: ConversionType,
    ) -> usize {
        let mut created = 0;

        for url in urls {
            let conversion = Conversion::new(session_id.clone(), url);

            match self.repository.create(&conversion).await {
                Ok(()) => {
                    tracing::info!(
                        conversion_id = %conversion.id.as_uuid(),
                        session_id = %conversion.session_id,
                        source_url = %conversion.source_url,
                        "Conversion record created"
                    );
                    created += 1;
                    self.pipeline
                        .spawn_audio_leg(conversion, conversion_type == ConversionType::Mp3Text);
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        source_url = %conversion.source_url,
                        "Failed to create conversion record; skipping URL"
                    );
                }
            }
        }

        created
    }
}
