use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{ArtifactStore, ConversionRepository};
use crate::application::services::{ConversionPipeline, SubmissionService};

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn ConversionRepository>,
    pub submission_service: Arc<SubmissionService>,
    pub pipeline: Arc<ConversionPipeline>,
    pub artifact_store: Arc<dyn ArtifactStore>,
    pub signed_url_ttl: Duration,
}
