use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;

use soundpress::application::ports::{
    ArtifactStore, ConversionRepository, MediaSource, TranscriptionEngine,
};
use soundpress::application::services::{ConversionPipeline, SubmissionService};
use soundpress::infrastructure::media::YtDlpSource;
use soundpress::infrastructure::observability::{init_tracing, TracingConfig};
use soundpress::infrastructure::persistence::{InMemoryConversionRepository, PgConversionRepository};
use soundpress::infrastructure::storage::ArtifactStoreFactory;
use soundpress::infrastructure::transcription::GeminiScriptEngine;
use soundpress::presentation::{create_router, AppState, Environment, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let settings = Settings::load(environment)?;

    init_tracing(
        TracingConfig {
            environment: environment.to_string(),
            json_format: settings.logging.json,
            level: settings.logging.level.clone(),
        },
        settings.server.port,
    );

    let repository: Arc<dyn ConversionRepository> = match &settings.database.url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(settings.database.max_connections)
                .connect(url)
                .await?;
            tracing::info!("Connected to Postgres record store");
            Arc::new(PgConversionRepository::new(pool))
        }
        None => {
            tracing::warn!("No database URL configured; using in-memory record store");
            Arc::new(InMemoryConversionRepository::new())
        }
    };

    let artifact_store: Arc<dyn ArtifactStore> = ArtifactStoreFactory::create(&settings.storage)?;

    let media_source: Arc<dyn MediaSource> = Arc::new(YtDlpSource::new(
        settings.media.ytdlp_bin.clone(),
        settings.media.ffmpeg_bin.clone(),
        settings.media.bitrate_kbps,
    ));

    let transcription_engine: Arc<dyn TranscriptionEngine> = Arc::new(GeminiScriptEngine::new(
        settings.transcription.interpreter.clone(),
        PathBuf::from(&settings.transcription.script_path),
        settings.transcription.api_key.clone(),
        Duration::from_secs(settings.transcription.timeout_secs),
    ));

    let pipeline = Arc::new(ConversionPipeline::new(
        Arc::clone(&repository),
        media_source,
        Arc::clone(&artifact_store),
        transcription_engine,
        settings.pipeline.max_concurrent_legs,
    ));

    let submission_service = Arc::new(SubmissionService::new(
        Arc::clone(&repository),
        Arc::clone(&pipeline),
    ));

    let state = AppState {
        repository,
        submission_service,
        pipeline,
        artifact_store,
        signed_url_ttl: Duration::from_secs(settings.storage.signed_url_ttl_secs),
    };

    let router = create_router(state);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
