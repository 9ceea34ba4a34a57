use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::ConversionId;
use crate::presentation::state::AppState;

use super::ErrorResponse;

#[derive(Serialize)]
pub struct TranscriptStartedResponse {
    pub message: String,
    pub id: String,
}

/// Start the text leg for an already-converted record. Returns immediately;
/// the transcription runs in the background.
#[tracing::instrument(skip(state))]
pub async fn transcript_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&id) {
        Ok(u) => u,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("Invalid conversion ID: {}", id),
                }),
            )
                .into_response();
        }
    };
    let conversion_id = ConversionId::from_uuid(uuid);

    let conversion = match state.repository.get_by_id(conversion_id).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Conversion not found: {}", id),
                }),
            )
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch conversion record");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch conversion: {}", e),
                }),
            )
                .into_response();
        }
    };

    if conversion.audio_artifact.is_none() {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "No stored audio artifact for this conversion".to_string(),
            }),
        )
            .into_response();
    }
    if conversion.transcript.is_some() {
        return (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "Transcript already exists for this conversion".to_string(),
            }),
        )
            .into_response();
    }

    state.pipeline.spawn_text_leg(conversion_id);

    tracing::info!(conversion_id = %uuid, "Text conversion started");

    (
        StatusCode::ACCEPTED,
        Json(TranscriptStartedResponse {
            message: "Text conversion started".to_string(),
            id,
        }),
    )
        .into_response()
}
