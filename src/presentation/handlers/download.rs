use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect};
use axum::Json;
use uuid::Uuid;

use crate::domain::ConversionId;
use crate::presentation::state::AppState;

use super::ErrorResponse;

/// Retrieve a produced artifact: `audio` redirects to a freshly signed
/// time-limited URL, `text` returns the transcript as an attachment.
#[tracing::instrument(skip(state))]
pub async fn download_handler(
    State(state): State<AppState>,
    Path((id, kind)): Path<(String, String)>,
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

    match kind.as_str() {
        "audio" => {
            let key = match &conversion.audio_artifact {
                Some(key) => key,
                None => {
                    return (
                        StatusCode::NOT_FOUND,
                        Json(ErrorResponse {
                            error: "No audio artifact for this conversion".to_string(),
                        }),
                    )
                        .into_response();
                }
            };

            match state.artifact_store.sign(key, state.signed_url_ttl).await {
                Ok(url) => {
                    tracing::debug!(artifact = %key, "Issued signed download URL");
                    Redirect::temporary(url.as_str()).into_response()
                }
                Err(e) => {
                    tracing::error!(error = %e, artifact = %key, "Failed to sign download URL");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ErrorResponse {
                            error: "Failed to generate download link".to_string(),
                        }),
                    )
                        .into_response()
                }
            }
        }
        "text" => {
            let transcript = match &conversion.transcript {
                Some(t) => t.clone(),
                None => {
                    return (
                        StatusCode::NOT_FOUND,
                        Json(ErrorResponse {
                            error: "No transcript for this conversion".to_string(),
                        }),
                    )
                        .into_response();
                }
            };

            let filename = format!(
                "{}-{}.txt",
                conversion.title.as_deref().unwrap_or("transcript"),
                conversion.id.short()
            );

            (
                StatusCode::OK,
                [
                    (
                        header::CONTENT_TYPE,
                        "text/plain; charset=utf-8".to_string(),
                    ),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}\"", filename),
                    ),
                ],
                transcript,
            )
                .into_response()
        }
        other => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!(
                    "Invalid download kind: {}. Use \"audio\" or \"text\"",
                    other
                ),
            }),
        )
            .into_response(),
    }
}
