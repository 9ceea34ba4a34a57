use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::application::services::ConversionType;
use crate::domain::SessionId;
use crate::presentation::state::AppState;

use super::ErrorResponse;

#[derive(Deserialize)]
pub struct ConvertRequest {
    #[serde(default)]
    pub urls: Vec<String>,
    pub session_id: Option<String>,
    pub conversion_type: Option<String>,
}

#[derive(Serialize)]
pub struct ConvertResponse {
    pub message: String,
    pub count: usize,
}

/// Accept a batch of source URLs, create one pending record per URL and
/// start background processing. Returns as soon as the records exist.
#[tracing::instrument(skip(state, request))]
pub async fn convert_handler(
    State(state): State<AppState>,
    Json(request): Json<ConvertRequest>,
) -> impl IntoResponse {
    let urls: Vec<String> = request
        .urls
        .into_iter()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .collect();

    if urls.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "No valid URLs provided".to_string(),
            }),
        )
            .into_response();
    }

    let session_id = match request.session_id.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => SessionId::new(s),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Session ID is required".to_string(),
                }),
            )
                .into_response();
        }
    };

    let conversion_type = match request.conversion_type.as_deref() {
        None => ConversionType::Mp3,
        Some(value) => match ConversionType::parse(value) {
            Some(t) => t,
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: format!(
                            "Invalid conversion type: {}. Use \"mp3\" or \"mp3_text\"",
                            value
                        ),
                    }),
                )
                    .into_response();
            }
        },
    };

    let requested = urls.len();
    let count = state
        .submission_service
        .submit(urls, session_id, conversion_type)
        .await;

    tracing::info!(requested, created = count, "Conversion batch accepted");

    (
        StatusCode::ACCEPTED,
        Json(ConvertResponse {
            message: "Conversion started".to_string(),
            count,
        }),
    )
        .into_response()
}
