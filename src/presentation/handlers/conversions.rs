use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Conversion, ConversionId, SessionId};
use crate::presentation::state::AppState;

use super::ErrorResponse;

#[derive(Serialize)]
pub struct ConversionResponse {
    pub id: String,
    pub session_id: String,
    pub source_url: String,
    pub status: String,
    pub title: Option<String>,
    pub audio_artifact: Option<String>,
    pub transcript: Option<String>,
    pub error_message: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Conversion> for ConversionResponse {
    fn from(conversion: &Conversion) -> Self {
        Self {
            id: conversion.id.as_uuid().to_string(),
            session_id: conversion.session_id.as_str().to_string(),
            source_url: conversion.source_url.clone(),
            status: conversion.status.as_str().to_string(),
            title: conversion.title.clone(),
            audio_artifact: conversion
                .audio_artifact
                .as_ref()
                .map(|k| k.as_str().to_string()),
            transcript: conversion.transcript.clone(),
            error_message: conversion.error_message.clone(),
            created_at: conversion.created_at.to_rfc3339(),
            updated_at: conversion.updated_at.to_rfc3339(),
        }
    }
}

#[tracing::instrument(skip(state))]
pub async fn conversion_status_handler(
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

    match state.repository.get_by_id(ConversionId::from_uuid(uuid)).await {
        Ok(Some(conversion)) => {
            (StatusCode::OK, Json(ConversionResponse::from(&conversion))).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Conversion not found: {}", id),
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch conversion record");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to fetch conversion: {}", e),
                }),
            )
                .into_response()
        }
    }
}

/// Records for one submitting session, newest first. Polling surface for
/// clients that do not subscribe to the record store's change feed.
#[tracing::instrument(skip(state))]
pub async fn session_conversions_handler(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    let session_id = SessionId::new(session_id);

    match state.repository.list_by_session(&session_id).await {
        Ok(conversions) => {
            let body: Vec<ConversionResponse> =
                conversions.iter().map(ConversionResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list conversions for session");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: format!("Failed to list conversions: {}", e),
                }),
            )
                .into_response()
        }
    }
}
