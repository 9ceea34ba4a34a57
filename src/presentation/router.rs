use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    conversion_status_handler, convert_handler, download_handler, health_handler,
    session_conversions_handler, transcript_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/convert", post(convert_handler))
        .route("/api/v1/conversions/{id}", get(conversion_status_handler))
        .route(
            "/api/v1/conversions/{id}/transcript",
            post(transcript_handler),
        )
        .route(
            "/api/v1/conversions/{id}/download/{kind}",
            get(download_handler),
        )
        .route(
            "/api/v1/sessions/{session_id}/conversions",
            get(session_conversions_handler),
        )
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
