//! Event recording handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::RecordEventRequest;
use crate::app_state::AppState;
use crate::domain::Event;
use crate::error::{ErrorResponse, TrackerError};

/// `POST /events`: Record a placed or failed piece.
///
/// # Errors
///
/// Returns [`TrackerError::InvalidRequest`] for a negative `elapsed`, or
/// [`TrackerError::SessionNotFound`] if the session does not exist.
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Events",
    summary = "Record an event",
    description = "Appends a piece_placed or piece_failed event to the session's log.",
    request_body = RecordEventRequest,
    responses(
        (status = 201, description = "Event recorded", body = Event),
        (status = 400, description = "Invalid elapsed time", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Dataset could not be saved", body = ErrorResponse),
    )
)]
pub async fn record_event(
    State(state): State<AppState>,
    Json(req): Json<RecordEventRequest>,
) -> Result<impl IntoResponse, TrackerError> {
    let event = state
        .tracker
        .record_event(&req.session_id, req.kind, req.elapsed)
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// Event routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/events", post(record_event))
}
