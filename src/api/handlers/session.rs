//! Session handlers: start, end, delete, undo.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, post};
use axum::{Json, Router};

use crate::api::dto::{StartSessionRequest, SuccessResponse};
use crate::app_state::AppState;
use crate::domain::{Session, SessionId};
use crate::error::{ErrorResponse, TrackerError};
use crate::service::UndoOutcome;

/// `POST /sessions/start`: Start a session.
///
/// # Errors
///
/// Returns [`TrackerError::PersistenceError`] if the dataset could not be saved.
#[utoipa::path(
    post,
    path = "/api/sessions/start",
    tag = "Sessions",
    summary = "Start a session",
    description = "Starts a new active session for the puzzle. Repeated starts create additional active sessions.",
    request_body = StartSessionRequest,
    responses(
        (status = 201, description = "Session started", body = Session),
        (status = 500, description = "Dataset could not be saved", body = ErrorResponse),
    )
)]
pub async fn start_session(
    State(state): State<AppState>,
    Json(req): Json<StartSessionRequest>,
) -> Result<impl IntoResponse, TrackerError> {
    let session = state.tracker.start_session(req.puzzle_id).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// `POST /sessions/{id}/end`: End a session.
///
/// # Errors
///
/// Returns [`TrackerError::SessionNotFound`] if the session does not exist.
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/end",
    tag = "Sessions",
    summary = "End a session",
    description = "Stamps the session's end time with the current time.",
    params(
        ("id" = String, Path, description = "Session id"),
    ),
    responses(
        (status = 200, description = "Session ended", body = Session),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Dataset could not be saved", body = ErrorResponse),
    )
)]
pub async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<impl IntoResponse, TrackerError> {
    let session = state.tracker.end_session(&id).await?;
    Ok(Json(session))
}

/// `DELETE /sessions/{id}`: Delete a session.
///
/// # Errors
///
/// Returns [`TrackerError::SessionNotFound`] if the session does not exist.
#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    tag = "Sessions",
    summary = "Delete a session",
    params(
        ("id" = String, Path, description = "Session id"),
    ),
    responses(
        (status = 200, description = "Session deleted", body = SuccessResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Dataset could not be saved", body = ErrorResponse),
    )
)]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<impl IntoResponse, TrackerError> {
    state.tracker.delete_session(&id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// `POST /sessions/{id}/undo`: Remove the last recorded event.
///
/// # Errors
///
/// Returns [`TrackerError::SessionNotFound`] if the session does not exist
/// or [`TrackerError::EmptyEventLog`] if it has no events.
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/undo",
    tag = "Sessions",
    summary = "Undo the last event",
    description = "Pops the most recent event from the session's log.",
    params(
        ("id" = String, Path, description = "Session id"),
    ),
    responses(
        (status = 200, description = "Event removed", body = UndoOutcome),
        (status = 400, description = "Session has no events", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Dataset could not be saved", body = ErrorResponse),
    )
)]
pub async fn undo_last_event(
    State(state): State<AppState>,
    Path(id): Path<SessionId>,
) -> Result<impl IntoResponse, TrackerError> {
    let outcome = state.tracker.undo_last_event(&id).await?;
    Ok(Json(outcome))
}

/// Session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions/start", post(start_session))
        .route("/sessions/{id}", delete(delete_session))
        .route("/sessions/{id}/end", post(end_session))
        .route("/sessions/{id}/undo", post(undo_last_event))
}
