//! Puzzle handlers: create, delete, active-session lookup.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use crate::api::dto::{CreatePuzzleRequest, SuccessResponse};
use crate::app_state::AppState;
use crate::domain::{Puzzle, PuzzleId, Session};
use crate::error::{ErrorResponse, TrackerError};

/// `POST /puzzles`: Create a puzzle.
///
/// # Errors
///
/// Returns [`TrackerError::PersistenceError`] if the dataset could not be saved.
#[utoipa::path(
    post,
    path = "/api/puzzles",
    tag = "Puzzles",
    summary = "Create a puzzle",
    description = "Creates a puzzle with a fresh id. Missing fields default to \"Unnamed Puzzle\" and 0 pieces.",
    request_body = CreatePuzzleRequest,
    responses(
        (status = 201, description = "Puzzle created", body = Puzzle),
        (status = 500, description = "Dataset could not be saved", body = ErrorResponse),
    )
)]
pub async fn create_puzzle(
    State(state): State<AppState>,
    Json(req): Json<CreatePuzzleRequest>,
) -> Result<impl IntoResponse, TrackerError> {
    let puzzle = state
        .tracker
        .create_puzzle(req.name, req.total_pieces)
        .await?;
    Ok((StatusCode::CREATED, Json(puzzle)))
}

/// `DELETE /puzzles/{id}`: Delete a puzzle and its sessions.
///
/// # Errors
///
/// Returns [`TrackerError::PersistenceError`] if the dataset could not be saved.
#[utoipa::path(
    delete,
    path = "/api/puzzles/{id}",
    tag = "Puzzles",
    summary = "Delete a puzzle",
    description = "Removes the puzzle and every session that references it. Unknown ids succeed.",
    params(
        ("id" = String, Path, description = "Puzzle id"),
    ),
    responses(
        (status = 200, description = "Puzzle deleted", body = SuccessResponse),
        (status = 500, description = "Dataset could not be saved", body = ErrorResponse),
    )
)]
pub async fn delete_puzzle(
    State(state): State<AppState>,
    Path(id): Path<PuzzleId>,
) -> Result<impl IntoResponse, TrackerError> {
    state.tracker.delete_puzzle(&id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// `GET /puzzles/{id}/active-session`: First unended session, or `null`.
#[utoipa::path(
    get,
    path = "/api/puzzles/{id}/active-session",
    tag = "Puzzles",
    summary = "Get the active session",
    description = "Returns the first session of the puzzle that has not ended, or null when there is none.",
    params(
        ("id" = String, Path, description = "Puzzle id"),
    ),
    responses(
        (status = 200, description = "Active session or null", body = Option<Session>),
    )
)]
pub async fn active_session(
    State(state): State<AppState>,
    Path(id): Path<PuzzleId>,
) -> impl IntoResponse {
    Json(state.tracker.active_session(&id).await)
}

/// Puzzle routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/puzzles", post(create_puzzle))
        .route("/puzzles/{id}", delete(delete_puzzle))
        .route("/puzzles/{id}/active-session", get(active_session))
}
