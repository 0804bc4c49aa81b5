//! Read-side handlers: puzzle statistics and the full dataset dump.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::domain::{Dataset, PuzzleId, PuzzleStats};
use crate::error::{ErrorResponse, TrackerError};

/// `GET /stats/{id}`: Aggregated statistics for a puzzle.
///
/// # Errors
///
/// Returns [`TrackerError::PuzzleNotFound`] if the puzzle does not exist.
#[utoipa::path(
    get,
    path = "/api/stats/{id}",
    tag = "Statistics",
    summary = "Get puzzle statistics",
    description = "Totals, success rate, progress and average time per piece across all sessions of the puzzle.",
    params(
        ("id" = String, Path, description = "Puzzle id"),
    ),
    responses(
        (status = 200, description = "Puzzle statistics", body = PuzzleStats),
        (status = 404, description = "Puzzle not found", body = ErrorResponse),
    )
)]
pub async fn puzzle_stats(
    State(state): State<AppState>,
    Path(id): Path<PuzzleId>,
) -> Result<impl IntoResponse, TrackerError> {
    let stats = state.tracker.puzzle_stats(&id).await?;
    Ok(Json(stats))
}

/// `GET /data`: Every puzzle and session.
#[utoipa::path(
    get,
    path = "/api/data",
    tag = "Statistics",
    summary = "Dump the dataset",
    description = "Returns the whole persisted document.",
    responses(
        (status = 200, description = "Full dataset", body = Dataset),
    )
)]
pub async fn get_data(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.tracker.dataset().await)
}

/// Read-side routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/stats/{id}", get(puzzle_stats))
        .route("/data", get(get_data))
}
