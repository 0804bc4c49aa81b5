//! Session and event request DTOs.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{EventType, PuzzleId, Seconds, SessionId};

/// Request body for `POST /api/sessions/start`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StartSessionRequest {
    /// Puzzle to start a session for.
    pub puzzle_id: PuzzleId,
}

/// Request body for `POST /api/events`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordEventRequest {
    /// Session receiving the event.
    pub session_id: SessionId,
    /// Placement outcome.
    #[serde(rename = "type")]
    pub kind: EventType,
    /// Seconds since the previous action. Defaults to 0.
    #[serde(default)]
    #[schema(value_type = f64)]
    pub elapsed: Seconds,
}
