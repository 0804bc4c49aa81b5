//! Puzzle request DTOs.

use serde::Deserialize;
use utoipa::ToSchema;

/// Request body for `POST /api/puzzles`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePuzzleRequest {
    /// Display name. Defaults to `"Unnamed Puzzle"`.
    #[serde(default = "default_name")]
    pub name: String,
    /// Declared piece count. Defaults to 0.
    #[serde(default)]
    pub total_pieces: u32,
}

fn default_name() -> String {
    "Unnamed Puzzle".to_string()
}
