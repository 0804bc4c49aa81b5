//! Puzzle records.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{PuzzleId, Timestamp};

/// A puzzle being solved.
///
/// Created once through [`Puzzle::new`] and never modified afterwards;
/// the only other lifecycle step is deletion, which also removes every
/// session that references it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    /// Unique puzzle identifier.
    pub id: PuzzleId,
    /// Display name.
    pub name: String,
    /// Declared number of pieces. Used as the denominator for progress.
    pub total_pieces: u32,
    /// Creation timestamp.
    pub created_at: Timestamp,
}

impl Puzzle {
    /// Creates a puzzle with a fresh id and the current timestamp.
    #[must_use]
    pub fn new(name: impl Into<String>, total_pieces: u32) -> Self {
        Self {
            id: PuzzleId::new(),
            name: name.into(),
            total_pieces,
            created_at: Timestamp::now(),
        }
    }
}
