//! The persisted aggregate root.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::stats::PuzzleStats;
use super::{Puzzle, PuzzleId, Session, SessionId};

/// Every puzzle and every session, persisted as one JSON document.
///
/// Collections keep insertion order. Lookups are linear scans; the
/// dataset of a single tracker stays small enough that an index would
/// only add bookkeeping to every mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Dataset {
    /// All puzzles in creation order.
    #[serde(default)]
    pub puzzles: Vec<Puzzle>,
    /// All sessions in start order.
    #[serde(default)]
    pub sessions: Vec<Session>,
}

impl Dataset {
    /// Returns the puzzle with the given id.
    #[must_use]
    pub fn puzzle(&self, id: &PuzzleId) -> Option<&Puzzle> {
        self.puzzles.iter().find(|p| &p.id == id)
    }

    /// Removes a puzzle together with all of its sessions.
    ///
    /// Returns the number of sessions removed. Removing an unknown puzzle
    /// is not an error.
    pub fn remove_puzzle(&mut self, id: &PuzzleId) -> usize {
        self.puzzles.retain(|p| &p.id != id);
        let before = self.sessions.len();
        self.sessions.retain(|s| &s.puzzle_id != id);
        before - self.sessions.len()
    }

    /// Returns the session with the given id for mutation.
    pub fn session_mut(&mut self, id: &SessionId) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| &s.id == id)
    }

    /// Removes the session with the given id, returning it if it existed.
    pub fn remove_session(&mut self, id: &SessionId) -> Option<Session> {
        let index = self.sessions.iter().position(|s| &s.id == id)?;
        Some(self.sessions.remove(index))
    }

    /// Sessions belonging to a puzzle, in stored order.
    pub fn sessions_for<'a, 'b>(
        &'a self,
        puzzle_id: &'b PuzzleId,
    ) -> impl Iterator<Item = &'a Session> + use<'a, 'b> {
        self.sessions.iter().filter(move |s| &s.puzzle_id == puzzle_id)
    }

    /// First active session of a puzzle in stored order.
    #[must_use]
    pub fn active_session(&self, puzzle_id: &PuzzleId) -> Option<&Session> {
        self.sessions_for(puzzle_id).find(|s| s.is_active())
    }

    /// Computes statistics for a puzzle, or `None` if the puzzle is unknown.
    #[must_use]
    pub fn stats(&self, puzzle_id: &PuzzleId) -> Option<PuzzleStats> {
        let puzzle = self.puzzle(puzzle_id)?;
        Some(PuzzleStats::compute(puzzle, self.sessions_for(puzzle_id)))
    }
}
