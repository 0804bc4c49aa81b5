//! Per-puzzle statistics aggregated over session event logs.
//!
//! [`PuzzleStats::compute`] is a pure projection: it walks every session
//! of a puzzle once, summing per-session counters and collecting the
//! elapsed time of each placed piece, then derives the rate metrics.
//! Every ratio is defined as `0` when its denominator is zero.

use serde::Serialize;
use utoipa::ToSchema;

use super::{EventType, Puzzle, Seconds, Session, SessionId, Timestamp};

/// Per-session counters, without the event log itself.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Session identifier.
    pub id: SessionId,
    /// Session start.
    pub started_at: Timestamp,
    /// Session end, `None` if still active.
    pub ended_at: Option<Timestamp>,
    /// Number of `piece_placed` events.
    pub pieces_placed: u64,
    /// Number of `piece_failed` events.
    pub pieces_failed: u64,
    /// Sum of `elapsed` over all events, in seconds.
    #[schema(value_type = f64)]
    pub total_time: Seconds,
}

/// Aggregated statistics for one puzzle.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleStats {
    /// The puzzle the statistics belong to.
    pub puzzle: Puzzle,
    /// Placed pieces across all sessions.
    pub total_pieces_placed: u64,
    /// Failed attempts across all sessions.
    pub total_pieces_failed: u64,
    /// Seconds spent across all sessions.
    #[schema(value_type = f64)]
    pub total_time: Seconds,
    /// Mean elapsed seconds of placed pieces, two decimals.
    pub avg_time_per_piece: f64,
    /// Placed / (placed + failed) as a percentage, one decimal.
    pub success_rate: f64,
    /// Placed / declared pieces as a percentage, one decimal. Not clamped
    /// at 100.
    pub progress: f64,
    /// Number of sessions for the puzzle.
    pub sessions_count: usize,
    /// Per-session summaries in stored order.
    pub sessions: Vec<SessionSummary>,
}

impl SessionSummary {
    fn from_session(session: &Session, placement_times: &mut Vec<f64>) -> Self {
        let mut pieces_placed = 0u64;
        let mut pieces_failed = 0u64;
        let mut total_time = Seconds::ZERO;

        for event in &session.events {
            total_time += event.elapsed;
            match event.kind {
                EventType::PiecePlaced => {
                    pieces_placed += 1;
                    placement_times.push(event.elapsed.as_f64());
                }
                EventType::PieceFailed => pieces_failed += 1,
            }
        }

        Self {
            id: session.id.clone(),
            started_at: session.started_at.clone(),
            ended_at: session.ended_at.clone(),
            pieces_placed,
            pieces_failed,
            total_time,
        }
    }
}

impl PuzzleStats {
    /// Aggregates the given sessions of `puzzle`.
    ///
    /// The caller selects the sessions; they are summarized in the order
    /// the iterator yields them.
    pub fn compute<'a>(puzzle: &Puzzle, sessions: impl IntoIterator<Item = &'a Session>) -> Self {
        let mut placement_times = Vec::new();
        let summaries: Vec<SessionSummary> = sessions
            .into_iter()
            .map(|s| SessionSummary::from_session(s, &mut placement_times))
            .collect();

        let total_pieces_placed: u64 = summaries.iter().map(|s| s.pieces_placed).sum();
        let total_pieces_failed: u64 = summaries.iter().map(|s| s.pieces_failed).sum();
        let total_time: Seconds = summaries.iter().map(|s| s.total_time).sum();

        let avg_time_per_piece = ratio(
            placement_times.iter().sum(),
            placement_times.len() as f64,
        );
        let attempts = total_pieces_placed + total_pieces_failed;
        let success_rate = ratio(total_pieces_placed as f64, attempts as f64) * 100.0;
        let progress = ratio(
            total_pieces_placed as f64,
            f64::from(puzzle.total_pieces),
        ) * 100.0;

        Self {
            puzzle: puzzle.clone(),
            total_pieces_placed,
            total_pieces_failed,
            total_time,
            avg_time_per_piece: round_to(avg_time_per_piece, 2),
            success_rate: round_to(success_rate, 1),
            progress: round_to(progress, 1),
            sessions_count: summaries.len(),
            sessions: summaries,
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Rounds to `places` decimal places using the exact binary value, with
/// ties to even. `0.125` becomes `0.12`, and `2.675`, stored just below
/// the midpoint, becomes `2.67`.
fn round_to(value: f64, places: usize) -> f64 {
    format!("{value:.places$}").parse().unwrap_or(value)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::PuzzleId;

    fn session_with(puzzle_id: &PuzzleId, events: &[(EventType, f64)]) -> Session {
        let mut session = Session::start(puzzle_id.clone());
        for (kind, elapsed) in events {
            session.record(*kind, *elapsed);
        }
        session
    }

    #[test]
    fn single_session_metrics() {
        let puzzle = Puzzle::new("Ten", 10);
        let session = session_with(
            &puzzle.id,
            &[
                (EventType::PiecePlaced, 5.0),
                (EventType::PiecePlaced, 3.0),
                (EventType::PieceFailed, 2.0),
            ],
        );

        let stats = PuzzleStats::compute(&puzzle, [&session]);

        assert_eq!(stats.total_pieces_placed, 2);
        assert_eq!(stats.total_pieces_failed, 1);
        assert!((stats.total_time.as_f64() - 10.0).abs() < f64::EPSILON);
        assert!((stats.avg_time_per_piece - 4.0).abs() < f64::EPSILON);
        assert!((stats.success_rate - 66.7).abs() < f64::EPSILON);
        assert!((stats.progress - 20.0).abs() < f64::EPSILON);
        assert_eq!(stats.sessions_count, 1);
    }

    #[test]
    fn no_sessions_yields_zeroes() {
        let puzzle = Puzzle::new("Empty", 500);
        let stats = PuzzleStats::compute(&puzzle, std::iter::empty());

        assert_eq!(stats.total_pieces_placed, 0);
        assert_eq!(stats.total_pieces_failed, 0);
        assert!(stats.total_time.as_f64().abs() < f64::EPSILON);
        assert!(stats.avg_time_per_piece.abs() < f64::EPSILON);
        assert!(stats.success_rate.abs() < f64::EPSILON);
        assert!(stats.progress.abs() < f64::EPSILON);
        assert_eq!(stats.sessions_count, 0);
        assert!(stats.sessions.is_empty());
    }

    #[test]
    fn zero_piece_puzzle_has_zero_progress() {
        let puzzle = Puzzle::new("Nothing", 0);
        let session = session_with(&puzzle.id, &[(EventType::PiecePlaced, 1.0)]);
        let stats = PuzzleStats::compute(&puzzle, [&session]);
        assert!(stats.progress.abs() < f64::EPSILON);
        assert!((stats.success_rate - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn only_failures_have_zero_average() {
        let puzzle = Puzzle::new("Hard", 10);
        let session = session_with(
            &puzzle.id,
            &[(EventType::PieceFailed, 4.0), (EventType::PieceFailed, 6.0)],
        );
        let stats = PuzzleStats::compute(&puzzle, [&session]);
        assert!(stats.avg_time_per_piece.abs() < f64::EPSILON);
        assert!(stats.success_rate.abs() < f64::EPSILON);
        assert!((stats.total_time.as_f64() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn progress_is_not_clamped() {
        let puzzle = Puzzle::new("Tiny", 2);
        let session = session_with(
            &puzzle.id,
            &[
                (EventType::PiecePlaced, 1.0),
                (EventType::PiecePlaced, 1.0),
                (EventType::PiecePlaced, 1.0),
            ],
        );
        let stats = PuzzleStats::compute(&puzzle, [&session]);
        assert!((stats.progress - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn average_spans_sessions_and_keeps_order() {
        let puzzle = Puzzle::new("Two", 100);
        let first = session_with(&puzzle.id, &[(EventType::PiecePlaced, 1.0)]);
        let second = session_with(
            &puzzle.id,
            &[
                (EventType::PiecePlaced, 2.0),
                (EventType::PieceFailed, 7.0),
            ],
        );

        let stats = PuzzleStats::compute(&puzzle, [&first, &second]);

        assert!((stats.avg_time_per_piece - 1.5).abs() < f64::EPSILON);
        assert!((stats.total_time.as_f64() - 10.0).abs() < f64::EPSILON);
        let ids: Vec<&SessionId> = stats.sessions.iter().map(|s| &s.id).collect();
        assert_eq!(ids, vec![&first.id, &second.id]);
        let Some(second_summary) = stats.sessions.get(1) else {
            panic!("expected two summaries");
        };
        assert_eq!(second_summary.pieces_placed, 1);
        assert_eq!(second_summary.pieces_failed, 1);
        assert!((second_summary.total_time.as_f64() - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn average_rounds_to_two_decimals() {
        let puzzle = Puzzle::new("Odd", 10);
        let session = session_with(
            &puzzle.id,
            &[
                (EventType::PiecePlaced, 1.0),
                (EventType::PiecePlaced, 1.0),
                (EventType::PiecePlaced, 2.0),
            ],
        );
        let stats = PuzzleStats::compute(&puzzle, [&session]);
        assert!((stats.avg_time_per_piece - 1.33).abs() < f64::EPSILON);
    }

    #[test]
    fn whole_elapsed_values_keep_total_time_whole() {
        let puzzle = Puzzle::new("Whole", 10);
        let mut session = Session::start(puzzle.id.clone());
        session.record(EventType::PiecePlaced, 5_i64);
        session.record(EventType::PieceFailed, 5_i64);
        let stats = PuzzleStats::compute(&puzzle, [&session]);

        assert_eq!(stats.total_time, Seconds::Whole(10));
        let Ok(value) = serde_json::to_value(&stats) else {
            panic!("serialization failed");
        };
        assert_eq!(value.get("totalTime"), Some(&serde_json::json!(10)));
    }

    #[test]
    fn rounding_ties_go_to_even() {
        assert!((round_to(0.125, 2) - 0.12).abs() < f64::EPSILON);
        assert!((round_to(0.375, 2) - 0.38).abs() < f64::EPSILON);
        assert!((round_to(12.25, 1) - 12.2).abs() < f64::EPSILON);
        assert!((round_to(2.675, 2) - 2.67).abs() < f64::EPSILON);
        assert!((round_to(66.666_666, 1) - 66.7).abs() < f64::EPSILON);
        assert!(round_to(0.0, 2).abs() < f64::EPSILON);
    }

    #[test]
    fn average_of_exact_tie_rounds_to_even() {
        let puzzle = Puzzle::new("Tie", 10);
        let session = session_with(&puzzle.id, &[(EventType::PiecePlaced, 0.125)]);
        let stats = PuzzleStats::compute(&puzzle, [&session]);
        assert!((stats.avg_time_per_piece - 0.12).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_serializes_camel_case_without_events() {
        let puzzle = Puzzle::new("Json", 10);
        let session = session_with(&puzzle.id, &[(EventType::PiecePlaced, 1.0)]);
        let stats = PuzzleStats::compute(&puzzle, [&session]);
        let Ok(value) = serde_json::to_value(&stats) else {
            panic!("serialization failed");
        };
        assert!(value.get("avgTimePerPiece").is_some());
        assert!(value.get("sessionsCount").is_some());
        let Some(summary) = value.get("sessions").and_then(|s| s.get(0)) else {
            panic!("expected a session summary");
        };
        assert!(summary.get("piecesPlaced").is_some());
        assert!(summary.get("events").is_none());
    }
}
