//! Solving sessions and their piece event logs.
//!
//! A [`Session`] is active while `ended_at` is `None`. Its `events` vector
//! is an append-only log from the client's point of view: new events are
//! pushed at the tail and undo pops the tail, nothing else touches it.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{PuzzleId, Seconds, SessionId, Timestamp};

/// Outcome of a single placement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A piece was placed correctly.
    PiecePlaced,
    /// A placement attempt failed.
    PieceFailed,
}

impl EventType {
    /// Returns the wire name of the event type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PiecePlaced => "piece_placed",
            Self::PieceFailed => "piece_failed",
        }
    }
}

/// One entry of a session's event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    /// Placement outcome.
    #[serde(rename = "type")]
    pub kind: EventType,
    /// When the event was recorded.
    pub timestamp: Timestamp,
    /// Seconds since the previous action in the session.
    #[serde(default)]
    #[schema(value_type = f64)]
    pub elapsed: Seconds,
}

impl Event {
    /// Creates an event stamped with the current time.
    #[must_use]
    pub fn now(kind: EventType, elapsed: impl Into<Seconds>) -> Self {
        Self {
            kind,
            timestamp: Timestamp::now(),
            elapsed: elapsed.into(),
        }
    }
}

/// A timed solving session for one puzzle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session identifier.
    pub id: SessionId,
    /// Puzzle this session belongs to. Not checked for existence.
    pub puzzle_id: PuzzleId,
    /// Start timestamp.
    pub started_at: Timestamp,
    /// End timestamp, `None` while the session is active.
    pub ended_at: Option<Timestamp>,
    /// Ordered event log.
    #[serde(default)]
    pub events: Vec<Event>,
}

impl Session {
    /// Starts a new, empty, active session for `puzzle_id`.
    #[must_use]
    pub fn start(puzzle_id: PuzzleId) -> Self {
        Self {
            id: SessionId::new(),
            puzzle_id,
            started_at: Timestamp::now(),
            ended_at: None,
            events: Vec::new(),
        }
    }

    /// Returns `true` while the session has not been ended.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Marks the session as ended now. Ending twice moves the end time.
    pub fn end(&mut self) {
        self.ended_at = Some(Timestamp::now());
    }

    /// Appends an event to the log and returns a copy of it.
    pub fn record(&mut self, kind: EventType, elapsed: impl Into<Seconds>) -> Event {
        let event = Event::now(kind, elapsed);
        self.events.push(event.clone());
        event
    }

    /// Removes and returns the last event, if any.
    pub fn undo(&mut self) -> Option<Event> {
        self.events.pop()
    }
}
