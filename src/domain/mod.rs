//! Domain layer: puzzles, sessions, event logs, and statistics.
//!
//! Everything in here is plain data plus pure functions over it. The
//! [`Dataset`] is the unit of persistence; mutations and queries in
//! [`crate::service`] load it, work on it through the methods defined
//! here, and hand it back to the store.

pub mod dataset;
pub mod ids;
pub mod puzzle;
pub mod seconds;
pub mod session;
pub mod stats;
pub mod timestamp;

pub use dataset::Dataset;
pub use ids::{PuzzleId, SessionId};
pub use puzzle::Puzzle;
pub use seconds::Seconds;
pub use session::{Event, EventType, Session};
pub use stats::{PuzzleStats, SessionSummary};
pub use timestamp::Timestamp;
