//! Service layer: business logic orchestration.
//!
//! [`TrackerService`] runs every tracker operation as one store cycle and
//! computes statistics from the loaded [`crate::domain::Dataset`].

pub mod tracker_service;

pub use tracker_service::{TrackerService, UndoOutcome};
