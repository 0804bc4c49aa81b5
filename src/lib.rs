//! # puzzle-tracker
//!
//! REST service for tracking puzzle-solving sessions: puzzles, timed
//! sessions, and the piece placement events recorded in each session,
//! plus per-puzzle statistics derived from those event logs.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, static frontend)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── TrackerService (service/)
//!     ├── Dataset + statistics (domain/)
//!     │
//!     ├── Store: load → mutate → save, one writer at a time (persistence/)
//!     │
//!     └── StorageBackend: local JSON file | Google Cloud Storage | memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod server;
pub mod service;
