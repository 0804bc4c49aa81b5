//! REST endpoint handlers organized by resource.

pub mod event;
pub mod puzzle;
pub mod session;
pub mod stats;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(puzzle::routes())
        .merge(session::routes())
        .merge(event::routes())
        .merge(stats::routes())
}
