//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use super::handlers;

/// Generated OpenAPI description of every endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    paths(
        handlers::puzzle::create_puzzle,
        handlers::puzzle::delete_puzzle,
        handlers::puzzle::active_session,
        handlers::session::start_session,
        handlers::session::end_session,
        handlers::session::delete_session,
        handlers::session::undo_last_event,
        handlers::event::record_event,
        handlers::stats::puzzle_stats,
        handlers::stats::get_data,
        handlers::system::health_handler,
    ),
    tags(
        (name = "Puzzles", description = "Puzzle lifecycle"),
        (name = "Sessions", description = "Timed solving sessions"),
        (name = "Events", description = "Piece placement log"),
        (name = "Statistics", description = "Derived progress metrics"),
        (name = "System", description = "Operational endpoints"),
    )
)]
pub struct ApiDoc;
