//! Data Transfer Objects for REST request/response serialization.
//!
//! Field names are camelCase on the wire. Domain types are returned
//! directly where their shape already matches the response.

pub mod common_dto;
pub mod puzzle_dto;
pub mod session_dto;

pub use common_dto::*;
pub use puzzle_dto::*;
pub use session_dto::*;
