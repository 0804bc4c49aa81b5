//! Shared DTO types used across multiple endpoints.

use serde::Serialize;
use utoipa::ToSchema;

/// Acknowledgement body for delete endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SuccessResponse {
    /// Always `true`.
    pub success: bool,
}

impl SuccessResponse {
    /// The only value this response takes.
    #[must_use]
    pub const fn ok() -> Self {
        Self { success: true }
    }
}
