//! UTC timestamps stored in their original ISO-8601 text.

use chrono::{DateTime, ParseError, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// An ISO-8601 UTC timestamp such as `2024-01-01T10:06:00.500000Z`.
///
/// The text is validated on parse and written back verbatim, so a stored
/// document keeps its exact timestamp spelling across rewrites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct Timestamp(String);

impl Timestamp {
    /// The current time with microsecond precision and a `Z` suffix.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string())
    }

    /// Validates `text` as an RFC 3339 timestamp.
    ///
    /// # Errors
    ///
    /// Returns the chrono [`ParseError`] if `text` is not a timestamp.
    pub fn parse(text: impl Into<String>) -> Result<Self, ParseError> {
        let text = text.into();
        DateTime::parse_from_rfc3339(&text)?;
        Ok(Self(text))
    }

    /// Returns the timestamp text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(text).map_err(serde::de::Error::custom)
    }
}
