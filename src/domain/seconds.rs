//! Elapsed-time values.
//!
//! Stored documents hold `elapsed` as whatever JSON number the client
//! sent, so `60` and `60.0` are both valid. [`Seconds`] keeps that form
//! so reading and re-writing a document leaves it unchanged, and sums
//! stay whole until a fractional value is added.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// A duration in seconds, whole or fractional.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Seconds {
    /// An integral number of seconds, written without a fraction.
    Whole(i64),
    /// A fractional number of seconds.
    Fractional(f64),
}

impl Seconds {
    /// Zero seconds.
    pub const ZERO: Self = Self::Whole(0);

    /// Returns the value as a float.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Whole(n) => n as f64,
            Self::Fractional(x) => x,
        }
    }

    /// Returns `true` for a finite, non-negative duration.
    #[must_use]
    pub fn is_valid_duration(self) -> bool {
        let value = self.as_f64();
        value.is_finite() && value >= 0.0
    }
}

impl Default for Seconds {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Seconds {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::Whole(a), Self::Whole(b)) => a
                .checked_add(b)
                .map_or_else(|| Self::Fractional(self.as_f64() + rhs.as_f64()), Self::Whole),
            _ => Self::Fractional(self.as_f64() + rhs.as_f64()),
        }
    }
}

impl AddAssign for Seconds {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Seconds {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<i64> for Seconds {
    fn from(value: i64) -> Self {
        Self::Whole(value)
    }
}

impl From<f64> for Seconds {
    fn from(value: f64) -> Self {
        Self::Fractional(value)
    }
}

impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Whole(n) => write!(f, "{n}"),
            Self::Fractional(x) => write!(f, "{x}"),
        }
    }
}
