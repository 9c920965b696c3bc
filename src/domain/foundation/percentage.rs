//! Percentage value object (whole percentage points, 0-100 scale).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Money, ValidationError};

/// A whole number of percentage points between 0 and 100 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(u8);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Self = Self(0);

    /// One hundred percent.
    pub const HUNDRED: Self = Self(100);

    /// Creates a Percentage, returning error if outside `0..=100`.
    pub fn try_new(value: i64) -> Result<Self, ValidationError> {
        match u8::try_from(value) {
            Ok(points) if points <= 100 => Ok(Self(points)),
            _ => Err(ValidationError::out_of_range("percentage", 0, 100, value)),
        }
    }

    /// Returns the value in percentage points.
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Applies this percentage to an amount, rounding down to the cent.
    pub fn of(&self, amount: Money) -> Money {
        amount.scale_down(i64::from(self.0), 100)
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}
