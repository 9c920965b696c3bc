//! Money value object.
//!
//! Amounts are held as a signed count of minor currency units (cents).
//! Floats never touch money: percentage discounts are computed in integer
//! arithmetic and truncate toward zero, which for non-negative amounts is
//! rounding down to the smallest currency unit.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Number of minor units per whole currency unit.
pub const MINOR_UNITS_PER_UNIT: i64 = 100;

/// An amount of money in minor currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units (cents).
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Creates an amount from whole currency units.
    ///
    /// Saturates instead of overflowing for absurdly large inputs.
    pub const fn from_units(units: i64) -> Self {
        Self(units.saturating_mul(MINOR_UNITS_PER_UNIT))
    }

    /// Creates a non-negative amount, rejecting negative input.
    pub fn try_non_negative(field: &str, cents: i64) -> Result<Self, ValidationError> {
        if cents < 0 {
            return Err(ValidationError::below_minimum(field, 0, cents));
        }
        Ok(Self(cents))
    }

    /// Returns the amount in minor units.
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns true if the amount is exactly zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if the amount is below zero.
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by `numerator / denominator`, truncating toward zero.
    ///
    /// Intermediate math runs in `i128` so large order totals cannot
    /// overflow before the division.
    pub fn scale_down(&self, numerator: i64, denominator: i64) -> Self {
        if denominator == 0 {
            return Self::ZERO;
        }
        let scaled = i128::from(self.0) * i128::from(numerator) / i128::from(denominator);
        Self(i64::try_from(scaled).unwrap_or(if scaled < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Subtracts, never going below zero.
    pub fn saturating_sub(&self, other: Money) -> Self {
        Self(self.0.saturating_sub(other.0).max(0))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_unit = MINOR_UNITS_PER_UNIT.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / per_unit, abs % per_unit)
    }
}
