//! Discount kinds.
//!
//! The kind is a closed set. Each variant carries exactly the data that
//! makes sense for it, so a free-shipping promotion cannot hold a value
//! and only percentage discounts can carry a cap.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Money, Percentage};

/// Discriminant of [`DiscountKind`], used for filtering and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKindTag {
    Percentage,
    FixedAmount,
    FreeShipping,
}

impl DiscountKindTag {
    /// Returns the stable storage name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountKindTag::Percentage => "percentage",
            DiscountKindTag::FixedAmount => "fixed_amount",
            DiscountKindTag::FreeShipping => "free_shipping",
        }
    }
}

impl fmt::Display for DiscountKindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiscountKindTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "percentage" => Ok(DiscountKindTag::Percentage),
            "fixed_amount" => Ok(DiscountKindTag::FixedAmount),
            "free_shipping" => Ok(DiscountKindTag::FreeShipping),
            other => Err(format!("unknown discount kind '{}'", other)),
        }
    }
}

/// What a promotion takes off an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiscountKind {
    /// Percentage of the order total, optionally capped.
    Percentage {
        percent: Percentage,
        /// Absolute cap on the discount; `None` means uncapped.
        max_discount: Option<Money>,
    },

    /// Fixed amount off, never more than the order total.
    FixedAmount { amount: Money },

    /// Shipping fee waived by the order subsystem.
    FreeShipping,
}

impl DiscountKind {
    /// Returns the discriminant.
    pub fn tag(&self) -> DiscountKindTag {
        match self {
            DiscountKind::Percentage { .. } => DiscountKindTag::Percentage,
            DiscountKind::FixedAmount { .. } => DiscountKindTag::FixedAmount,
            DiscountKind::FreeShipping => DiscountKindTag::FreeShipping,
        }
    }

    /// Returns the flat magnitude: percentage points, cents, or zero.
    pub fn value(&self) -> i64 {
        match self {
            DiscountKind::Percentage { percent, .. } => i64::from(percent.value()),
            DiscountKind::FixedAmount { amount } => amount.cents(),
            DiscountKind::FreeShipping => 0,
        }
    }

    /// Returns the cap in flat form, zero meaning "no cap".
    pub fn max_discount(&self) -> Money {
        match self {
            DiscountKind::Percentage {
                max_discount: Some(cap),
                ..
            } => *cap,
            _ => Money::ZERO,
        }
    }
}

impl fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountKind::Percentage {
                percent,
                max_discount: Some(cap),
            } => write!(f, "{} off (up to {})", percent, cap),
            DiscountKind::Percentage { percent, .. } => write!(f, "{} off", percent),
            DiscountKind::FixedAmount { amount } => write!(f, "{} off", amount),
            DiscountKind::FreeShipping => f.write_str("free shipping"),
        }
    }
}
