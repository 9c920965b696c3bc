//! Promotion rule configuration
//!
//! Bounds are given in whole currency units and converted to cents.

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::foundation::Money;
use crate::domain::promotion::PromotionRules;

/// Numeric bounds for promotion definitions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RulesConfig {
    /// Smallest allowed minimum spend, in currency units
    #[serde(default = "default_min_spend_floor")]
    pub min_spend_floor: i64,

    #[serde(default = "default_percentage_min")]
    pub percentage_min: u8,

    #[serde(default = "default_percentage_max")]
    pub percentage_max: u8,

    /// Largest fixed-amount discount, in currency units
    #[serde(default = "default_fixed_amount_max")]
    pub fixed_amount_max: i64,

    /// Largest cap on a percentage discount, in currency units
    #[serde(default = "default_max_discount_cap")]
    pub max_discount_cap: i64,

    #[serde(default = "default_usage_limit_cap")]
    pub usage_limit_cap: u32,
}

impl RulesConfig {
    /// Converts to the domain rule set.
    pub fn to_rules(&self) -> PromotionRules {
        PromotionRules {
            min_spend_floor: Money::from_units(self.min_spend_floor),
            percentage_min: self.percentage_min,
            percentage_max: self.percentage_max,
            fixed_amount_max: Money::from_units(self.fixed_amount_max),
            max_discount_cap: Money::from_units(self.max_discount_cap),
            usage_limit_cap: self.usage_limit_cap,
        }
    }

    /// Validate rule configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.min_spend_floor < 0 {
            return Err(invalid("min_spend_floor", "must not be negative"));
        }
        if self.percentage_min == 0 {
            return Err(invalid("percentage_min", "must be at least 1"));
        }
        if self.percentage_max > 100 {
            return Err(invalid("percentage_max", "must be at most 100"));
        }
        if self.percentage_min > self.percentage_max {
            return Err(invalid("percentage_min", "exceeds percentage_max"));
        }
        if self.fixed_amount_max < 0 {
            return Err(invalid("fixed_amount_max", "must not be negative"));
        }
        if self.max_discount_cap <= 0 {
            return Err(invalid("max_discount_cap", "must be positive"));
        }
        if i64::from(self.usage_limit_cap) > i64::from(i32::MAX) {
            return Err(invalid("usage_limit_cap", "exceeds storage range"));
        }
        Ok(())
    }
}

fn invalid(rule: &'static str, reason: &str) -> ValidationError {
    ValidationError::InvalidRule {
        rule,
        reason: reason.to_string(),
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            min_spend_floor: default_min_spend_floor(),
            percentage_min: default_percentage_min(),
            percentage_max: default_percentage_max(),
            fixed_amount_max: default_fixed_amount_max(),
            max_discount_cap: default_max_discount_cap(),
            usage_limit_cap: default_usage_limit_cap(),
        }
    }
}

fn default_min_spend_floor() -> i64 {
    50
}

fn default_percentage_min() -> u8 {
    1
}

fn default_percentage_max() -> u8 {
    99
}

fn default_fixed_amount_max() -> i64 {
    10_000
}

fn default_max_discount_cap() -> i64 {
    1_000
}

fn default_usage_limit_cap() -> u32 {
    10_000
}
