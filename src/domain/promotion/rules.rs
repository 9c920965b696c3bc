//! Numeric bounds enforced on promotion definitions.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Money;

/// Bounds applied by validation on create, update, duplicate and reactivate.
///
/// Defaults are the house rules; deployments may tighten them through
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionRules {
    /// Smallest minimum-spend a promotion may require.
    pub min_spend_floor: Money,
    /// Lowest percentage discount, in points.
    pub percentage_min: u8,
    /// Highest percentage discount, in points.
    pub percentage_max: u8,
    /// Largest fixed-amount discount.
    pub fixed_amount_max: Money,
    /// Largest cap a percentage discount may declare.
    pub max_discount_cap: Money,
    /// Largest finite usage limit.
    pub usage_limit_cap: u32,
}

impl Default for PromotionRules {
    fn default() -> Self {
        Self {
            min_spend_floor: Money::from_units(50),
            percentage_min: 1,
            percentage_max: 99,
            fixed_amount_max: Money::from_units(10_000),
            max_discount_cap: Money::from_units(1_000),
            usage_limit_cap: 10_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_house_rules() {
        let rules = PromotionRules::default();
        assert_eq!(rules.min_spend_floor.cents(), 5_000);
        assert_eq!((rules.percentage_min, rules.percentage_max), (1, 99));
        assert_eq!(rules.fixed_amount_max.cents(), 1_000_000);
        assert_eq!(rules.max_discount_cap.cents(), 100_000);
        assert_eq!(rules.usage_limit_cap, 10_000);
    }
}
