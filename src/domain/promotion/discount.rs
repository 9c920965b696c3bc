//! Discount calculation.
//!
//! Pure: the caller supplies the clock reading, so the same promotion,
//! order total and instant always produce the same quote.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Money, Timestamp};

use super::{DiscountKind, Promotion, PromotionStatus};

/// Why a promotion cannot be applied to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum IneligibleReason {
    BelowMinimumSpend { min_spend: Money, order_total: Money },
    NotCurrentlyActive { status: PromotionStatus },
    UsageLimitReached { used: u32, limit: u32 },
}

impl IneligibleReason {
    /// Message suitable for showing to the customer at checkout.
    pub fn user_message(&self) -> String {
        match self {
            IneligibleReason::BelowMinimumSpend { min_spend, order_total } => format!(
                "Spend at least {} to use this code (order total is {})",
                min_spend, order_total
            ),
            IneligibleReason::NotCurrentlyActive { status } => {
                format!("This code is not currently active (it is {})", status)
            }
            IneligibleReason::UsageLimitReached { limit, .. } => {
                format!("This code has reached its limit of {} uses", limit)
            }
        }
    }
}

/// Outcome of pricing a promotion against an order total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountQuote {
    pub eligible: bool,
    /// Amount taken off the order; zero when ineligible.
    pub discount_amount: Money,
    /// Set for free-shipping promotions; the order subsystem zeroes the fee.
    pub waive_shipping: bool,
    pub reason: Option<IneligibleReason>,
}

impl DiscountQuote {
    fn ineligible(reason: IneligibleReason) -> Self {
        Self {
            eligible: false,
            discount_amount: Money::ZERO,
            waive_shipping: false,
            reason: Some(reason),
        }
    }

    fn granted(discount_amount: Money, waive_shipping: bool) -> Self {
        Self {
            eligible: true,
            discount_amount,
            waive_shipping,
            reason: None,
        }
    }
}

/// Prices `promotion` against `order_total` at `now`.
///
/// Eligibility is checked in order: minimum spend, derived status, usage
/// limit. The first failing check is reported.
pub fn calculate(promotion: &Promotion, order_total: Money, now: Timestamp) -> DiscountQuote {
    if order_total < promotion.min_spend {
        return DiscountQuote::ineligible(IneligibleReason::BelowMinimumSpend {
            min_spend: promotion.min_spend,
            order_total,
        });
    }

    let status = promotion.status_at(now);
    if !status.is_redeemable() {
        return DiscountQuote::ineligible(IneligibleReason::NotCurrentlyActive { status });
    }

    if promotion.limit_reached() {
        return DiscountQuote::ineligible(IneligibleReason::UsageLimitReached {
            used: promotion.used,
            limit: promotion.usage_limit,
        });
    }

    match promotion.discount {
        DiscountKind::Percentage { percent, max_discount } => {
            let raw = percent.of(order_total);
            let amount = match max_discount {
                Some(cap) if !cap.is_zero() => raw.min(cap),
                _ => raw,
            };
            DiscountQuote::granted(amount.max(Money::ZERO), false)
        }
        DiscountKind::FixedAmount { amount } => {
            DiscountQuote::granted(amount.min(order_total).max(Money::ZERO), false)
        }
        DiscountKind::FreeShipping => DiscountQuote::granted(Money::ZERO, true),
    }
}
