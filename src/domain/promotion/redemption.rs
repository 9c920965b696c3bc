//! Redemption ledger types.
//!
//! A redemption is keyed by `(promotion_id, order_id)`. The key makes a
//! repeated redeem for the same order a replay instead of a second use.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Money, OrderId, PromotionId, Timestamp};

use super::DiscountQuote;

/// What the caller asks the ledger to commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedemptionRequest {
    pub promotion_id: PromotionId,
    pub order_id: OrderId,
    pub discount_amount: Money,
    pub redeemed_at: Timestamp,
}

/// Immutable audit entry for one successful redemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub promotion_id: PromotionId,
    pub order_id: OrderId,
    pub discount_amount: Money,
    pub redeemed_at: Timestamp,
}

impl From<RedemptionRequest> for LedgerEntry {
    fn from(req: RedemptionRequest) -> Self {
        Self {
            promotion_id: req.promotion_id,
            order_id: req.order_id,
            discount_amount: req.discount_amount,
            redeemed_at: req.redeemed_at,
        }
    }
}

/// Result of an atomic redeem attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedemptionOutcome {
    /// Usage incremented and entry appended.
    Redeemed { entry: LedgerEntry, used: u32 },

    /// The order was already redeemed; nothing changed.
    AlreadyRedeemed { entry: LedgerEntry, used: u32 },

    /// The limit guard failed at commit time.
    LimitReached { limit: u32 },

    /// The promotion no longer exists.
    NotFound,
}

/// Returned to the caller of apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedPromotion {
    pub promotion_id: PromotionId,
    pub code: String,
    pub order_id: OrderId,
    pub quote: DiscountQuote,
    /// Usage count after this redemption (or the current count on replay).
    pub used: u32,
    /// True when the order had already been redeemed earlier.
    pub replayed: bool,
}

impl AppliedPromotion {
    /// Builds the result of a replayed redemption from its original entry.
    ///
    /// The original discount is returned, not a fresh quote, so a retried
    /// checkout is charged the same amount.
    pub fn replay(code: impl Into<String>, entry: LedgerEntry, waive_shipping: bool, used: u32) -> Self {
        Self {
            promotion_id: entry.promotion_id,
            code: code.into(),
            order_id: entry.order_id,
            quote: DiscountQuote {
                eligible: true,
                discount_amount: entry.discount_amount,
                waive_shipping,
                reason: None,
            },
            used,
            replayed: true,
        }
    }
}
