//! ApplyPromotionHandler - Command handler for redeeming a code against an order.
//!
//! Eligibility is checked twice: optimistically against the loaded
//! snapshot to price the discount, then authoritatively by the ledger's
//! conditional increment at commit. Losing the race at commit is reported
//! as `ConcurrencyConflict` so the caller re-quotes instead of retrying
//! with a stale price.
//!
//! The order id is the idempotency key. Applying the same code to the same
//! order again returns the original redemption with `replayed = true`.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::{Money, OrderId};
use crate::domain::promotion::{
    calculate, AppliedPromotion, DiscountKind, LedgerEntry, Promotion, PromotionError,
    RedemptionOutcome, RedemptionRequest, ValidationErrors,
};
use crate::ports::{Clock, PromotionRepository, RedemptionLedger};

use super::load_by_code;

/// Command to apply a code to an order.
#[derive(Debug, Clone)]
pub struct ApplyPromotionCommand {
    pub code: String,
    pub order_total: Money,
    pub order_id: String,
}

/// Handler for applying promotions.
pub struct ApplyPromotionHandler {
    repository: Arc<dyn PromotionRepository>,
    ledger: Arc<dyn RedemptionLedger>,
    clock: Arc<dyn Clock>,
}

impl ApplyPromotionHandler {
    pub fn new(
        repository: Arc<dyn PromotionRepository>,
        ledger: Arc<dyn RedemptionLedger>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            ledger,
            clock,
        }
    }

    #[tracing::instrument(
        name = "promotions.apply",
        skip(self, cmd),
        fields(code = %cmd.code, order_id = %cmd.order_id, order_total = %cmd.order_total),
        err
    )]
    pub async fn handle(&self, cmd: ApplyPromotionCommand) -> Result<AppliedPromotion, PromotionError> {
        // 1. Validate order input
        let order_id = OrderId::new(cmd.order_id).map_err(ValidationErrors::from)?;
        let order_total =
            Money::try_non_negative("order_total", cmd.order_total.cents()).map_err(ValidationErrors::from)?;

        // 2. Resolve the code
        let promotion = load_by_code(self.repository.as_ref(), &cmd.code).await?;

        // 3. A known order replays its original redemption
        if let Some(entry) = self.ledger.find(&promotion.id, &order_id).await? {
            info!(promotion_id = %promotion.id, %order_id, "redemption replayed");
            return Ok(replay(&promotion, entry, promotion.used));
        }

        // 4. Optimistic eligibility and pricing
        let now = self.clock.now();
        let quote = calculate(&promotion, order_total, now);
        if let Some(reason) = quote.reason {
            info!(promotion_id = %promotion.id, ?reason, "promotion rejected for order");
            return Err(PromotionError::Ineligible(reason));
        }

        // 5. Authoritative commit
        let outcome = self
            .ledger
            .redeem(RedemptionRequest {
                promotion_id: promotion.id,
                order_id: order_id.clone(),
                discount_amount: quote.discount_amount,
                redeemed_at: now,
            })
            .await?;

        match outcome {
            RedemptionOutcome::Redeemed { entry, used } => {
                info!(
                    promotion_id = %promotion.id,
                    %order_id,
                    discount = %entry.discount_amount,
                    used,
                    "promotion redeemed"
                );
                Ok(AppliedPromotion {
                    promotion_id: promotion.id,
                    code: promotion.code.to_string(),
                    order_id,
                    quote,
                    used,
                    replayed: false,
                })
            }
            RedemptionOutcome::AlreadyRedeemed { entry, used } => {
                info!(promotion_id = %promotion.id, %order_id, "redemption replayed at commit");
                Ok(replay(&promotion, entry, used))
            }
            RedemptionOutcome::LimitReached { limit } => {
                warn!(promotion_id = %promotion.id, %order_id, limit, "usage limit reached at commit");
                Err(PromotionError::ConcurrencyConflict {
                    promotion_id: promotion.id,
                })
            }
            RedemptionOutcome::NotFound => Err(PromotionError::not_found(promotion.id)),
        }
    }
}

fn replay(promotion: &Promotion, entry: LedgerEntry, used: u32) -> AppliedPromotion {
    let waive_shipping = matches!(promotion.discount, DiscountKind::FreeShipping);
    AppliedPromotion::replay(promotion.code.as_str(), entry, waive_shipping, used)
}
