//! UpdatePromotionHandler - Command handler for editing a promotion definition.
//!
//! Every descriptive field is replaced and re-validated. Usage is never
//! edited, and a finite limit may not drop below what was already used.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::PromotionId;
use crate::domain::promotion::{
    validate_input, PromotionError, PromotionInput, PromotionRules, PromotionView,
};
use crate::ports::{Clock, PromotionRepository};

use super::load;

/// Command to replace a promotion's definition.
#[derive(Debug, Clone)]
pub struct UpdatePromotionCommand {
    pub promotion_id: PromotionId,
    pub input: PromotionInput,
}

/// Handler for editing promotions.
pub struct UpdatePromotionHandler {
    repository: Arc<dyn PromotionRepository>,
    clock: Arc<dyn Clock>,
    rules: PromotionRules,
}

impl UpdatePromotionHandler {
    pub fn new(
        repository: Arc<dyn PromotionRepository>,
        clock: Arc<dyn Clock>,
        rules: PromotionRules,
    ) -> Self {
        Self {
            repository,
            clock,
            rules,
        }
    }

    #[tracing::instrument(
        name = "promotions.update",
        skip(self, cmd),
        fields(promotion_id = %cmd.promotion_id),
        err
    )]
    pub async fn handle(&self, cmd: UpdatePromotionCommand) -> Result<PromotionView, PromotionError> {
        let mut promotion = load(self.repository.as_ref(), cmd.promotion_id).await?;
        let def = validate_input(&cmd.input, &self.rules)?;

        if def.code != promotion.code {
            if let Some(other) = self.repository.find_by_code(def.code.as_str()).await? {
                if other.id != promotion.id {
                    return Err(PromotionError::code_conflict(def.code.as_str()));
                }
            }
        }

        let now = self.clock.now();
        promotion.apply_edit(def, now)?;
        self.repository.update(&promotion).await?;

        info!(promotion_id = %promotion.id, code = %promotion.code, "promotion updated");

        // Usage may have moved while we edited; report the stored count.
        let stored = load(self.repository.as_ref(), promotion.id).await?;
        Ok(stored.view_at(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::promotion::test_support::{
        fixed_input, percentage_input, Fixture, StaleReadRepository,
    };
    use crate::domain::foundation::ValidationError;
    use crate::domain::foundation::{Money, OrderId};
    use crate::domain::promotion::{DiscountKind, PromotionStatus, RedemptionRequest};
    use crate::ports::RedemptionLedger;

    fn handler(fx: &Fixture) -> UpdatePromotionHandler {
        UpdatePromotionHandler::new(fx.store.clone(), fx.clock.clone(), fx.rules.clone())
    }

    async fn redeem(fx: &Fixture, promotion_id: PromotionId, order: &str) {
        fx.store
            .redeem(RedemptionRequest {
                promotion_id,
                order_id: OrderId::new(order).unwrap(),
                discount_amount: Money::from_cents(500),
                redeemed_at: fx.now(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn replaces_definition_and_keeps_usage() {
        let fx = Fixture::new();
        let promo = fx.seed(fixed_input("FIVE", 10)).await;
        redeem(&fx, promo.id, "o-1").await;

        let mut input = percentage_input("five-pct");
        input.value = 5;
        let view = handler(&fx)
            .handle(UpdatePromotionCommand {
                promotion_id: promo.id,
                input,
            })
            .await
            .unwrap();

        assert_eq!(view.promotion.code.as_str(), "FIVE-PCT");
        assert!(matches!(view.promotion.discount, DiscountKind::Percentage { .. }));
        assert_eq!(view.promotion.used, 1);
        assert_eq!(view.promotion.created_at, promo.created_at);
        assert_eq!(view.status, PromotionStatus::Active);
    }

    #[tokio::test]
    async fn keeping_own_code_is_not_a_conflict() {
        let fx = Fixture::new();
        let promo = fx.seed(percentage_input("SAME")).await;
        let mut input = percentage_input("same");
        input.name = "Renamed".to_string();
        let view = handler(&fx)
            .handle(UpdatePromotionCommand {
                promotion_id: promo.id,
                input,
            })
            .await
            .unwrap();
        assert_eq!(view.promotion.name, "Renamed");
    }

    #[tokio::test]
    async fn taking_another_code_conflicts() {
        let fx = Fixture::new();
        fx.seed(percentage_input("TAKEN")).await;
        let promo = fx.seed(percentage_input("MINE")).await;

        let err = handler(&fx)
            .handle(UpdatePromotionCommand {
                promotion_id: promo.id,
                input: percentage_input("taken"),
            })
            .await
            .unwrap_err();
        assert_eq!(err, PromotionError::code_conflict("TAKEN"));
    }

    #[tokio::test]
    async fn lowering_limit_below_usage_is_rejected() {
        let fx = Fixture::new();
        let promo = fx.seed(fixed_input("LIMITED", 5)).await;
        redeem(&fx, promo.id, "o-1").await;
        redeem(&fx, promo.id, "o-2").await;

        let err = handler(&fx)
            .handle(UpdatePromotionCommand {
                promotion_id: promo.id,
                input: fixed_input("LIMITED", 1),
            })
            .await
            .unwrap_err();
        match err {
            PromotionError::ValidationFailed(errors) => assert_eq!(errors.fields(), vec!["usage_limit"]),
            other => panic!("Expected ValidationFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn unknown_promotion_is_not_found() {
        let fx = Fixture::new();
        let id = PromotionId::new();
        let err = handler(&fx)
            .handle(UpdatePromotionCommand {
                promotion_id: id,
                input: percentage_input("X"),
            })
            .await
            .unwrap_err();
        assert_eq!(err, PromotionError::not_found(id));
    }

    #[tokio::test]
    async fn limit_below_usage_committed_after_load_is_rejected() {
        let fx = Fixture::new();
        let promo = fx.seed(fixed_input("RACE", 5)).await;
        let repository = Arc::new(StaleReadRepository {
            store: fx.store.clone(),
            snapshot: promo.clone(),
        });
        for order in ["o-1", "o-2", "o-3"] {
            redeem(&fx, promo.id, order).await;
        }

        let handler = UpdatePromotionHandler::new(repository, fx.clock.clone(), fx.rules.clone());
        let err = handler
            .handle(UpdatePromotionCommand {
                promotion_id: promo.id,
                input: fixed_input("RACE", 2),
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PromotionError::ValidationFailed(ValidationError::below_minimum("usage_limit", 3, 2).into())
        );
        let stored = fx.store.find_by_id(&promo.id).await.unwrap().unwrap();
        assert_eq!((stored.used, stored.usage_limit), (3, 5));
    }

    #[tokio::test]
    async fn promotion_deleted_after_load_is_not_found() {
        let fx = Fixture::new();
        let promo = fx.seed(fixed_input("GONE", 5)).await;
        let repository = Arc::new(StaleReadRepository {
            store: fx.store.clone(),
            snapshot: promo.clone(),
        });
        fx.store.delete(&promo.id).await.unwrap();

        let handler = UpdatePromotionHandler::new(repository, fx.clock.clone(), fx.rules.clone());
        let err = handler
            .handle(UpdatePromotionCommand {
                promotion_id: promo.id,
                input: fixed_input("GONE", 5),
            })
            .await
            .unwrap_err();
        assert_eq!(err, PromotionError::not_found(promo.id));
    }
}
