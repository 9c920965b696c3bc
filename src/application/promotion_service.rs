//! Promotion service facade.

use std::sync::Arc;

use crate::domain::foundation::{Money, PromotionId, Timestamp};
use crate::domain::promotion::{
    AppliedPromotion, LedgerEntry, PromotionError, PromotionInput, PromotionRules, PromotionView,
};
use crate::ports::{Clock, PromotionRepository, RedemptionLedger};

use super::handlers::{
    ApplyPromotionCommand, ApplyPromotionHandler, CreatePromotionCommand, CreatePromotionHandler,
    DeletePromotionCommand, DeletePromotionHandler, DuplicatePromotionCommand,
    DuplicatePromotionHandler, GetPromotionHandler, GetPromotionQuery, ListPromotionsHandler,
    ListPromotionsQuery, ListRedemptionsHandler, ListRedemptionsQuery, QuotePromotionHandler,
    QuotePromotionQuery, QuotePromotionResult, ReactivatePromotionCommand,
    ReactivatePromotionHandler, TogglePromotionCommand, TogglePromotionHandler,
    TogglePromotionResult, UpdatePromotionCommand, UpdatePromotionHandler,
};

/// One entry point over every promotion operation.
///
/// Cheap to clone; all handlers share the same ports.
#[derive(Clone)]
pub struct PromotionService {
    repository: Arc<dyn PromotionRepository>,
    ledger: Arc<dyn RedemptionLedger>,
    clock: Arc<dyn Clock>,
    rules: PromotionRules,
}

impl PromotionService {
    pub fn new(
        repository: Arc<dyn PromotionRepository>,
        ledger: Arc<dyn RedemptionLedger>,
        clock: Arc<dyn Clock>,
        rules: PromotionRules,
    ) -> Self {
        Self {
            repository,
            ledger,
            clock,
            rules,
        }
    }

    pub fn rules(&self) -> &PromotionRules {
        &self.rules
    }

    pub async fn create_promotion(&self, input: PromotionInput) -> Result<PromotionView, PromotionError> {
        CreatePromotionHandler::new(self.repository.clone(), self.clock.clone(), self.rules.clone())
            .handle(CreatePromotionCommand { input })
            .await
    }

    pub async fn update_promotion(
        &self,
        promotion_id: PromotionId,
        input: PromotionInput,
    ) -> Result<PromotionView, PromotionError> {
        UpdatePromotionHandler::new(self.repository.clone(), self.clock.clone(), self.rules.clone())
            .handle(UpdatePromotionCommand { promotion_id, input })
            .await
    }

    pub async fn get_promotion(&self, promotion_id: PromotionId) -> Result<PromotionView, PromotionError> {
        GetPromotionHandler::new(self.repository.clone(), self.clock.clone())
            .handle(GetPromotionQuery { promotion_id })
            .await
    }

    pub async fn list_promotions(&self, query: ListPromotionsQuery) -> Result<Vec<PromotionView>, PromotionError> {
        ListPromotionsHandler::new(self.repository.clone(), self.clock.clone())
            .handle(query)
            .await
    }

    pub async fn duplicate_promotion(
        &self,
        source_id: PromotionId,
        new_code: impl Into<String>,
    ) -> Result<PromotionView, PromotionError> {
        DuplicatePromotionHandler::new(self.repository.clone(), self.clock.clone(), self.rules.clone())
            .handle(DuplicatePromotionCommand {
                source_id,
                new_code: new_code.into(),
            })
            .await
    }

    /// Pause, resume or force-activate. `force_activate` defaults to allowed.
    pub async fn toggle_promotion(
        &self,
        promotion_id: PromotionId,
        force_activate: Option<bool>,
    ) -> Result<TogglePromotionResult, PromotionError> {
        TogglePromotionHandler::new(self.repository.clone(), self.clock.clone())
            .handle(TogglePromotionCommand {
                promotion_id,
                force_activate: force_activate.unwrap_or(true),
            })
            .await
    }

    pub async fn reactivate_promotion(
        &self,
        promotion_id: PromotionId,
        starts_at: Option<Timestamp>,
        ends_at: Option<Timestamp>,
    ) -> Result<PromotionView, PromotionError> {
        ReactivatePromotionHandler::new(self.repository.clone(), self.clock.clone(), self.rules.clone())
            .handle(ReactivatePromotionCommand {
                promotion_id,
                starts_at,
                ends_at,
            })
            .await
    }

    pub async fn delete_promotion(&self, promotion_id: PromotionId) -> Result<(), PromotionError> {
        DeletePromotionHandler::new(self.repository.clone())
            .handle(DeletePromotionCommand { promotion_id })
            .await
    }

    pub async fn quote_promotion(
        &self,
        code: impl Into<String>,
        order_total: Money,
    ) -> Result<QuotePromotionResult, PromotionError> {
        QuotePromotionHandler::new(self.repository.clone(), self.clock.clone())
            .handle(QuotePromotionQuery {
                code: code.into(),
                order_total,
            })
            .await
    }

    pub async fn apply_promotion(
        &self,
        code: impl Into<String>,
        order_total: Money,
        order_id: impl Into<String>,
    ) -> Result<AppliedPromotion, PromotionError> {
        ApplyPromotionHandler::new(self.repository.clone(), self.ledger.clone(), self.clock.clone())
            .handle(ApplyPromotionCommand {
                code: code.into(),
                order_total,
                order_id: order_id.into(),
            })
            .await
    }

    pub async fn list_redemptions(&self, promotion_id: PromotionId) -> Result<Vec<LedgerEntry>, PromotionError> {
        ListRedemptionsHandler::new(self.repository.clone(), self.ledger.clone())
            .handle(ListRedemptionsQuery { promotion_id })
            .await
    }
}
