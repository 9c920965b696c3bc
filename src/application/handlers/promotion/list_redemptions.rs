//! ListRedemptionsHandler - Query handler for a promotion's redemption ledger.

use std::sync::Arc;

use crate::domain::foundation::PromotionId;
use crate::domain::promotion::{LedgerEntry, PromotionError};
use crate::ports::{PromotionRepository, RedemptionLedger};

use super::load;

/// Query for the ledger of one promotion.
#[derive(Debug, Clone)]
pub struct ListRedemptionsQuery {
    pub promotion_id: PromotionId,
}

/// Handler for listing redemptions, oldest first.
pub struct ListRedemptionsHandler {
    repository: Arc<dyn PromotionRepository>,
    ledger: Arc<dyn RedemptionLedger>,
}

impl ListRedemptionsHandler {
    pub fn new(repository: Arc<dyn PromotionRepository>, ledger: Arc<dyn RedemptionLedger>) -> Self {
        Self { repository, ledger }
    }

    #[tracing::instrument(
        name = "promotions.list_redemptions",
        skip(self, query),
        fields(promotion_id = %query.promotion_id),
        err
    )]
    pub async fn handle(&self, query: ListRedemptionsQuery) -> Result<Vec<LedgerEntry>, PromotionError> {
        let promotion = load(self.repository.as_ref(), query.promotion_id).await?;
        Ok(self.ledger.list(&promotion.id).await?)
    }
}
