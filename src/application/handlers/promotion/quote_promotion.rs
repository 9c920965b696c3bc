//! QuotePromotionHandler - Query handler for pricing a code without redeeming it.
//!
//! This is the optimistic half of apply: it shows the customer what the
//! code would take off. The ledger re-checks the limit at commit time.

use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::domain::foundation::{Money, PromotionId};
use crate::domain::promotion::{calculate, DiscountQuote, PromotionError, ValidationErrors};
use crate::ports::{Clock, PromotionRepository};

use super::load_by_code;

/// Query for a discount quote.
#[derive(Debug, Clone)]
pub struct QuotePromotionQuery {
    pub code: String,
    pub order_total: Money,
}

/// An eligible quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuotePromotionResult {
    pub promotion_id: PromotionId,
    pub code: String,
    pub quote: DiscountQuote,
}

/// Handler for quoting promotions.
pub struct QuotePromotionHandler {
    repository: Arc<dyn PromotionRepository>,
    clock: Arc<dyn Clock>,
}

impl QuotePromotionHandler {
    pub fn new(repository: Arc<dyn PromotionRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    #[tracing::instrument(
        name = "promotions.quote",
        skip(self, query),
        fields(code = %query.code, order_total = %query.order_total),
        err
    )]
    pub async fn handle(&self, query: QuotePromotionQuery) -> Result<QuotePromotionResult, PromotionError> {
        let order_total =
            Money::try_non_negative("order_total", query.order_total.cents()).map_err(ValidationErrors::from)?;
        let promotion = load_by_code(self.repository.as_ref(), &query.code).await?;

        let quote = calculate(&promotion, order_total, self.clock.now());
        if let Some(reason) = quote.reason {
            debug!(promotion_id = %promotion.id, ?reason, "promotion not applicable");
            return Err(PromotionError::Ineligible(reason));
        }

        Ok(QuotePromotionResult {
            promotion_id: promotion.id,
            code: promotion.code.to_string(),
            quote,
        })
    }
}
