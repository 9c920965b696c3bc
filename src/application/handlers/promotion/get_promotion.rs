//! GetPromotionHandler - Query handler for one promotion with its derived status.

use std::sync::Arc;

use crate::domain::foundation::PromotionId;
use crate::domain::promotion::{PromotionError, PromotionView};
use crate::ports::{Clock, PromotionRepository};

use super::load;

/// Query for a single promotion.
#[derive(Debug, Clone)]
pub struct GetPromotionQuery {
    pub promotion_id: PromotionId,
}

/// Handler for retrieving promotions.
pub struct GetPromotionHandler {
    repository: Arc<dyn PromotionRepository>,
    clock: Arc<dyn Clock>,
}

impl GetPromotionHandler {
    pub fn new(repository: Arc<dyn PromotionRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    #[tracing::instrument(
        name = "promotions.get",
        skip(self, query),
        fields(promotion_id = %query.promotion_id),
        err
    )]
    pub async fn handle(&self, query: GetPromotionQuery) -> Result<PromotionView, PromotionError> {
        let promotion = load(self.repository.as_ref(), query.promotion_id).await?;
        Ok(promotion.view_at(self.clock.now()))
    }
}
