//! DeletePromotionHandler - Command handler for removing a promotion.
//!
//! Deletion is unconditional and irrevocable; the redemption ledger of
//! the promotion goes with it.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::PromotionId;
use crate::domain::promotion::PromotionError;
use crate::ports::PromotionRepository;

/// Command to delete a promotion.
#[derive(Debug, Clone)]
pub struct DeletePromotionCommand {
    pub promotion_id: PromotionId,
}

/// Handler for deleting promotions.
pub struct DeletePromotionHandler {
    repository: Arc<dyn PromotionRepository>,
}

impl DeletePromotionHandler {
    pub fn new(repository: Arc<dyn PromotionRepository>) -> Self {
        Self { repository }
    }

    #[tracing::instrument(
        name = "promotions.delete",
        skip(self, cmd),
        fields(promotion_id = %cmd.promotion_id),
        err
    )]
    pub async fn handle(&self, cmd: DeletePromotionCommand) -> Result<(), PromotionError> {
        if !self.repository.delete(&cmd.promotion_id).await? {
            return Err(PromotionError::not_found(cmd.promotion_id));
        }
        info!(promotion_id = %cmd.promotion_id, "promotion deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::promotion::test_support::{percentage_input, Fixture};

    #[tokio::test]
    async fn deletes_existing_promotion() {
        let fx = Fixture::new();
        let promo = fx.seed(percentage_input("GONE")).await;
        let handler = DeletePromotionHandler::new(fx.store.clone());

        handler
            .handle(DeletePromotionCommand {
                promotion_id: promo.id,
            })
            .await
            .unwrap();

        assert!(fx.store.find_by_id(&promo.id).await.unwrap().is_none());
        assert!(fx.store.find_by_code("GONE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let fx = Fixture::new();
        let promo = fx.seed(percentage_input("GONE")).await;
        let handler = DeletePromotionHandler::new(fx.store.clone());
        let cmd = DeletePromotionCommand {
            promotion_id: promo.id,
        };

        handler.handle(cmd.clone()).await.unwrap();
        assert_eq!(
            handler.handle(cmd).await.unwrap_err(),
            PromotionError::not_found(promo.id)
        );
    }
}
