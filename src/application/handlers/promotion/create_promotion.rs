//! CreatePromotionHandler - Command handler for defining a new promotion.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::PromotionId;
use crate::domain::promotion::{
    validate_input, Promotion, PromotionError, PromotionInput, PromotionRules, PromotionView,
};
use crate::ports::{Clock, PromotionRepository};

/// Command to create a promotion from raw administrator input.
#[derive(Debug, Clone)]
pub struct CreatePromotionCommand {
    pub input: PromotionInput,
}

/// Handler for creating promotions.
pub struct CreatePromotionHandler {
    repository: Arc<dyn PromotionRepository>,
    clock: Arc<dyn Clock>,
    rules: PromotionRules,
}

impl CreatePromotionHandler {
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
        name = "promotions.create",
        skip(self, cmd),
        fields(code = %cmd.input.code, kind = %cmd.input.kind),
        err
    )]
    pub async fn handle(&self, cmd: CreatePromotionCommand) -> Result<PromotionView, PromotionError> {
        // 1. Validate every field
        let def = validate_input(&cmd.input, &self.rules)?;

        // 2. Reject a taken code early; insert re-checks under the storage constraint
        if self.repository.find_by_code(def.code.as_str()).await?.is_some() {
            return Err(PromotionError::code_conflict(def.code.as_str()));
        }

        // 3. Persist
        let now = self.clock.now();
        let promotion = Promotion::create(PromotionId::new(), def, now);
        self.repository.insert(&promotion).await?;

        info!(promotion_id = %promotion.id, code = %promotion.code, "promotion created");

        Ok(promotion.view_at(now))
    }
}
