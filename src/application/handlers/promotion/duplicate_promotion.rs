//! DuplicatePromotionHandler - Command handler for cloning a promotion under a new code.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::PromotionId;
use crate::domain::promotion::{
    PromotionCode, PromotionError, PromotionRules, PromotionView, ValidationErrors,
};
use crate::ports::{Clock, PromotionRepository};

use super::load;

/// Command to duplicate a promotion.
#[derive(Debug, Clone)]
pub struct DuplicatePromotionCommand {
    pub source_id: PromotionId,
    pub new_code: String,
}

/// Handler for duplicating promotions.
///
/// The copy keeps every descriptive field, starts with zero usage and gets
/// fresh timestamps.
pub struct DuplicatePromotionHandler {
    repository: Arc<dyn PromotionRepository>,
    clock: Arc<dyn Clock>,
    rules: PromotionRules,
}

impl DuplicatePromotionHandler {
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
        name = "promotions.duplicate",
        skip(self, cmd),
        fields(source_id = %cmd.source_id, new_code = %cmd.new_code),
        err
    )]
    pub async fn handle(&self, cmd: DuplicatePromotionCommand) -> Result<PromotionView, PromotionError> {
        let source = load(self.repository.as_ref(), cmd.source_id).await?;
        let code = PromotionCode::try_new(&cmd.new_code).map_err(ValidationErrors::from)?;

        if self.repository.find_by_code(code.as_str()).await?.is_some() {
            return Err(PromotionError::code_conflict(code.as_str()));
        }

        let now = self.clock.now();
        let copy = source.duplicate_as(PromotionId::new(), code, now);
        copy.validate(&self.rules)?;
        self.repository.insert(&copy).await?;

        info!(
            promotion_id = %copy.id,
            source_id = %source.id,
            code = %copy.code,
            "promotion duplicated"
        );

        Ok(copy.view_at(now))
    }
}
