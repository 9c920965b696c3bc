//! ReactivatePromotionHandler - Command handler for giving an expired promotion a new window.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{PromotionId, Timestamp};
use crate::domain::promotion::{
    validate_window, LifecycleAction, PromotionError, PromotionRules, PromotionStatus, PromotionView,
};
use crate::ports::{Clock, PromotionRepository};

use super::load;

/// Command to reactivate an expired promotion.
#[derive(Debug, Clone)]
pub struct ReactivatePromotionCommand {
    pub promotion_id: PromotionId,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
}

/// Handler for reactivating promotions.
///
/// Only an expired promotion can be reactivated. The new window needs both
/// bounds, must be ordered and must not already be over; usage is kept.
pub struct ReactivatePromotionHandler {
    repository: Arc<dyn PromotionRepository>,
    clock: Arc<dyn Clock>,
    rules: PromotionRules,
}

impl ReactivatePromotionHandler {
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
        name = "promotions.reactivate",
        skip(self, cmd),
        fields(promotion_id = %cmd.promotion_id),
        err
    )]
    pub async fn handle(&self, cmd: ReactivatePromotionCommand) -> Result<PromotionView, PromotionError> {
        let mut promotion = load(self.repository.as_ref(), cmd.promotion_id).await?;

        let now = self.clock.now();
        let current = promotion.status_at(now);
        if current != PromotionStatus::Expired {
            return Err(PromotionError::invalid_state(current, LifecycleAction::Reactivate));
        }

        let window = validate_window(cmd.starts_at, cmd.ends_at)?;
        promotion.reactivate(window, now)?;
        // Rules may have tightened since the promotion was defined.
        promotion.validate(&self.rules)?;

        self.repository.update(&promotion).await?;

        let view = promotion.view_at(now);
        info!(promotion_id = %view.promotion.id, status = %view.status, "promotion reactivated");
        Ok(view)
    }
}
