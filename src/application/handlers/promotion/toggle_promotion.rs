//! TogglePromotionHandler - Command handler for pausing and resuming promotions.
//!
//! | Observed status | Result |
//! |-----------------|--------|
//! | Active | paused |
//! | Paused | resumed (may read back Scheduled or Expired per its window) |
//! | Scheduled | force-activated: start moved to now (needs `force_activate`) |
//! | Expired | rejected, use reactivate |

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::PromotionId;
use crate::domain::promotion::{LifecycleAction, PromotionError, PromotionStatus, PromotionView};
use crate::ports::{Clock, PromotionRepository};

use super::load;

/// Command to toggle a promotion.
#[derive(Debug, Clone)]
pub struct TogglePromotionCommand {
    pub promotion_id: PromotionId,
    /// Allow a scheduled promotion to start immediately.
    pub force_activate: bool,
}

impl TogglePromotionCommand {
    /// Toggle with force-activation allowed.
    pub fn new(promotion_id: PromotionId) -> Self {
        Self {
            promotion_id,
            force_activate: true,
        }
    }
}

/// Result of a toggle.
#[derive(Debug, Clone)]
pub struct TogglePromotionResult {
    pub promotion: PromotionView,
    pub previous_status: PromotionStatus,
    pub action: LifecycleAction,
}

/// Handler for toggling promotions.
pub struct TogglePromotionHandler {
    repository: Arc<dyn PromotionRepository>,
    clock: Arc<dyn Clock>,
}

impl TogglePromotionHandler {
    pub fn new(repository: Arc<dyn PromotionRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    #[tracing::instrument(
        name = "promotions.toggle",
        skip(self, cmd),
        fields(promotion_id = %cmd.promotion_id, force_activate = cmd.force_activate),
        err
    )]
    pub async fn handle(&self, cmd: TogglePromotionCommand) -> Result<TogglePromotionResult, PromotionError> {
        let mut promotion = load(self.repository.as_ref(), cmd.promotion_id).await?;

        let now = self.clock.now();
        let previous_status = promotion.status_at(now);
        let action = promotion.toggle(now, cmd.force_activate)?;
        self.repository.update(&promotion).await?;

        let view = promotion.view_at(now);
        info!(
            promotion_id = %view.promotion.id,
            %action,
            from = %previous_status,
            to = %view.status,
            "promotion toggled"
        );

        Ok(TogglePromotionResult {
            promotion: view,
            previous_status,
            action,
        })
    }
}
