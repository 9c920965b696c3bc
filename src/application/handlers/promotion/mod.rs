//! Promotion handlers.
//!
//! Command and query handlers for the promotion lifecycle:
//!
//! ## Commands
//! - Create, update, duplicate and delete promotions
//! - Toggle (pause / resume / force-activate) and reactivate
//! - Apply a code to an order (redeem)
//!
//! ## Queries
//! - Get one promotion with its derived status
//! - List promotions with archive/status/kind/text filters
//! - Quote a discount without redeeming
//! - List the redemption ledger of a promotion

mod apply_promotion;
mod create_promotion;
mod delete_promotion;
mod duplicate_promotion;
mod get_promotion;
mod list_promotions;
mod list_redemptions;
mod quote_promotion;
mod reactivate_promotion;
mod toggle_promotion;
mod update_promotion;

#[cfg(test)]
pub(crate) mod test_support;

// Commands
pub use apply_promotion::{ApplyPromotionCommand, ApplyPromotionHandler};
pub use create_promotion::{CreatePromotionCommand, CreatePromotionHandler};
pub use delete_promotion::{DeletePromotionCommand, DeletePromotionHandler};
pub use duplicate_promotion::{DuplicatePromotionCommand, DuplicatePromotionHandler};
pub use reactivate_promotion::{ReactivatePromotionCommand, ReactivatePromotionHandler};
pub use toggle_promotion::{TogglePromotionCommand, TogglePromotionHandler, TogglePromotionResult};
pub use update_promotion::{UpdatePromotionCommand, UpdatePromotionHandler};

// Queries
pub use get_promotion::{GetPromotionHandler, GetPromotionQuery};
pub use list_promotions::{ListPromotionsHandler, ListPromotionsQuery};
pub use list_redemptions::{ListRedemptionsHandler, ListRedemptionsQuery};
pub use quote_promotion::{QuotePromotionHandler, QuotePromotionQuery, QuotePromotionResult};

use crate::domain::foundation::PromotionId;
use crate::domain::promotion::{Promotion, PromotionError};
use crate::ports::PromotionRepository;

/// Loads a promotion or fails with `NotFound`.
async fn load(repository: &dyn PromotionRepository, id: PromotionId) -> Result<Promotion, PromotionError> {
    repository
        .find_by_id(&id)
        .await?
        .ok_or_else(|| PromotionError::not_found(id))
}

/// Loads a promotion by customer-entered code or fails with `NotFound`.
async fn load_by_code(repository: &dyn PromotionRepository, code: &str) -> Result<Promotion, PromotionError> {
    repository
        .find_by_code(code)
        .await?
        .ok_or_else(|| PromotionError::code_not_found(code.trim().to_uppercase()))
}
