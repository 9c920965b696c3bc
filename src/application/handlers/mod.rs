//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod promotion;

pub use promotion::{
    // Commands
    ApplyPromotionCommand, ApplyPromotionHandler,
    CreatePromotionCommand, CreatePromotionHandler,
    DeletePromotionCommand, DeletePromotionHandler,
    DuplicatePromotionCommand, DuplicatePromotionHandler,
    ReactivatePromotionCommand, ReactivatePromotionHandler,
    TogglePromotionCommand, TogglePromotionHandler, TogglePromotionResult,
    UpdatePromotionCommand, UpdatePromotionHandler,
    // Queries
    GetPromotionHandler, GetPromotionQuery,
    ListPromotionsHandler, ListPromotionsQuery,
    ListRedemptionsHandler, ListRedemptionsQuery,
    QuotePromotionHandler, QuotePromotionQuery, QuotePromotionResult,
};
