//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).
//! `PromotionService` bundles the handlers behind one entry point for callers
//! that do not want to wire each handler themselves.

pub mod handlers;
mod promotion_service;

pub use handlers::{
    ApplyPromotionCommand, ApplyPromotionHandler,
    CreatePromotionCommand, CreatePromotionHandler,
    DeletePromotionCommand, DeletePromotionHandler,
    DuplicatePromotionCommand, DuplicatePromotionHandler,
    GetPromotionHandler, GetPromotionQuery,
    ListPromotionsHandler, ListPromotionsQuery,
    ListRedemptionsHandler, ListRedemptionsQuery,
    QuotePromotionHandler, QuotePromotionQuery, QuotePromotionResult,
    ReactivatePromotionCommand, ReactivatePromotionHandler,
    TogglePromotionCommand, TogglePromotionHandler, TogglePromotionResult,
    UpdatePromotionCommand, UpdatePromotionHandler,
};
pub use promotion_service::PromotionService;
