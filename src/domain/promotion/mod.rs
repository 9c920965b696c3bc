//! Promotion domain module.
//!
//! Promotion definitions, derived status, discount pricing and the
//! redemption ledger vocabulary.
//!
//! # Module Structure
//!
//! - `aggregate` - Promotion aggregate entity
//! - `code` - PromotionCode value object
//! - `discount` - Discount calculation and ineligibility reasons
//! - `discount_kind` - Closed set of discount kinds
//! - `errors` - PromotionError
//! - `redemption` - Ledger entries and redeem outcomes
//! - `rules` - Configurable numeric bounds
//! - `status` - Status derivation and lifecycle state machine
//! - `validation` - Field-tagged validation of definitions
//! - `window` - Validity window

mod aggregate;
mod code;
mod discount;
mod discount_kind;
mod errors;
mod redemption;
mod rules;
mod status;
mod validation;
mod window;

pub use aggregate::{Promotion, PromotionView};
pub use code::PromotionCode;
pub use discount::{calculate, DiscountQuote, IneligibleReason};
pub use discount_kind::{DiscountKind, DiscountKindTag};
pub use errors::{PromotionError, PromotionLookup};
pub use redemption::{AppliedPromotion, LedgerEntry, RedemptionOutcome, RedemptionRequest};
pub use rules::PromotionRules;
pub use status::{AdminState, LifecycleAction, PromotionStatus};
pub use validation::{
    validate_input, validate_window, PromotionInput, ValidatedPromotion, ValidationErrors,
};
pub use window::ValidityWindow;
