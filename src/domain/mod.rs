//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `promotion` - Promotion lifecycle, pricing and redemption

pub mod foundation;
pub mod promotion;
