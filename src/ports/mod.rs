//! Ports - Interfaces for external dependencies.
//!
//! Ports define the contracts between the domain and infrastructure.
//! Adapters implement these ports.
//!
//! # Storage
//!
//! - `PromotionRepository` - Promotion definitions (descriptive fields)
//! - `RedemptionLedger` - Usage counter and redemption history
//!
//! # Environment
//!
//! - `Clock` - Current time for status derivation

mod clock;
mod promotion_repository;
mod redemption_ledger;

pub use clock::{Clock, SystemClock};
pub use promotion_repository::{PromotionQuery, PromotionRepository};
pub use redemption_ledger::RedemptionLedger;
