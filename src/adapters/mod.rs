//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - In-process store and test clock
//! - `postgres` - PostgreSQL-backed storage

pub mod memory;
pub mod postgres;

pub use memory::{FixedClock, InMemoryPromotionStore};
pub use postgres::{PostgresPromotionRepository, PostgresRedemptionLedger};
