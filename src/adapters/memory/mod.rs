//! In-memory adapters for tests and single-process deployments.

mod clock;
mod promotion_store;

pub use clock::FixedClock;
pub use promotion_store::InMemoryPromotionStore;
