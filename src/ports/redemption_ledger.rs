//! Redemption ledger port.
//!
//! The ledger owns the shared `used` counter. `redeem` must be one
//! indivisible conditional increment at the storage layer: concurrent
//! callers may run in separate processes, so in-process locks in the
//! caller are not enough.
//!
//! # Idempotency
//!
//! Entries are keyed by `(promotion_id, order_id)`. A second `redeem` for
//! the same order returns `AlreadyRedeemed` with the original entry and
//! leaves the counter alone, so a checkout that timed out can be retried.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, OrderId, PromotionId};
use crate::domain::promotion::{LedgerEntry, RedemptionOutcome, RedemptionRequest};

/// Port for committing redemptions against the usage counter.
#[async_trait]
pub trait RedemptionLedger: Send + Sync {
    /// Atomically increments usage (only while under the limit) and
    /// appends a ledger entry.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure. The outcome is then
    ///   unknown; retry with the same order id.
    async fn redeem(&self, request: RedemptionRequest) -> Result<RedemptionOutcome, DomainError>;

    /// Find the entry recorded for an order, if any.
    async fn find(
        &self,
        promotion_id: &PromotionId,
        order_id: &OrderId,
    ) -> Result<Option<LedgerEntry>, DomainError>;

    /// All entries for a promotion, oldest first.
    async fn list(&self, promotion_id: &PromotionId) -> Result<Vec<LedgerEntry>, DomainError>;
}
