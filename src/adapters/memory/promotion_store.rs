//! In-memory promotion store.
//!
//! Implements both `PromotionRepository` and `RedemptionLedger` over one
//! shared state. Useful for:
//! - Tests and local development
//! - Single-process deployments without persistence requirements
//!
//! Redeem takes the lock once for the limit check, the increment and the
//! ledger append, so that sequence is a single critical section. This is
//! only atomic within one process; multi-instance deployments need the
//! PostgreSQL adapters.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode, OrderId, PromotionId};
use crate::domain::promotion::{LedgerEntry, Promotion, RedemptionOutcome, RedemptionRequest};
use crate::ports::{PromotionQuery, PromotionRepository, RedemptionLedger};

#[derive(Default)]
struct StoreState {
    promotions: HashMap<PromotionId, Promotion>,
    /// Append-only, in commit order.
    ledger: Vec<LedgerEntry>,
}

impl StoreState {
    fn code_taken_by_other(&self, promotion: &Promotion) -> bool {
        self.promotions
            .values()
            .any(|p| p.id != promotion.id && p.code == promotion.code)
    }

    fn entry_for(&self, promotion_id: &PromotionId, order_id: &OrderId) -> Option<&LedgerEntry> {
        self.ledger
            .iter()
            .find(|e| &e.promotion_id == promotion_id && &e.order_id == order_id)
    }
}

/// In-memory implementation of the promotion storage ports.
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(InMemoryPromotionStore::new());
/// let service = PromotionService::new(store.clone(), store, Arc::new(SystemClock), rules);
/// ```
#[derive(Default)]
pub struct InMemoryPromotionStore {
    state: Mutex<StoreState>,
}

impl InMemoryPromotionStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored promotions.
    pub async fn len(&self) -> usize {
        self.state.lock().await.promotions.len()
    }

    /// Returns true if no promotions are stored.
    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.promotions.is_empty()
    }

    /// Total ledger entries across all promotions.
    pub async fn ledger_len(&self) -> usize {
        self.state.lock().await.ledger.len()
    }
}

fn code_taken(promotion: &Promotion) -> DomainError {
    DomainError::new(
        ErrorCode::PromotionCodeTaken,
        format!("Promotion code '{}' is already in use", promotion.code),
    )
    .with_detail("code", promotion.code.as_str())
}

#[async_trait]
impl PromotionRepository for InMemoryPromotionStore {
    async fn find_by_id(&self, id: &PromotionId) -> Result<Option<Promotion>, DomainError> {
        Ok(self.state.lock().await.promotions.get(id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Promotion>, DomainError> {
        let state = self.state.lock().await;
        Ok(state.promotions.values().find(|p| p.code.matches(code)).cloned())
    }

    async fn list(&self, query: &PromotionQuery) -> Result<Vec<Promotion>, DomainError> {
        let state = self.state.lock().await;
        let mut promotions: Vec<Promotion> = state
            .promotions
            .values()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
        promotions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(promotions)
    }

    async fn insert(&self, promotion: &Promotion) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        if state.code_taken_by_other(promotion) {
            return Err(code_taken(promotion));
        }
        if state.promotions.contains_key(&promotion.id) {
            return Err(DomainError::database(format!(
                "Promotion {} already exists",
                promotion.id
            )));
        }
        state.promotions.insert(promotion.id, promotion.clone());
        Ok(())
    }

    async fn update(&self, promotion: &Promotion) -> Result<(), DomainError> {
        let mut state = self.state.lock().await;
        if state.code_taken_by_other(promotion) {
            return Err(code_taken(promotion));
        }
        let stored = state
            .promotions
            .get_mut(&promotion.id)
            .ok_or_else(|| DomainError::promotion_not_found(promotion.id))?;
        // Usage belongs to the ledger; keep whatever it committed meanwhile.
        let used = stored.used;
        if promotion.usage_limit != 0 && used > promotion.usage_limit {
            return Err(DomainError::usage_limit_below_used(used, promotion.usage_limit));
        }
        *stored = promotion.clone();
        stored.used = used;
        Ok(())
    }

    async fn delete(&self, id: &PromotionId) -> Result<bool, DomainError> {
        let mut state = self.state.lock().await;
        let removed = state.promotions.remove(id).is_some();
        if removed {
            state.ledger.retain(|e| &e.promotion_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl RedemptionLedger for InMemoryPromotionStore {
    async fn redeem(&self, request: RedemptionRequest) -> Result<RedemptionOutcome, DomainError> {
        let mut state = self.state.lock().await;

        let used = match state.promotions.get(&request.promotion_id) {
            Some(p) => p.used,
            None => return Ok(RedemptionOutcome::NotFound),
        };

        if let Some(entry) = state.entry_for(&request.promotion_id, &request.order_id) {
            return Ok(RedemptionOutcome::AlreadyRedeemed {
                entry: entry.clone(),
                used,
            });
        }

        let promotion = match state.promotions.get_mut(&request.promotion_id) {
            Some(p) => p,
            None => return Ok(RedemptionOutcome::NotFound),
        };
        if !promotion.try_consume() {
            return Ok(RedemptionOutcome::LimitReached {
                limit: promotion.usage_limit,
            });
        }
        let used = promotion.used;

        let entry = LedgerEntry::from(request);
        state.ledger.push(entry.clone());
        Ok(RedemptionOutcome::Redeemed { entry, used })
    }

    async fn find(
        &self,
        promotion_id: &PromotionId,
        order_id: &OrderId,
    ) -> Result<Option<LedgerEntry>, DomainError> {
        Ok(self.state.lock().await.entry_for(promotion_id, order_id).cloned())
    }

    async fn list(&self, promotion_id: &PromotionId) -> Result<Vec<LedgerEntry>, DomainError> {
        let state = self.state.lock().await;
        Ok(state
            .ledger
            .iter()
            .filter(|e| &e.promotion_id == promotion_id)
            .cloned()
            .collect())
    }
}
