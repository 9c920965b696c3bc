//! Shared fixtures for promotion handler tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::adapters::{FixedClock, InMemoryPromotionStore};
use crate::domain::foundation::{DomainError, Money, PromotionId, Timestamp};
use crate::domain::promotion::{
    validate_input, AdminState, DiscountKindTag, Promotion, PromotionInput, PromotionRules,
};
use crate::ports::{Clock, PromotionQuery, PromotionRepository};

pub(crate) struct Fixture {
    pub store: Arc<InMemoryPromotionStore>,
    pub clock: Arc<FixedClock>,
    pub rules: PromotionRules,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryPromotionStore::new()),
            clock: Arc::new(FixedClock::new(Timestamp::now())),
            rules: PromotionRules::default(),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Stores a promotion created at the fixture's current time.
    pub async fn seed(&self, input: PromotionInput) -> Promotion {
        let def = validate_input(&input, &self.rules).unwrap();
        let promotion = Promotion::create(PromotionId::new(), def, self.now());
        self.store.insert(&promotion).await.unwrap();
        promotion
    }
}

/// 10% off, capped at 20.00, 50.00 minimum spend, 100 uses.
pub(crate) fn percentage_input(code: &str) -> PromotionInput {
    PromotionInput {
        code: code.to_string(),
        name: format!("{} campaign", code),
        kind: DiscountKindTag::Percentage,
        value: 10,
        min_spend: Money::from_units(50),
        max_discount: Money::from_units(20),
        usage_limit: 100,
        admin_state: AdminState::Active,
        starts_at: None,
        ends_at: None,
    }
}

/// 5.00 off, 50.00 minimum spend, limited uses.
pub(crate) fn fixed_input(code: &str, usage_limit: i64) -> PromotionInput {
    PromotionInput {
        kind: DiscountKindTag::FixedAmount,
        value: 500,
        max_discount: Money::ZERO,
        usage_limit,
        ..percentage_input(code)
    }
}

/// Serves a fixed snapshot from `find_by_id` and writes through to the store.
///
/// Stands in for a read that happened before concurrent writes landed.
pub(crate) struct StaleReadRepository {
    pub store: Arc<InMemoryPromotionStore>,
    pub snapshot: Promotion,
}

#[async_trait]
impl PromotionRepository for StaleReadRepository {
    async fn find_by_id(&self, id: &PromotionId) -> Result<Option<Promotion>, DomainError> {
        Ok((self.snapshot.id == *id).then(|| self.snapshot.clone()))
    }
    async fn find_by_code(&self, code: &str) -> Result<Option<Promotion>, DomainError> {
        self.store.find_by_code(code).await
    }
    async fn list(&self, query: &PromotionQuery) -> Result<Vec<Promotion>, DomainError> {
        PromotionRepository::list(self.store.as_ref(), query).await
    }
    async fn insert(&self, promotion: &Promotion) -> Result<(), DomainError> {
        self.store.insert(promotion).await
    }
    async fn update(&self, promotion: &Promotion) -> Result<(), DomainError> {
        self.store.update(promotion).await
    }
    async fn delete(&self, id: &PromotionId) -> Result<bool, DomainError> {
        self.store.delete(id).await
    }
}
