//! Promotion repository port.
//!
//! Defines the contract for persisting and retrieving Promotion aggregates.
//! Implementations handle the actual storage operations.
//!
//! # Design
//!
//! - **Case-insensitive codes**: lookups and the uniqueness constraint
//!   compare upper-cased codes
//! - **Usage is not written here**: `update` persists descriptive fields
//!   only; `used` changes exclusively through [`RedemptionLedger::redeem`]
//!
//! [`RedemptionLedger::redeem`]: super::RedemptionLedger::redeem

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PromotionId};
use crate::domain::promotion::{DiscountKindTag, Promotion};

/// Storage-side filter for listing promotions.
///
/// Status is derived from the clock, so it is filtered by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromotionQuery {
    /// Restrict to one discount kind.
    pub kind: Option<DiscountKindTag>,
    /// Case-insensitive substring of code or name.
    pub search: Option<String>,
}

impl PromotionQuery {
    /// Returns true if the promotion passes this filter.
    pub fn matches(&self, promotion: &Promotion) -> bool {
        if let Some(kind) = self.kind {
            if promotion.discount.tag() != kind {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                promotion.code.as_str().to_lowercase().contains(&term)
                    || promotion.name.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }
}

/// Repository port for Promotion persistence.
#[async_trait]
pub trait PromotionRepository: Send + Sync {
    /// Find a promotion by its ID.
    async fn find_by_id(&self, id: &PromotionId) -> Result<Option<Promotion>, DomainError>;

    /// Find a promotion by code, ignoring case and surrounding whitespace.
    async fn find_by_code(&self, code: &str) -> Result<Option<Promotion>, DomainError>;

    /// List promotions matching the filter, newest `created_at` first.
    async fn list(&self, query: &PromotionQuery) -> Result<Vec<Promotion>, DomainError>;

    /// Insert a new promotion.
    ///
    /// # Errors
    ///
    /// - `PromotionCodeTaken` (detail `code`) if the code is in use
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, promotion: &Promotion) -> Result<(), DomainError>;

    /// Persist descriptive fields of an existing promotion.
    ///
    /// # Errors
    ///
    /// - `PromotionNotFound` if the promotion doesn't exist
    /// - `PromotionCodeTaken` if the new code belongs to another promotion
    /// - `DatabaseError` on persistence failure
    async fn update(&self, promotion: &Promotion) -> Result<(), DomainError>;

    /// Remove a promotion and its ledger. Returns false if it didn't exist.
    async fn delete(&self, id: &PromotionId) -> Result<bool, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Money, Timestamp};
    use crate::domain::promotion::{validate_input, AdminState, PromotionInput, PromotionRules};

    fn promotion(code: &str, name: &str, kind: DiscountKindTag) -> Promotion {
        let input = PromotionInput {
            code: code.to_string(),
            name: name.to_string(),
            kind,
            value: if kind == DiscountKindTag::FreeShipping { 0 } else { 10 },
            min_spend: Money::from_units(50),
            max_discount: Money::ZERO,
            usage_limit: 0,
            admin_state: AdminState::Active,
            starts_at: None,
            ends_at: None,
        };
        let def = validate_input(&input, &PromotionRules::default()).unwrap();
        Promotion::create(PromotionId::new(), def, Timestamp::now())
    }

    #[test]
    fn empty_query_matches_everything() {
        let promo = promotion("SUMMER", "Summer", DiscountKindTag::Percentage);
        assert!(PromotionQuery::default().matches(&promo));
    }

    #[test]
    fn search_is_case_insensitive_on_code_and_name() {
        let promo = promotion("SUMMER24", "Beach party", DiscountKindTag::Percentage);
        let by_code = PromotionQuery {
            search: Some("mer2".to_string()),
            ..Default::default()
        };
        let by_name = PromotionQuery {
            search: Some("BEACH".to_string()),
            ..Default::default()
        };
        let miss = PromotionQuery {
            search: Some("winter".to_string()),
            ..Default::default()
        };
        assert!(by_code.matches(&promo));
        assert!(by_name.matches(&promo));
        assert!(!miss.matches(&promo));
    }

    #[test]
    fn kind_filter_excludes_other_kinds() {
        let promo = promotion("SHIP", "Ship", DiscountKindTag::FreeShipping);
        let query = PromotionQuery {
            kind: Some(DiscountKindTag::Percentage),
            ..Default::default()
        };
        assert!(!query.matches(&promo));
    }
}
