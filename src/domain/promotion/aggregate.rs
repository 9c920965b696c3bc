//! Promotion aggregate entity.
//!
//! # Design Decisions
//!
//! - **Status is derived**: only the admin intent and window are stored;
//!   `status_at(now)` recomputes the observed status on every read
//! - **Money in cents**: all monetary values are `Money` (i64 cents)
//! - **Usage only grows**: `used` is changed by redemption alone, never by
//!   edits, duplication or reactivation

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Money, PromotionId, StateMachine, Timestamp, ValidationError};

use super::{
    validate_input, AdminState, DiscountKind, LifecycleAction, PromotionCode, PromotionError,
    PromotionInput, PromotionRules, PromotionStatus, ValidatedPromotion, ValidationErrors,
    ValidityWindow,
};

/// Promotion aggregate - a discount code and its usage state.
///
/// # Invariants
///
/// - `code` is normalized and unique across stored promotions
/// - `used <= usage_limit` whenever `usage_limit > 0`
/// - `window.ends_at > window.starts_at` when both are set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    /// Unique identifier for this promotion.
    pub id: PromotionId,

    /// Customer-facing code, stored upper-cased.
    pub code: PromotionCode,

    /// Internal label.
    pub name: String,

    /// What the promotion takes off an order.
    pub discount: DiscountKind,

    /// Smallest order total that qualifies.
    pub min_spend: Money,

    /// Maximum successful redemptions; zero means unlimited.
    pub usage_limit: u32,

    /// Successful redemptions so far.
    pub used: u32,

    /// Administrator's explicit intent.
    pub admin_state: AdminState,

    /// Optional validity window.
    pub window: ValidityWindow,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Promotion {
    /// Creates a promotion from a validated definition with no usage.
    pub fn create(id: PromotionId, def: ValidatedPromotion, now: Timestamp) -> Self {
        Self {
            id,
            code: def.code,
            name: def.name,
            discount: def.discount,
            min_spend: def.min_spend,
            usage_limit: def.usage_limit,
            used: 0,
            admin_state: def.admin_state,
            window: def.window,
            created_at: now,
            updated_at: now,
        }
    }

    /// Observed status at `now`.
    pub fn status_at(&self, now: Timestamp) -> PromotionStatus {
        PromotionStatus::derive(self.admin_state, &self.window, now)
    }

    pub fn is_unlimited(&self) -> bool {
        self.usage_limit == 0
    }

    /// True when a finite limit has been used up.
    pub fn limit_reached(&self) -> bool {
        !self.is_unlimited() && self.used >= self.usage_limit
    }

    /// Remaining redemptions, or `None` when unlimited.
    pub fn remaining_uses(&self) -> Option<u32> {
        if self.is_unlimited() {
            None
        } else {
            Some(self.usage_limit.saturating_sub(self.used))
        }
    }

    /// Takes one unit of usage if the limit allows it.
    ///
    /// Storage adapters call this inside their critical section; it is the
    /// single place the limit guard lives for in-process stores.
    pub fn try_consume(&mut self) -> bool {
        if self.limit_reached() {
            return false;
        }
        self.used = self.used.saturating_add(1);
        true
    }

    /// Flattens the definition back into raw input form.
    pub fn to_input(&self) -> PromotionInput {
        PromotionInput {
            code: self.code.as_str().to_string(),
            name: self.name.clone(),
            kind: self.discount.tag(),
            value: self.discount.value(),
            min_spend: self.min_spend,
            max_discount: self.discount.max_discount(),
            usage_limit: i64::from(self.usage_limit),
            admin_state: self.admin_state,
            starts_at: self.window.starts_at(),
            ends_at: self.window.ends_at(),
        }
    }

    /// Checks the whole record against the rules, usage included.
    pub fn validate(&self, rules: &PromotionRules) -> Result<(), ValidationErrors> {
        let mut errors = match validate_input(&self.to_input(), rules) {
            Ok(_) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        if let Some(err) = usage_below_limit(self.used, self.usage_limit) {
            errors.push(err);
        }
        errors.into_result()
    }

    /// Replaces every descriptive field; `used` is untouched.
    ///
    /// # Errors
    ///
    /// Rejects a finite limit below the current usage.
    pub fn apply_edit(&mut self, def: ValidatedPromotion, now: Timestamp) -> Result<(), ValidationErrors> {
        if let Some(err) = usage_below_limit(self.used, def.usage_limit) {
            return Err(err.into());
        }
        self.code = def.code;
        self.name = def.name;
        self.discount = def.discount;
        self.min_spend = def.min_spend;
        self.usage_limit = def.usage_limit;
        self.admin_state = def.admin_state;
        self.window = def.window;
        self.updated_at = now;
        Ok(())
    }

    /// Clones the definition under a new id and code with usage reset.
    pub fn duplicate_as(&self, id: PromotionId, code: PromotionCode, now: Timestamp) -> Self {
        Self {
            id,
            code,
            used: 0,
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }

    /// Flips between active and paused, or force-activates a scheduled
    /// promotion by pulling its start to `now`.
    ///
    /// Returns the action that was applied.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if expired, or scheduled with `force_activate` off
    pub fn toggle(&mut self, now: Timestamp, force_activate: bool) -> Result<LifecycleAction, PromotionError> {
        let current = self.status_at(now);
        let action = match current {
            PromotionStatus::Active => LifecycleAction::Pause,
            PromotionStatus::Paused | PromotionStatus::Expired => LifecycleAction::Resume,
            PromotionStatus::Scheduled => LifecycleAction::ForceActivate,
        };

        if action == LifecycleAction::ForceActivate && !force_activate {
            return Err(PromotionError::invalid_state(current, action));
        }
        current
            .transition(action)
            .map_err(|_| PromotionError::invalid_state(current, action))?;

        match action {
            LifecycleAction::Pause => self.admin_state = AdminState::Paused,
            LifecycleAction::Resume => self.admin_state = AdminState::Active,
            LifecycleAction::ForceActivate => {
                self.admin_state = AdminState::Active;
                self.window = self.window.starting_at(now);
            }
            LifecycleAction::Reactivate => {}
        }
        self.updated_at = now;
        Ok(action)
    }

    /// Gives an expired promotion a fresh window and re-enables it.
    ///
    /// Usage history is kept.
    ///
    /// # Errors
    ///
    /// - `InvalidState` if not currently expired
    /// - `ValidationFailed` on `ends_at` if the new window has already ended
    pub fn reactivate(&mut self, window: ValidityWindow, now: Timestamp) -> Result<(), PromotionError> {
        let current = self.status_at(now);
        current
            .transition(LifecycleAction::Reactivate)
            .map_err(|_| PromotionError::invalid_state(current, LifecycleAction::Reactivate))?;

        if window.has_ended_at(now) {
            return Err(ValidationErrors::from(ValidationError::invalid_order("ends_at", "now")).into());
        }

        self.admin_state = AdminState::Active;
        self.window = window;
        self.updated_at = now;
        Ok(())
    }

    /// Pairs the record with its status at `now`.
    pub fn view_at(self, now: Timestamp) -> PromotionView {
        let status = self.status_at(now);
        PromotionView {
            promotion: self,
            status,
        }
    }
}

fn usage_below_limit(used: u32, limit: u32) -> Option<ValidationError> {
    if limit != 0 && used > limit {
        Some(ValidationError::below_minimum(
            "usage_limit",
            i64::from(used),
            i64::from(limit),
        ))
    } else {
        None
    }
}

/// A promotion together with its derived status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromotionView {
    #[serde(flatten)]
    pub promotion: Promotion,
    pub status: PromotionStatus,
}
