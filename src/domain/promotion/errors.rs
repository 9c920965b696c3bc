//! Promotion-specific error types.
//!
//! Every expected business rejection is a variant here; only
//! `Infrastructure` represents a fault (storage unreachable and the like).
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | ValidationFailed | 422 |
//! | CodeConflict | 409 |
//! | InvalidState | 409 |
//! | Ineligible | 422 |
//! | ConcurrencyConflict | 409 |
//! | Infrastructure | 500 |

use serde::Serialize;
use std::fmt;

use crate::domain::foundation::{DomainError, ErrorCode, PromotionId, ValidationError};

use super::{IneligibleReason, LifecycleAction, PromotionStatus, ValidationErrors};

/// How a missing promotion was looked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "by", content = "value", rename_all = "snake_case")]
pub enum PromotionLookup {
    Id(PromotionId),
    Code(String),
}

impl fmt::Display for PromotionLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PromotionLookup::Id(id) => write!(f, "id {}", id),
            PromotionLookup::Code(code) => write!(f, "code '{}'", code),
        }
    }
}

/// Promotion errors returned across the service boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromotionError {
    /// No promotion matches the id or code.
    NotFound(PromotionLookup),

    /// One or more field invariants were violated.
    ValidationFailed(ValidationErrors),

    /// Another promotion already uses this code.
    CodeConflict(String),

    /// The operation is not allowed from the observed status.
    InvalidState {
        current: PromotionStatus,
        attempted: LifecycleAction,
    },

    /// The promotion cannot be applied to this order.
    Ineligible(IneligibleReason),

    /// The usage guard failed at commit time after the optimistic check
    /// passed. Callers should re-quote rather than retry with stale data.
    ConcurrencyConflict { promotion_id: PromotionId },

    /// Storage or other infrastructure failure.
    Infrastructure(String),
}

impl PromotionError {
    pub fn not_found(id: PromotionId) -> Self {
        PromotionError::NotFound(PromotionLookup::Id(id))
    }

    pub fn code_not_found(code: impl Into<String>) -> Self {
        PromotionError::NotFound(PromotionLookup::Code(code.into()))
    }

    pub fn code_conflict(code: impl Into<String>) -> Self {
        PromotionError::CodeConflict(code.into())
    }

    pub fn invalid_state(current: PromotionStatus, attempted: LifecycleAction) -> Self {
        PromotionError::InvalidState { current, attempted }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        PromotionError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            PromotionError::NotFound(_) => ErrorCode::PromotionNotFound,
            PromotionError::ValidationFailed(_) => ErrorCode::ValidationFailed,
            PromotionError::CodeConflict(_) => ErrorCode::PromotionCodeTaken,
            PromotionError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            PromotionError::Ineligible(_) => ErrorCode::PromotionIneligible,
            PromotionError::ConcurrencyConflict { .. } => ErrorCode::RedemptionConflict,
            PromotionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            PromotionError::NotFound(lookup) => format!("No promotion found with {}", lookup),
            PromotionError::ValidationFailed(errors) => format!("Invalid promotion: {}", errors),
            PromotionError::CodeConflict(code) => {
                format!("Promotion code '{}' is already in use", code)
            }
            PromotionError::InvalidState { current, attempted } => {
                format!("Cannot {} a promotion that is {}", attempted, current)
            }
            PromotionError::Ineligible(reason) => reason.user_message(),
            PromotionError::ConcurrencyConflict { .. } => {
                "This promotion was used up while your order was being placed. Please review your discount and try again."
                    .to_string()
            }
            PromotionError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PromotionError::Infrastructure(_))
    }
}

impl fmt::Display for PromotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for PromotionError {}

impl From<DomainError> for PromotionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::PromotionCodeTaken => PromotionError::CodeConflict(
                err.details.get("code").cloned().unwrap_or(err.message),
            ),
            ErrorCode::PromotionNotFound => {
                let id = err.details.get("id").and_then(|id| id.parse::<PromotionId>().ok());
                match (id, err.details.get("code")) {
                    (Some(id), _) => PromotionError::not_found(id),
                    (None, Some(code)) => PromotionError::code_not_found(code.clone()),
                    (None, None) => PromotionError::Infrastructure(err.to_string()),
                }
            }
            ErrorCode::UsageLimitBelowUsed => {
                let count = |key: &str| err.details.get(key).and_then(|v| v.parse::<i64>().ok());
                match (count("used"), count("limit")) {
                    (Some(used), Some(limit)) => PromotionError::ValidationFailed(
                        ValidationError::below_minimum("usage_limit", used, limit).into(),
                    ),
                    _ => PromotionError::Infrastructure(err.to_string()),
                }
            }
            _ => PromotionError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationErrors> for PromotionError {
    fn from(errors: ValidationErrors) -> Self {
        PromotionError::ValidationFailed(errors)
    }
}
