//! Error types for the domain layer.

use serde::Serialize;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// A single violated constraint, always tagged with the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' must be at least {min}, got {actual}")]
    BelowMinimum { field: String, min: i64, actual: i64 },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Field '{field}' must be later than '{must_follow}'")]
    InvalidOrder { field: String, must_follow: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates a lower-bound validation error.
    pub fn below_minimum(field: impl Into<String>, min: i64, actual: i64) -> Self {
        ValidationError::BelowMinimum {
            field: field.into(),
            min,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an ordering violation between two fields.
    pub fn invalid_order(field: impl Into<String>, must_follow: impl Into<String>) -> Self {
        ValidationError::InvalidOrder {
            field: field.into(),
            must_follow: must_follow.into(),
        }
    }

    /// Returns the field this violation is attached to.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::BelowMinimum { field, .. }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::InvalidOrder { field, .. } => field,
        }
    }

    /// Re-tags the violation with a different field name.
    ///
    /// Value objects report generic names ("percentage"); callers that
    /// know the input field they came from rename them.
    pub fn for_field(self, name: impl Into<String>) -> Self {
        let name = name.into();
        match self {
            ValidationError::EmptyField { .. } => ValidationError::EmptyField { field: name },
            ValidationError::OutOfRange { min, max, actual, .. } => ValidationError::OutOfRange {
                field: name,
                min,
                max,
                actual,
            },
            ValidationError::BelowMinimum { min, actual, .. } => ValidationError::BelowMinimum {
                field: name,
                min,
                actual,
            },
            ValidationError::InvalidFormat { reason, .. } => ValidationError::InvalidFormat {
                field: name,
                reason,
            },
            ValidationError::InvalidOrder { must_follow, .. } => ValidationError::InvalidOrder {
                field: name,
                must_follow,
            },
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    EmptyField,
    OutOfRange,
    InvalidFormat,

    // Not found errors
    PromotionNotFound,

    // Conflict errors
    PromotionCodeTaken,
    UsageLimitBelowUsed,

    // State errors
    InvalidStateTransition,

    // Redemption errors
    PromotionIneligible,
    RedemptionConflict,

    // Infrastructure errors
    DatabaseError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::EmptyField => "EMPTY_FIELD",
            ErrorCode::OutOfRange => "OUT_OF_RANGE",
            ErrorCode::InvalidFormat => "INVALID_FORMAT",
            ErrorCode::PromotionNotFound => "PROMOTION_NOT_FOUND",
            ErrorCode::PromotionCodeTaken => "PROMOTION_CODE_TAKEN",
            ErrorCode::UsageLimitBelowUsed => "USAGE_LIMIT_BELOW_USED",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::PromotionIneligible => "PROMOTION_INELIGIBLE",
            ErrorCode::RedemptionConflict => "REDEMPTION_CONFLICT",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
///
/// Ports return this for infrastructure failures; business rejections
/// travel as typed module errors instead.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// The promotion with `id` does not exist.
    pub fn promotion_not_found(id: impl fmt::Display) -> Self {
        Self::new(ErrorCode::PromotionNotFound, "Promotion not found").with_detail("id", id.to_string())
    }

    /// A write would leave the stored usage count above the new limit.
    pub fn usage_limit_below_used(used: u32, limit: u32) -> Self {
        Self::new(
            ErrorCode::UsageLimitBelowUsed,
            format!("Usage limit {} is below the {} uses already committed", limit, used),
        )
        .with_detail("used", used.to_string())
        .with_detail("limit", limit.to_string())
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}
