//! Promotion code value object.
//!
//! Customers type codes at checkout, so matching is case-insensitive:
//! codes are trimmed and upper-cased on the way in and stored that way.
//!
//! # Validation Rules
//!
//! - 1-32 characters after normalization
//! - Only `A-Z`, `0-9`, `_` and `-`

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// A validated, normalized promotion code.
///
/// # Example
///
/// ```ignore
/// let code = PromotionCode::try_new("  summer_sale-24 ")?;
/// assert_eq!(code.as_str(), "SUMMER_SALE-24");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PromotionCode(String);

impl PromotionCode {
    /// Maximum length of a normalized code.
    pub const MAX_LEN: usize = 32;

    /// Normalizes and validates a raw code.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` tagged with field `code` if the code is
    /// blank, contains characters outside `[A-Z0-9_-]`, or is too long.
    pub fn try_new(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().to_uppercase();

        if normalized.is_empty() {
            return Err(ValidationError::empty_field("code"));
        }

        if !normalized.chars().all(is_code_char) {
            return Err(ValidationError::invalid_format(
                "code",
                "only letters, digits, '_' and '-' are allowed",
            ));
        }

        // All characters are ASCII at this point, so bytes == chars.
        if normalized.len() > Self::MAX_LEN {
            return Err(ValidationError::out_of_range(
                "code",
                1,
                Self::MAX_LEN as i64,
                normalized.len() as i64,
            ));
        }

        Ok(Self(normalized))
    }

    /// Returns the normalized code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if a raw customer-entered code refers to this code.
    pub fn matches(&self, raw: &str) -> bool {
        self.0 == raw.trim().to_uppercase()
    }
}

fn is_code_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_' || c == '-'
}

impl fmt::Display for PromotionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for PromotionCode {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl TryFrom<String> for PromotionCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(&value)
    }
}

impl From<PromotionCode> for String {
    fn from(code: PromotionCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ════════════════════════════════════════════════════════════════════════════
    // Normalization
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn uppercases_and_trims() {
        let code = PromotionCode::try_new("  summer_sale-24\t").unwrap();
        assert_eq!(code.as_str(), "SUMMER_SALE-24");
    }

    #[test]
    fn single_character_is_valid() {
        assert_eq!(PromotionCode::try_new("x").unwrap().as_str(), "X");
    }

    #[test]
    fn thirty_two_characters_is_valid() {
        let raw = "A".repeat(32);
        assert_eq!(PromotionCode::try_new(&raw).unwrap().as_str(), raw);
    }

    #[test]
    fn matches_is_case_insensitive() {
        let code = PromotionCode::try_new("WELCOME10").unwrap();
        assert!(code.matches("welcome10"));
        assert!(code.matches(" Welcome10 "));
        assert!(!code.matches("WELCOME11"));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Rejections
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn blank_code_is_rejected() {
        assert_eq!(
            PromotionCode::try_new("   ").unwrap_err(),
            ValidationError::empty_field("code")
        );
    }

    #[test]
    fn thirty_three_characters_is_rejected() {
        let err = PromotionCode::try_new(&"B".repeat(33)).unwrap_err();
        assert_eq!(err, ValidationError::out_of_range("code", 1, 32, 33));
    }

    #[test]
    fn punctuation_is_rejected() {
        for raw in ["SALE!", "SALE 10", "SALE.10", "ÉTÉ"] {
            match PromotionCode::try_new(raw) {
                Err(ValidationError::InvalidFormat { field, .. }) => assert_eq!(field, "code"),
                other => panic!("Expected InvalidFormat for {:?}, got {:?}", raw, other),
            }
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Serialization
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn serializes_as_plain_string() {
        let code = PromotionCode::try_new("vip").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"VIP\"");
    }

    #[test]
    fn deserialization_normalizes() {
        let code: PromotionCode = serde_json::from_str("\"vip-2024\"").unwrap();
        assert_eq!(code.as_str(), "VIP-2024");
    }

    #[test]
    fn deserialization_rejects_invalid_codes() {
        assert!(serde_json::from_str::<PromotionCode>("\"no spaces\"").is_err());
    }
}
