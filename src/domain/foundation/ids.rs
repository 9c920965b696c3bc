//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Unique identifier for a promotion record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromotionId(Uuid);

impl PromotionId {
    /// Creates a new random PromotionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a PromotionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PromotionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PromotionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PromotionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Order identifier owned by the order subsystem.
///
/// Opaque to this engine; used as the deduplication key for redemptions,
/// so surrounding whitespace is stripped to keep retries from the API
/// layer landing on the same ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Creates a new OrderId, returning error if blank.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("order_id"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotion_ids_are_unique() {
        assert_ne!(PromotionId::new(), PromotionId::new());
    }

    #[test]
    fn promotion_id_parses_from_string() {
        let id = PromotionId::new();
        let parsed: PromotionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn promotion_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<PromotionId>().is_err());
    }

    #[test]
    fn promotion_id_serializes_transparently() {
        let uuid = Uuid::new_v4();
        let json = serde_json::to_string(&PromotionId::from_uuid(uuid)).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }

    #[test]
    fn order_id_trims_whitespace() {
        let id = OrderId::new("  ORD-1001 ").unwrap();
        assert_eq!(id.as_str(), "ORD-1001");
    }

    #[test]
    fn order_id_rejects_blank() {
        match OrderId::new("   ") {
            Err(ValidationError::EmptyField { field }) => assert_eq!(field, "order_id"),
            other => panic!("Expected EmptyField error, got {:?}", other),
        }
    }
}
