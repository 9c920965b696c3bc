//! Validity window value object.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, ValidationError};

/// Optional start/end bounds of a promotion.
///
/// # Invariants
///
/// - If both bounds are set, `ends_at > starts_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ValidityWindow {
    starts_at: Option<Timestamp>,
    ends_at: Option<Timestamp>,
}

impl ValidityWindow {
    /// Creates a window, rejecting an end that does not follow the start.
    pub fn new(
        starts_at: Option<Timestamp>,
        ends_at: Option<Timestamp>,
    ) -> Result<Self, ValidationError> {
        if let (Some(start), Some(end)) = (starts_at, ends_at) {
            if !end.is_after(&start) {
                return Err(ValidationError::invalid_order("ends_at", "starts_at"));
            }
        }
        Ok(Self { starts_at, ends_at })
    }

    /// A window with no bounds at all.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn starts_at(&self) -> Option<Timestamp> {
        self.starts_at
    }

    pub fn ends_at(&self) -> Option<Timestamp> {
        self.ends_at
    }

    /// True once `now` is strictly past the end.
    pub fn has_ended_at(&self, now: Timestamp) -> bool {
        self.ends_at.map_or(false, |end| now.is_after(&end))
    }

    /// True while `now` is strictly before the start.
    pub fn is_pending_at(&self, now: Timestamp) -> bool {
        self.starts_at.map_or(false, |start| now.is_before(&start))
    }

    /// Pulls the start forward to `now`, keeping the end.
    ///
    /// Only meaningful for a window that has not started yet; the end
    /// already follows the old start, so it also follows `now`.
    pub fn starting_at(&self, now: Timestamp) -> Self {
        Self {
            starts_at: Some(now),
            ends_at: self.ends_at,
        }
    }
}
