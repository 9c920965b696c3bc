//! Promotion status derivation.
//!
//! Status is never stored. It is recomputed from the administrator's
//! intent (`AdminState`), the validity window and the clock. Precedence,
//! first match wins:
//!
//! 1. `Paused` intent → `Paused` (pause overrides schedule)
//! 2. window ended (`now > ends_at`) → `Expired`
//! 3. window not started (`now < starts_at`) → `Scheduled`
//! 4. otherwise → `Active`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, Timestamp};

use super::ValidityWindow;

/// The administrator's explicit intent, independent of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminState {
    #[default]
    Active,
    Paused,
}

impl AdminState {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminState::Active => "active",
            AdminState::Paused => "paused",
        }
    }
}

impl FromStr for AdminState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(AdminState::Active),
            "paused" => Ok(AdminState::Paused),
            other => Err(format!("unknown admin state '{}'", other)),
        }
    }
}

/// Observed status of a promotion at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionStatus {
    Active,
    Scheduled,
    Paused,
    Expired,
}

impl PromotionStatus {
    /// Derives the observed status. Pure and deterministic.
    pub fn derive(admin_state: AdminState, window: &ValidityWindow, now: Timestamp) -> Self {
        if admin_state == AdminState::Paused {
            return PromotionStatus::Paused;
        }
        if window.has_ended_at(now) {
            return PromotionStatus::Expired;
        }
        if window.is_pending_at(now) {
            return PromotionStatus::Scheduled;
        }
        PromotionStatus::Active
    }

    /// True only for `Active`; the one status that accepts redemptions.
    pub fn is_redeemable(&self) -> bool {
        matches!(self, PromotionStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PromotionStatus::Active => "active",
            PromotionStatus::Scheduled => "scheduled",
            PromotionStatus::Paused => "paused",
            PromotionStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for PromotionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Administrative actions against the observed lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    /// Active → Paused.
    Pause,
    /// Paused → Active.
    Resume,
    /// Scheduled → Active, pulling the start forward to now.
    ForceActivate,
    /// Expired → Active/Scheduled with a fresh window.
    Reactivate,
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleAction::Pause => "pause",
            LifecycleAction::Resume => "resume",
            LifecycleAction::ForceActivate => "force-activate",
            LifecycleAction::Reactivate => "reactivate",
        };
        f.write_str(s)
    }
}

impl StateMachine for PromotionStatus {
    type Action = LifecycleAction;

    fn target(&self, action: LifecycleAction) -> Option<Self> {
        use LifecycleAction::*;
        use PromotionStatus::*;
        match (self, action) {
            (Active, Pause) => Some(Paused),
            (Paused, Resume) => Some(Active),
            (Scheduled, ForceActivate) => Some(Active),
            // Nominal target; a future start reads back as Scheduled.
            (Expired, Reactivate) => Some(Active),
            _ => None,
        }
    }

    fn permitted_actions(&self) -> Vec<LifecycleAction> {
        match self {
            PromotionStatus::Active => vec![LifecycleAction::Pause],
            PromotionStatus::Paused => vec![LifecycleAction::Resume],
            PromotionStatus::Scheduled => vec![LifecycleAction::ForceActivate],
            PromotionStatus::Expired => vec![LifecycleAction::Reactivate],
        }
    }
}
