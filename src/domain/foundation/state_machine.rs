//! State machine trait for action-driven lifecycles.
//!
//! Some lifecycles are observed rather than stored: the current state is
//! derived, and administrators act on it. Implementors declare which
//! actions each state accepts and which state the action aims for.

use std::fmt::Debug;

use super::ValidationError;

/// Trait for status enums driven by named actions.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for PromotionStatus {
///     type Action = LifecycleAction;
///
///     fn target(&self, action: LifecycleAction) -> Option<Self> {
///         match (self, action) {
///             (Active, Pause) => Some(Paused),
///             (Paused, Resume) => Some(Active),
///             _ => None,
///         }
///     }
///     // ...
/// }
///
/// let next = status.transition(LifecycleAction::Pause)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + Debug {
    /// Actions an operator can take against this lifecycle.
    type Action: Copy + PartialEq + Debug;

    /// Returns the state the action aims for, or `None` if not permitted.
    fn target(&self, action: Self::Action) -> Option<Self>;

    /// Returns every action permitted from the current state.
    fn permitted_actions(&self) -> Vec<Self::Action>;

    /// Returns true if the action is permitted from the current state.
    fn permits(&self, action: Self::Action) -> bool {
        self.target(action).is_some()
    }

    /// Performs the transition, returning error if the action is not permitted.
    fn transition(&self, action: Self::Action) -> Result<Self, ValidationError> {
        self.target(action).ok_or_else(|| {
            ValidationError::invalid_format(
                "state_transition",
                format!("Cannot apply {:?} while {:?}", action, self),
            )
        })
    }

    /// Checks if no action is permitted from the current state.
    fn is_terminal(&self) -> bool {
        self.permitted_actions().is_empty()
    }
}
