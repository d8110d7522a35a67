//! Violations and their lifecycle state machine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of a violation.
///
/// Transitions are one-way: `New -> Acknowledged -> Resolved`, with the
/// terminal `Overridden` reachable from any non-terminal state. A violation
/// never reverts to an earlier state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationState {
    New,
    Acknowledged,
    Resolved,
    Overridden,
}

impl ViolationState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Overridden)
    }

    /// Whether the one-way state machine permits `self -> to`.
    pub fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::New, Self::Acknowledged)
                | (Self::Acknowledged, Self::Resolved)
                | (Self::New, Self::Overridden)
                | (Self::Acknowledged, Self::Overridden)
        )
    }
}

/// Rejected attempt to move a violation backwards or out of a terminal state.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("illegal violation transition: {from:?} -> {to:?}")]
pub struct TransitionError {
    pub from: ViolationState,
    pub to: ViolationState,
}

/// A finding produced by a check engine: a specific axiom was not satisfied
/// for a specific file. `axiom_id` is a weak reference by id, not ownership.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Violation {
    pub axiom_id: String,
    pub file_path: String,
    pub message: String,
    pub state: ViolationState,
}

impl Violation {
    pub fn new(
        axiom_id: impl Into<String>,
        file_path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            axiom_id: axiom_id.into(),
            file_path: file_path.into(),
            message: message.into(),
            state: ViolationState::New,
        }
    }

    /// Advance the lifecycle state, rejecting illegal transitions.
    pub fn transition_to(&mut self, to: ViolationState) -> Result<(), TransitionError> {
        if !self.state.can_transition_to(to) {
            return Err(TransitionError {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}
