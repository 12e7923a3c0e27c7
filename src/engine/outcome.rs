//! Transition outcomes and runtime errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{StateId, TransitionId};

/// Outcome of a well-formed transition request.
///
/// A rejected guard is an outcome, not an error: the host asked a
/// legitimate question and the answer was no. Errors are reserved for
/// requests the machine cannot interpret at all.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum TransitionOutcome {
    /// The transition ran; the machine now rests in `to`.
    Taken {
        /// State the request resolved to.
        to: StateId,
    },
    /// The transition's guard held it back. No action ran and the current
    /// state is unchanged.
    GuardFailed,
}

impl TransitionOutcome {
    /// Whether the request moved the machine through a transition.
    pub fn is_taken(&self) -> bool {
        matches!(self, Self::Taken { .. })
    }
}

/// Errors raised while driving a built machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("machine is not started")]
    NotStarted,

    #[error("machine is already started")]
    AlreadyStarted,

    #[error("transition id {0} is not configured")]
    UnknownTransition(TransitionId),

    #[error("transition {transition} does not leave the current state {from}")]
    TransitionUnavailable {
        transition: TransitionId,
        from: StateId,
    },

    #[error("destination resolution exceeded {limit} choice pseudo-state hops")]
    ChainLimitExceeded { limit: u16 },
}

impl RuntimeError {
    /// Stable symbolic name of this error code, for reports and telemetry.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NotStarted => "NotStarted",
            Self::AlreadyStarted => "AlreadyStarted",
            Self::UnknownTransition(_) => "UnknownTransition",
            Self::TransitionUnavailable { .. } => "TransitionUnavailable",
            Self::ChainLimitExceeded { .. } => "ChainLimitExceeded",
        }
    }
}
