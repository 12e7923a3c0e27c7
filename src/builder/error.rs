//! Configuration errors for the machine builder.

use thiserror::Error;

use crate::core::{ActionId, ChoiceId, GuardId, StateId, TransitionId};

/// Errors that reject a configuration step or the final build.
///
/// Illegal-id errors are raised by the `add_*` call that presented the id;
/// the remaining variants are raised by [`build`], which refuses to produce
/// a machine from an incomplete or unsound topology.
///
/// [`build`]: crate::StateMachineBuilder::build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("state id {id} outside the declared range 1..={max}")]
    IllegalStateId { id: StateId, max: u16 },

    #[error("choice id {id} outside the declared range 1..={max}")]
    IllegalChoiceId { id: ChoiceId, max: u16 },

    #[error("transition id {id} outside the declared range 1..={max}")]
    IllegalTransitionId { id: TransitionId, max: u16 },

    #[error("action id {id} outside the declared range 1..={max}")]
    IllegalActionId { id: ActionId, max: u16 },

    #[error("guard id {id} outside the declared range 1..={max}")]
    IllegalGuardId { id: GuardId, max: u16 },

    #[error("state {0} defined twice")]
    DuplicateState(StateId),

    #[error("choice pseudo-state {0} defined twice")]
    DuplicateChoice(ChoiceId),

    #[error("transition {0} defined twice")]
    DuplicateTransition(TransitionId),

    #[error("action {0} registered twice")]
    DuplicateAction(ActionId),

    #[error("guard {0} registered twice")]
    DuplicateGuard(GuardId),

    #[error("state {0} declared but never defined. Call .add_state for every declared id")]
    UndefinedState(StateId),

    #[error("choice pseudo-state {0} declared but never defined. Call .add_choice for every declared id")]
    UndefinedChoice(ChoiceId),

    #[error("transition {0} declared but never defined. Call .add_transition for every declared id")]
    UndefinedTransition(TransitionId),

    #[error("action {0} declared but never registered. Call .add_action for every declared id")]
    UndefinedAction(ActionId),

    #[error("guard {0} declared but never registered. Call .add_guard for every declared id")]
    UndefinedGuard(GuardId),

    #[error("initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("branch cycle among choice pseudo-states. Choice {0} can never resolve to a state")]
    ChoiceCycle(ChoiceId),

    #[error("state {0} is unreachable. It is neither the initial state nor the destination of any transition or branch")]
    UnreachableState(StateId),

    #[error("choice pseudo-state {0} is unreachable. It is not the destination of any transition or branch")]
    UnreachableChoice(ChoiceId),

    #[error("state {0} already owns an embedded machine")]
    EmbeddingOccupied(StateId),

    #[error("machine embedded in state {0} must be stopped")]
    EmbeddingStarted(StateId),
}

impl ConfigError {
    /// Stable symbolic name of this error code, for reports and telemetry.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::IllegalStateId { .. } => "IllegalStateId",
            Self::IllegalChoiceId { .. } => "IllegalChoiceId",
            Self::IllegalTransitionId { .. } => "IllegalTransitionId",
            Self::IllegalActionId { .. } => "IllegalActionId",
            Self::IllegalGuardId { .. } => "IllegalGuardId",
            Self::DuplicateState(_) => "DuplicateState",
            Self::DuplicateChoice(_) => "DuplicateChoice",
            Self::DuplicateTransition(_) => "DuplicateTransition",
            Self::DuplicateAction(_) => "DuplicateAction",
            Self::DuplicateGuard(_) => "DuplicateGuard",
            Self::UndefinedState(_) => "UndefinedState",
            Self::UndefinedChoice(_) => "UndefinedChoice",
            Self::UndefinedTransition(_) => "UndefinedTransition",
            Self::UndefinedAction(_) => "UndefinedAction",
            Self::UndefinedGuard(_) => "UndefinedGuard",
            Self::MissingInitialState => "MissingInitialState",
            Self::ChoiceCycle(_) => "ChoiceCycle",
            Self::UnreachableState(_) => "UnreachableState",
            Self::UnreachableChoice(_) => "UnreachableChoice",
            Self::EmbeddingOccupied(_) => "EmbeddingOccupied",
            Self::EmbeddingStarted(_) => "EmbeddingStarted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_offending_id() {
        let err = ConfigError::IllegalStateId {
            id: StateId(9),
            max: 4,
        };
        assert_eq!(
            err.to_string(),
            "state id 9 outside the declared range 1..=4"
        );

        let err = ConfigError::DuplicateGuard(GuardId(2));
        assert_eq!(err.to_string(), "guard 2 registered twice");
    }

    #[test]
    fn names_are_stable_symbols() {
        assert_eq!(
            ConfigError::MissingInitialState.name(),
            "MissingInitialState"
        );
        assert_eq!(ConfigError::ChoiceCycle(ChoiceId(1)).name(), "ChoiceCycle");
        assert_eq!(
            ConfigError::UndefinedAction(ActionId(3)).name(),
            "UndefinedAction"
        );
    }
}
