//! Static machine topology: the shape declaration, the configuration
//! tables, and the validated read-only [`Topology`].
//!
//! A topology only exists behind a machine that passed configuration
//! validation, so its tables are dense (one entry per declared id) and
//! every cross-reference in them is known to land on a defined entry.

use serde::{Deserialize, Serialize};

use crate::core::id::{ActionId, ChoiceId, GuardId, StateId, TransitionId};

/// Declared table sizes for one machine.
///
/// The shape fixes, up front, how many entries each id namespace holds.
/// Ids of a namespace are legal exactly when they fall in `1..=count`,
/// and a machine cannot be built until every declared id is defined.
///
/// # Example
///
/// ```rust
/// use detent::Shape;
///
/// let shape = Shape {
///     states: 3,
///     transitions: 4,
///     ..Shape::default()
/// };
/// assert_eq!(shape.choices, 0);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Shape {
    /// Number of states.
    pub states: u16,
    /// Number of choice pseudo-states.
    pub choices: u16,
    /// Number of transitions.
    pub transitions: u16,
    /// Number of action callbacks.
    pub actions: u16,
    /// Number of guard callbacks.
    pub guards: u16,
}

/// Destination of a transition or of a choice branch.
///
/// A request only ever comes to rest in a state; a `Choice` target is an
/// intermediate that the engine resolves further at transition time.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Target {
    /// Come to rest in the named state.
    State(StateId),
    /// Resolve through the named choice pseudo-state.
    Choice(ChoiceId),
}

impl From<StateId> for Target {
    fn from(id: StateId) -> Self {
        Self::State(id)
    }
}

impl From<ChoiceId> for Target {
    fn from(id: ChoiceId) -> Self {
        Self::Choice(id)
    }
}

/// One configured state.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct StateDef {
    /// The state's own id.
    pub id: StateId,
    /// Action run when the state is entered.
    pub entry: Option<ActionId>,
    /// Action run when the state is exited.
    pub exit: Option<ActionId>,
}

/// One configured transition.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TransitionDef {
    /// The transition's own id.
    pub id: TransitionId,
    /// State the transition leaves from.
    pub source: StateId,
    /// Destination, possibly a choice pseudo-state.
    pub target: Target,
    /// Guard consulted before anything runs. `None` means always enabled.
    pub guard: Option<GuardId>,
    /// Action run between source exit and destination entry.
    pub action: Option<ActionId>,
}

/// One guarded branch of a choice pseudo-state.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Branch {
    /// Guard that enables this branch.
    pub guard: GuardId,
    /// Destination taken when the guard holds.
    pub target: Target,
}

impl Branch {
    pub fn new(guard: GuardId, target: Target) -> Self {
        Self { guard, target }
    }
}

/// One configured choice pseudo-state.
///
/// Branches are ordered; the first whose guard holds wins. The mandatory
/// `fallback` target is taken when every branch guard fails, so resolving
/// a choice always yields a destination.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ChoiceDef {
    /// The choice pseudo-state's own id.
    pub id: ChoiceId,
    /// Guarded branches, tried in order.
    pub branches: Vec<Branch>,
    /// Destination when no branch guard holds.
    pub fallback: Target,
}

impl ChoiceDef {
    /// Every destination this choice can produce, fallback last.
    pub(crate) fn targets(&self) -> impl Iterator<Item = Target> + '_ {
        self.branches
            .iter()
            .map(|branch| branch.target)
            .chain(std::iter::once(self.fallback))
    }
}

/// The validated, immutable structure of one machine.
///
/// Built by [`StateMachineBuilder::build`](crate::StateMachineBuilder::build)
/// and carried by the running machine; hosts can inspect it but never
/// change it.
pub struct Topology {
    shape: Shape,
    states: Vec<StateDef>,
    transitions: Vec<TransitionDef>,
    choices: Vec<ChoiceDef>,
    initial: StateId,
}

impl Topology {
    pub(crate) fn new(
        shape: Shape,
        states: Vec<StateDef>,
        transitions: Vec<TransitionDef>,
        choices: Vec<ChoiceDef>,
        initial: StateId,
    ) -> Self {
        Self {
            shape,
            states,
            transitions,
            choices,
            initial,
        }
    }

    /// Declared table sizes.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// State entered when the machine starts.
    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// All states, ordered by id.
    pub fn states(&self) -> &[StateDef] {
        &self.states
    }

    /// All transitions, ordered by id.
    pub fn transitions(&self) -> &[TransitionDef] {
        &self.transitions
    }

    /// All choice pseudo-states, ordered by id.
    pub fn choices(&self) -> &[ChoiceDef] {
        &self.choices
    }

    /// Look up a state by id.
    pub fn state(&self, id: StateId) -> Option<&StateDef> {
        self.states.get(id.slot(self.shape.states)?)
    }

    /// Look up a transition by id.
    pub fn transition(&self, id: TransitionId) -> Option<&TransitionDef> {
        self.transitions.get(id.slot(self.shape.transitions)?)
    }

    /// Look up a choice pseudo-state by id.
    pub fn choice(&self, id: ChoiceId) -> Option<&ChoiceDef> {
        self.choices.get(id.slot(self.shape.choices)?)
    }

    /// Transitions that leave the given state, in id order.
    pub fn outgoing(&self, source: StateId) -> impl Iterator<Item = &TransitionDef> {
        self.transitions
            .iter()
            .filter(move |transition| transition.source == source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state_topology() -> Topology {
        let shape = Shape {
            states: 2,
            transitions: 2,
            ..Shape::default()
        };
        let states = vec![
            StateDef {
                id: StateId(1),
                entry: None,
                exit: None,
            },
            StateDef {
                id: StateId(2),
                entry: Some(ActionId(1)),
                exit: None,
            },
        ];
        let transitions = vec![
            TransitionDef {
                id: TransitionId(1),
                source: StateId(1),
                target: Target::State(StateId(2)),
                guard: None,
                action: None,
            },
            TransitionDef {
                id: TransitionId(2),
                source: StateId(2),
                target: Target::State(StateId(1)),
                guard: None,
                action: None,
            },
        ];
        Topology::new(shape, states, transitions, Vec::new(), StateId(1))
    }

    #[test]
    fn lookups_resolve_legal_ids() {
        let topology = two_state_topology();

        assert_eq!(topology.state(StateId(2)).unwrap().entry, Some(ActionId(1)));
        assert_eq!(
            topology.transition(TransitionId(1)).unwrap().source,
            StateId(1)
        );
    }

    #[test]
    fn lookups_reject_zero_and_out_of_range_ids() {
        let topology = two_state_topology();

        assert!(topology.state(StateId(0)).is_none());
        assert!(topology.state(StateId(3)).is_none());
        assert!(topology.transition(TransitionId(9)).is_none());
        assert!(topology.choice(ChoiceId(1)).is_none());
    }

    #[test]
    fn outgoing_filters_by_source() {
        let topology = two_state_topology();

        let from_first: Vec<TransitionId> = topology
            .outgoing(StateId(1))
            .map(|transition| transition.id)
            .collect();
        assert_eq!(from_first, vec![TransitionId(1)]);

        assert_eq!(topology.outgoing(StateId(7)).count(), 0);
    }

    #[test]
    fn ids_convert_into_targets() {
        assert_eq!(Target::from(StateId(3)), Target::State(StateId(3)));
        assert_eq!(Target::from(ChoiceId(1)), Target::Choice(ChoiceId(1)));
    }

    #[test]
    fn choice_targets_end_with_the_fallback() {
        let choice = ChoiceDef {
            id: ChoiceId(1),
            branches: vec![Branch::new(GuardId(1), Target::State(StateId(1)))],
            fallback: Target::Choice(ChoiceId(2)),
        };

        let targets: Vec<Target> = choice.targets().collect();
        assert_eq!(
            targets,
            vec![
                Target::State(StateId(1)),
                Target::Choice(ChoiceId(2)),
            ]
        );
    }
}
