//! Builder for configuring and validating machines.

use tracing::debug;

use crate::builder::error::ConfigError;
use crate::core::registry::{ActionFn, ActionRegistry, GuardFn, GuardRegistry};
use crate::core::{
    ActionId, Branch, ChoiceDef, ChoiceId, GuardId, Shape, StateDef, StateId, Target, Topology,
    TransitionDef, TransitionId,
};
use crate::engine::StateMachine;

/// Builder for machines with a declared [`Shape`].
///
/// The builder allocates every table up front from the shape and fills
/// slots as the host defines entries. Each `add_*` call checks the ids it
/// is handed against the declared ranges; [`build`](Self::build) then
/// checks the whole: every declared id defined, an initial state chosen,
/// no branch cycles among choice pseudo-states, and no unreachable
/// states or choices.
///
/// `build` is the only way to obtain a [`StateMachine`], so a machine
/// that exists is a machine that passed validation.
///
/// # Example
///
/// ```rust
/// use detent::{ActionId, Shape, StateId, StateMachineBuilder, Target, TransitionId};
///
/// let machine = StateMachineBuilder::new(Shape {
///     states: 2,
///     transitions: 1,
///     actions: 1,
///     ..Shape::default()
/// })
/// .add_action(ActionId(1), |count: &mut u32| *count += 1)?
/// .add_state(StateId(1), None, None)?
/// .add_state(StateId(2), Some(ActionId(1)), None)?
/// .add_transition(TransitionId(1), StateId(1), Target::State(StateId(2)), None, None)?
/// .initial(StateId(1))?
/// .build()?;
///
/// assert!(!machine.is_started());
/// # Ok::<(), detent::ConfigError>(())
/// ```
pub struct StateMachineBuilder<C> {
    pub(crate) shape: Shape,
    pub(crate) states: Vec<Option<StateDef>>,
    pub(crate) transitions: Vec<Option<TransitionDef>>,
    pub(crate) choices: Vec<Option<ChoiceDef>>,
    pub(crate) actions: Vec<Option<ActionFn<C>>>,
    pub(crate) guards: Vec<Option<GuardFn<C>>>,
    pub(crate) embedded: Vec<Option<Box<StateMachine<C>>>>,
    pub(crate) initial: Option<StateId>,
    chain_limit: Option<u16>,
}

impl<C> StateMachineBuilder<C> {
    /// Create a builder with every table sized by `shape` and empty.
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            states: empty_slots(shape.states),
            transitions: empty_slots(shape.transitions),
            choices: empty_slots(shape.choices),
            actions: empty_slots(shape.actions),
            guards: empty_slots(shape.guards),
            embedded: empty_slots(shape.states),
            initial: None,
            chain_limit: None,
        }
    }

    /// Define a state with optional entry and exit actions.
    pub fn add_state(
        mut self,
        id: StateId,
        entry: Option<ActionId>,
        exit: Option<ActionId>,
    ) -> Result<Self, ConfigError> {
        let slot = self.check_state(id)?;
        if let Some(action) = entry {
            self.check_action(action)?;
        }
        if let Some(action) = exit {
            self.check_action(action)?;
        }
        if self.states[slot].is_some() {
            return Err(ConfigError::DuplicateState(id));
        }
        self.states[slot] = Some(StateDef { id, entry, exit });
        Ok(self)
    }

    /// Define a transition out of `source` with an optional guard and an
    /// optional transition action.
    pub fn add_transition(
        mut self,
        id: TransitionId,
        source: StateId,
        target: Target,
        guard: Option<GuardId>,
        action: Option<ActionId>,
    ) -> Result<Self, ConfigError> {
        let slot = self.check_transition(id)?;
        self.check_state(source)?;
        self.check_target(target)?;
        if let Some(guard) = guard {
            self.check_guard(guard)?;
        }
        if let Some(action) = action {
            self.check_action(action)?;
        }
        if self.transitions[slot].is_some() {
            return Err(ConfigError::DuplicateTransition(id));
        }
        self.transitions[slot] = Some(TransitionDef {
            id,
            source,
            target,
            guard,
            action,
        });
        Ok(self)
    }

    /// Define a choice pseudo-state from its ordered branches and the
    /// fallback destination taken when every branch guard refuses.
    pub fn add_choice(
        mut self,
        id: ChoiceId,
        branches: Vec<Branch>,
        fallback: Target,
    ) -> Result<Self, ConfigError> {
        let slot = self.check_choice(id)?;
        for branch in &branches {
            self.check_guard(branch.guard)?;
            self.check_target(branch.target)?;
        }
        self.check_target(fallback)?;
        if self.choices[slot].is_some() {
            return Err(ConfigError::DuplicateChoice(id));
        }
        self.choices[slot] = Some(ChoiceDef {
            id,
            branches,
            fallback,
        });
        Ok(self)
    }

    /// Register the action callback behind an [`ActionId`].
    pub fn add_action<F>(mut self, id: ActionId, action: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&mut C) + Send + 'static,
    {
        let slot = self.check_action(id)?;
        if self.actions[slot].is_some() {
            return Err(ConfigError::DuplicateAction(id));
        }
        self.actions[slot] = Some(Box::new(action));
        Ok(self)
    }

    /// Register the guard callback behind a [`GuardId`].
    pub fn add_guard<F>(mut self, id: GuardId, guard: F) -> Result<Self, ConfigError>
    where
        F: Fn(&C) -> bool + Send + Sync + 'static,
    {
        let slot = self.check_guard(id)?;
        if self.guards[slot].is_some() {
            return Err(ConfigError::DuplicateGuard(id));
        }
        self.guards[slot] = Some(Box::new(guard));
        Ok(self)
    }

    /// Choose the state entered when the machine starts.
    ///
    /// Calling again replaces the earlier choice.
    pub fn initial(mut self, state: StateId) -> Result<Self, ConfigError> {
        self.check_state(state)?;
        self.initial = Some(state);
        Ok(self)
    }

    /// Embed a built machine in a state, making that state composite.
    ///
    /// The embedded machine starts when its owner state is entered and
    /// stops when it is exited, so it must be handed over stopped. Each
    /// state owns at most one embedded machine. Machines nest by value,
    /// so embedding cannot form a cycle.
    pub fn embed(mut self, state: StateId, machine: StateMachine<C>) -> Result<Self, ConfigError> {
        let slot = self.check_state(state)?;
        if machine.is_started() {
            return Err(ConfigError::EmbeddingStarted(state));
        }
        if self.embedded[slot].is_some() {
            return Err(ConfigError::EmbeddingOccupied(state));
        }
        self.embedded[slot] = Some(Box::new(machine));
        Ok(self)
    }

    /// Cap the number of choice pseudo-state hops one transition request
    /// may resolve through.
    ///
    /// The default is the declared number of choices, which admits every
    /// chain that can exist without revisiting a choice.
    pub fn chain_limit(mut self, hops: u16) -> Self {
        self.chain_limit = Some(hops);
        self
    }

    /// Validate the whole configuration and produce the machine.
    ///
    /// Checks run in a fixed order: table density (every declared id
    /// defined), the initial state, branch cycles among choice
    /// pseudo-states, and reachability of every state and choice. The
    /// builder is consumed either way; on error nothing of it survives.
    pub fn build(self) -> Result<StateMachine<C>, ConfigError> {
        let Self {
            shape,
            states,
            transitions,
            choices,
            actions,
            guards,
            embedded,
            initial,
            chain_limit,
        } = self;

        let states = collect_defined(states, |id| ConfigError::UndefinedState(StateId(id)))?;
        let transitions = collect_defined(transitions, |id| {
            ConfigError::UndefinedTransition(TransitionId(id))
        })?;
        let choices = collect_defined(choices, |id| ConfigError::UndefinedChoice(ChoiceId(id)))?;
        let actions = collect_defined(actions, |id| ConfigError::UndefinedAction(ActionId(id)))?;
        let guards = collect_defined(guards, |id| ConfigError::UndefinedGuard(GuardId(id)))?;

        let initial = initial.ok_or(ConfigError::MissingInitialState)?;

        check_choice_cycles(&choices)?;
        check_reachability(&states, &choices, &transitions, initial)?;

        let limit = chain_limit.unwrap_or(shape.choices);
        debug!(
            states = shape.states,
            transitions = shape.transitions,
            choices = shape.choices,
            chain_limit = limit,
            "machine configuration validated"
        );

        Ok(StateMachine::from_parts(
            Topology::new(shape, states, transitions, choices, initial),
            ActionRegistry::new(actions),
            GuardRegistry::new(guards),
            embedded,
            limit,
        ))
    }

    fn check_state(&self, id: StateId) -> Result<usize, ConfigError> {
        id.slot(self.shape.states).ok_or(ConfigError::IllegalStateId {
            id,
            max: self.shape.states,
        })
    }

    fn check_choice(&self, id: ChoiceId) -> Result<usize, ConfigError> {
        id.slot(self.shape.choices)
            .ok_or(ConfigError::IllegalChoiceId {
                id,
                max: self.shape.choices,
            })
    }

    fn check_transition(&self, id: TransitionId) -> Result<usize, ConfigError> {
        id.slot(self.shape.transitions)
            .ok_or(ConfigError::IllegalTransitionId {
                id,
                max: self.shape.transitions,
            })
    }

    fn check_action(&self, id: ActionId) -> Result<usize, ConfigError> {
        id.slot(self.shape.actions)
            .ok_or(ConfigError::IllegalActionId {
                id,
                max: self.shape.actions,
            })
    }

    fn check_guard(&self, id: GuardId) -> Result<usize, ConfigError> {
        id.slot(self.shape.guards).ok_or(ConfigError::IllegalGuardId {
            id,
            max: self.shape.guards,
        })
    }

    fn check_target(&self, target: Target) -> Result<(), ConfigError> {
        match target {
            Target::State(state) => self.check_state(state).map(|_| ()),
            Target::Choice(choice) => self.check_choice(choice).map(|_| ()),
        }
    }
}

fn empty_slots<T>(count: u16) -> Vec<Option<T>> {
    (0..count).map(|_| None).collect()
}

/// Turn a slot table into a dense table, or report the first hole as the
/// given undefined-id error.
fn collect_defined<T>(
    slots: Vec<Option<T>>,
    undefined: impl Fn(u16) -> ConfigError,
) -> Result<Vec<T>, ConfigError> {
    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| slot.ok_or_else(|| undefined(index as u16 + 1)))
        .collect()
}

/// Reject branch graphs in which some choice can never resolve to a state.
///
/// Peels choices in topological order over choice-to-choice edges; anything
/// left unpeeled sits on or behind a cycle. Iterative on purpose: the check
/// must not recurse on host-supplied structure.
fn check_choice_cycles(choices: &[ChoiceDef]) -> Result<(), ConfigError> {
    let mut incoming = vec![0usize; choices.len()];
    for choice in choices {
        for target in choice.targets() {
            if let Target::Choice(next) = target {
                incoming[next.index()] += 1;
            }
        }
    }

    let mut ready: Vec<usize> = (0..choices.len())
        .filter(|&index| incoming[index] == 0)
        .collect();
    let mut peeled = 0;
    while let Some(index) = ready.pop() {
        peeled += 1;
        for target in choices[index].targets() {
            if let Target::Choice(next) = target {
                let next = next.index();
                incoming[next] -= 1;
                if incoming[next] == 0 {
                    ready.push(next);
                }
            }
        }
    }

    if peeled < choices.len() {
        let stuck = incoming
            .iter()
            .position(|&degree| degree > 0)
            .unwrap_or(0) as u16;
        return Err(ConfigError::ChoiceCycle(ChoiceId(stuck + 1)));
    }
    Ok(())
}

/// Reject states and choices that no transition, branch, or the initial
/// designation can ever reach.
fn check_reachability(
    states: &[StateDef],
    choices: &[ChoiceDef],
    transitions: &[TransitionDef],
    initial: StateId,
) -> Result<(), ConfigError> {
    let mut state_reached = vec![false; states.len()];
    let mut choice_reached = vec![false; choices.len()];
    state_reached[initial.index()] = true;

    for transition in transitions {
        mark(transition.target, &mut state_reached, &mut choice_reached);
    }
    for choice in choices {
        for target in choice.targets() {
            mark(target, &mut state_reached, &mut choice_reached);
        }
    }

    if let Some(index) = state_reached.iter().position(|&reached| !reached) {
        return Err(ConfigError::UnreachableState(StateId(index as u16 + 1)));
    }
    if let Some(index) = choice_reached.iter().position(|&reached| !reached) {
        return Err(ConfigError::UnreachableChoice(ChoiceId(index as u16 + 1)));
    }
    Ok(())
}

fn mark(target: Target, state_reached: &mut [bool], choice_reached: &mut [bool]) {
    match target {
        Target::State(state) => state_reached[state.index()] = true,
        Target::Choice(choice) => choice_reached[choice.index()] = true,
    }
}
