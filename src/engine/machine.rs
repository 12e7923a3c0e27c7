//! The machine engine: start, stop, and transition processing.

use tracing::{debug, trace};

use crate::core::registry::{ActionRegistry, GuardRegistry};
use crate::core::{ActionId, GuardId, StateId, Target, Topology, TransitionId};
use crate::engine::outcome::{RuntimeError, TransitionOutcome};

/// An executable state machine.
///
/// A machine only exists after its configuration passed validation, so the
/// engine never re-checks structure at run time: every id it meets resolves
/// to a defined table entry. Driving the machine takes `&mut self` together
/// with `&mut C`, which makes reentry from inside a callback unrepresentable.
///
/// A machine is either stopped (no current state) or started (resting in
/// exactly one of its states). Stopped machines only answer queries.
pub struct StateMachine<C> {
    topology: Topology,
    actions: ActionRegistry<C>,
    guards: GuardRegistry<C>,
    /// One slot per state; `Some` marks a composite state.
    embedded: Vec<Option<Box<StateMachine<C>>>>,
    current: Option<StateId>,
    chain_limit: u16,
}

impl<C> StateMachine<C> {
    pub(crate) fn from_parts(
        topology: Topology,
        actions: ActionRegistry<C>,
        guards: GuardRegistry<C>,
        embedded: Vec<Option<Box<StateMachine<C>>>>,
        chain_limit: u16,
    ) -> Self {
        Self {
            topology,
            actions,
            guards,
            embedded,
            current: None,
            chain_limit,
        }
    }

    /// Start the machine: enter the initial state and run its entry action.
    ///
    /// If the initial state owns an embedded machine, that machine starts
    /// too, after the owner's entry action.
    pub fn start(&mut self, ctx: &mut C) -> Result<(), RuntimeError> {
        if self.current.is_some() {
            return Err(RuntimeError::AlreadyStarted);
        }
        let initial = self.topology.initial();
        debug!(state = %initial, "machine starting");
        self.enter_state(ctx, initial)?;
        self.current = Some(initial);
        Ok(())
    }

    /// Stop the machine: exit the current state and clear it.
    ///
    /// Embedded machines of the exited state stop first, before the owner's
    /// exit action. Stopping discards no configuration; the machine can be
    /// started again and will re-enter its initial state.
    pub fn stop(&mut self, ctx: &mut C) -> Result<(), RuntimeError> {
        let current = self.current.ok_or(RuntimeError::NotStarted)?;
        debug!(state = %current, "machine stopping");
        self.exit_state(ctx, current)?;
        self.current = None;
        Ok(())
    }

    /// Process one transition request.
    ///
    /// The request names a transition by id and runs in a fixed order:
    ///
    /// 1. Reject the request if the machine is not started.
    /// 2. Reject ids that name no configured transition.
    /// 3. Reject transitions that do not leave the current state.
    /// 4. Evaluate the guard; a refusal returns
    ///    [`TransitionOutcome::GuardFailed`] with nothing run and nothing
    ///    moved.
    /// 5. Exit the current state (embedded machines stop first, then the
    ///    exit action runs).
    /// 6. Run the transition action, then resolve the target through any
    ///    choice pseudo-states to a destination state.
    /// 7. Enter the destination (entry action first, then embedded machines
    ///    start) and record it as current.
    ///
    /// A self transition runs the full exit, action, entry sequence.
    ///
    /// When resolution visits more choice pseudo-states than the chain
    /// limit allows, the request fails with
    /// [`RuntimeError::ChainLimitExceeded`]. The source state was already
    /// exited at that point; the current state is left unchanged and the
    /// host is expected to treat the machine as compromised.
    pub fn make_transition(
        &mut self,
        ctx: &mut C,
        transition: TransitionId,
    ) -> Result<TransitionOutcome, RuntimeError> {
        let current = self.current.ok_or(RuntimeError::NotStarted)?;
        let def = self
            .topology
            .transition(transition)
            .ok_or(RuntimeError::UnknownTransition(transition))?;
        if def.source != current {
            return Err(RuntimeError::TransitionUnavailable {
                transition,
                from: current,
            });
        }
        let (guard, action, target) = (def.guard, def.action, def.target);

        if let Some(guard) = guard {
            if !self.eval_guard(ctx, guard) {
                trace!(transition = %transition, guard = %guard, "transition held back by guard");
                return Ok(TransitionOutcome::GuardFailed);
            }
        }

        self.exit_state(ctx, current)?;
        if let Some(action) = action {
            self.run_action(ctx, action);
        }
        let to = self.resolve_target(ctx, target)?;
        self.enter_state(ctx, to)?;
        self.current = Some(to);
        debug!(transition = %transition, from = %current, to = %to, "transition taken");
        Ok(TransitionOutcome::Taken { to })
    }

    /// State the machine currently rests in, `None` while stopped.
    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    /// Whether the machine is started.
    pub fn is_started(&self) -> bool {
        self.current.is_some()
    }

    /// Current state of the machine embedded in the current state.
    ///
    /// `None` while stopped and `None` when the current state is not
    /// composite.
    pub fn current_substate(&self) -> Option<StateId> {
        let current = self.current?;
        self.embedded[current.index()].as_ref()?.current_state()
    }

    /// The validated topology this machine runs.
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Machine embedded in `state`, if that state is composite.
    pub fn embedded(&self, state: StateId) -> Option<&StateMachine<C>> {
        let slot = state.slot(self.topology.shape().states)?;
        self.embedded[slot].as_deref()
    }

    /// Enter a state: entry action first, then any embedded machine starts.
    ///
    /// An embedded machine is started exactly when its owner is current, so
    /// the recursive start always finds it stopped.
    fn enter_state(&mut self, ctx: &mut C, state: StateId) -> Result<(), RuntimeError> {
        if let Some(entry) = self.topology.states()[state.index()].entry {
            self.run_action(ctx, entry);
        }
        if let Some(embedded) = self.embedded[state.index()].as_mut() {
            trace!(owner = %state, "starting embedded machine");
            embedded.start(ctx)?;
        }
        Ok(())
    }

    /// Exit a state: any embedded machine stops first, then the exit action.
    fn exit_state(&mut self, ctx: &mut C, state: StateId) -> Result<(), RuntimeError> {
        if let Some(embedded) = self.embedded[state.index()].as_mut() {
            trace!(owner = %state, "stopping embedded machine");
            embedded.stop(ctx)?;
        }
        if let Some(exit) = self.topology.states()[state.index()].exit {
            self.run_action(ctx, exit);
        }
        Ok(())
    }

    /// Resolve a transition target to the state it comes to rest in.
    ///
    /// Walks branch guards in order at each choice pseudo-state, taking the
    /// fallback when none holds. The hop counter bounds the walk even if
    /// guards answer inconsistently between evaluations.
    fn resolve_target(&self, ctx: &C, target: Target) -> Result<StateId, RuntimeError> {
        let mut target = target;
        let mut hops: u16 = 0;
        loop {
            match target {
                Target::State(state) => return Ok(state),
                Target::Choice(choice) => {
                    hops += 1;
                    if hops > self.chain_limit {
                        return Err(RuntimeError::ChainLimitExceeded {
                            limit: self.chain_limit,
                        });
                    }
                    let def = &self.topology.choices()[choice.index()];
                    trace!(choice = %choice, hop = hops, "resolving choice pseudo-state");
                    target = def
                        .branches
                        .iter()
                        .find(|branch| self.eval_guard(ctx, branch.guard))
                        .map_or(def.fallback, |branch| branch.target);
                }
            }
        }
    }

    fn run_action(&mut self, ctx: &mut C, action: ActionId) {
        trace!(action = %action, "running action");
        self.actions.run(action, ctx);
    }

    fn eval_guard(&self, ctx: &C, guard: GuardId) -> bool {
        let verdict = self.guards.eval(guard, ctx);
        trace!(guard = %guard, verdict, "evaluated guard");
        verdict
    }
}
