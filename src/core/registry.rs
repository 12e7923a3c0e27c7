//! Callback registries holding the host's actions and guards.
//!
//! Machines never observe host behavior directly. The host registers
//! numbered callbacks at configuration time and the tables reference them
//! by id; the engine invokes them through these registries.

use crate::core::id::{ActionId, GuardId};

/// An action callback: a procedure invoked with exclusive access to the
/// host context. Actions run on state entry, state exit, and transitions.
pub type ActionFn<C> = Box<dyn FnMut(&mut C) + Send>;

/// A guard callback: a predicate over the host context. Guards must not
/// mutate observable state; the engine may evaluate them any number of
/// times while resolving a destination.
pub type GuardFn<C> = Box<dyn Fn(&C) -> bool + Send + Sync>;

/// Dense table of actions, indexed by [`ActionId`].
pub(crate) struct ActionRegistry<C> {
    slots: Vec<ActionFn<C>>,
}

impl<C> ActionRegistry<C> {
    pub(crate) fn new(slots: Vec<ActionFn<C>>) -> Self {
        Self { slots }
    }

    /// Run a validated action against the host context.
    pub(crate) fn run(&mut self, id: ActionId, ctx: &mut C) {
        (self.slots[id.index()])(ctx);
    }
}

/// Dense table of guards, indexed by [`GuardId`].
pub(crate) struct GuardRegistry<C> {
    slots: Vec<GuardFn<C>>,
}

impl<C> GuardRegistry<C> {
    pub(crate) fn new(slots: Vec<GuardFn<C>>) -> Self {
        Self { slots }
    }

    /// Evaluate a validated guard against the host context.
    pub(crate) fn eval(&self, id: GuardId, ctx: &C) -> bool {
        (self.slots[id.index()])(ctx)
    }
}
