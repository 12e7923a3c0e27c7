//! Detent: a deterministic hierarchical state machine engine
//!
//! Detent is built for control software that must account for every byte
//! and every branch: machines declare the size of all their tables up
//! front, configuration is validated before an executable machine can
//! exist, and processing a transition is a fixed walk over id-indexed
//! arrays with no allocation and no recursion over host-supplied
//! structure.
//!
//! # Core Concepts
//!
//! - **Shape**: declared table sizes; ids are small integers `1..=count`
//! - **Builder**: fills the declared tables and validates the whole
//!   topology, the only source of executable machines
//! - **Machine**: started or stopped; when started it rests in exactly
//!   one state and moves only through configured transitions
//! - **Choice pseudo-states**: ordered guarded branches with a mandatory
//!   fallback, resolved at transition time under a hop limit
//! - **Embedding**: a state may own another machine, started and stopped
//!   with its owner
//!
//! # Example
//!
//! ```rust
//! use detent::{ActionId, Shape, StateId, StateMachineBuilder, Target, TransitionId};
//! use detent::TransitionOutcome;
//!
//! #[derive(Default)]
//! struct Counters {
//!     entered: u32,
//! }
//!
//! let mut machine = StateMachineBuilder::new(Shape {
//!     states: 2,
//!     transitions: 1,
//!     actions: 1,
//!     ..Shape::default()
//! })
//! .add_action(ActionId(1), |counters: &mut Counters| counters.entered += 1)?
//! .add_state(StateId(1), None, None)?
//! .add_state(StateId(2), Some(ActionId(1)), None)?
//! .add_transition(TransitionId(1), StateId(1), Target::State(StateId(2)), None, None)?
//! .initial(StateId(1))?
//! .build()?;
//!
//! let mut counters = Counters::default();
//! machine.start(&mut counters)?;
//!
//! let outcome = machine.make_transition(&mut counters, TransitionId(1))?;
//! assert_eq!(outcome, TransitionOutcome::Taken { to: StateId(2) });
//! assert_eq!(counters.entered, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod core;
pub mod engine;
pub mod report;

// Re-export the whole working surface
pub use builder::{ConfigError, StateMachineBuilder};
pub use core::{
    ActionFn, ActionId, Branch, ChoiceDef, ChoiceId, GuardFn, GuardId, Shape, StateDef, StateId,
    Target, Topology, TransitionDef, TransitionId,
};
pub use engine::{RuntimeError, StateMachine, TransitionOutcome};
