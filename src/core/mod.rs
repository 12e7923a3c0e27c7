//! Core data model for machines.
//!
//! This module contains the passive side of the crate:
//! - Identifier newtypes for the five id namespaces
//! - Callback registries holding the host's actions and guards
//! - The shape declaration and validated topology tables
//!
//! Nothing in this module executes a machine; the types here describe
//! structure that the engine walks at run time.

mod id;
pub(crate) mod registry;
mod topology;

pub use id::{ActionId, ChoiceId, GuardId, StateId, TransitionId};
pub use registry::{ActionFn, GuardFn};
pub use topology::{Branch, ChoiceDef, Shape, StateDef, Target, Topology, TransitionDef};
