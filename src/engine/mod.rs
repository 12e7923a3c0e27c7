//! Machine execution.
//!
//! The engine drives machines that the builder validated: starting and
//! stopping them, processing transition requests, and cascading lifecycle
//! into embedded machines. It allocates nothing and walks only the
//! id-indexed tables fixed at build time.

mod machine;
mod outcome;

pub use machine::StateMachine;
pub use outcome::{RuntimeError, TransitionOutcome};
