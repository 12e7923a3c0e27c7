//! Configuration API for declaring, validating, and building machines.
//!
//! This module provides the shape-first builder and the [`ids!`](crate::ids)
//! macro for naming identifiers. All structural validation lives here;
//! a machine that reaches the engine has already passed it.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::ConfigError;
pub use machine::StateMachineBuilder;
