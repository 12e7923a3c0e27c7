//! Identifier newtypes for the five id namespaces of a machine.
//!
//! Identifiers are small non-zero integers, unique within their namespace
//! for one machine: a machine whose [`Shape`](crate::core::Shape) declares
//! `n` states accepts exactly the state ids `1..=n`. Configuration tables
//! are indexed by `id - 1`, so every lookup is a direct array access.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u16);

        impl $name {
            /// Table slot for this id, if the id is legal for a table of
            /// `count` entries. Zero and out-of-range ids have no slot.
            pub(crate) fn slot(self, count: u16) -> Option<usize> {
                if self.0 == 0 || self.0 > count {
                    None
                } else {
                    Some(self.0 as usize - 1)
                }
            }

            /// Table slot for an id that already passed configuration
            /// validation.
            pub(crate) fn index(self) -> usize {
                self.0 as usize - 1
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype! {
    /// Identifier of a state, `1..=shape.states`.
    StateId
}

id_newtype! {
    /// Identifier of a choice pseudo-state, `1..=shape.choices`.
    ChoiceId
}

id_newtype! {
    /// Identifier of a transition, `1..=shape.transitions`.
    TransitionId
}

id_newtype! {
    /// Identifier of a registered action, `1..=shape.actions`.
    ActionId
}

id_newtype! {
    /// Identifier of a registered guard, `1..=shape.guards`.
    GuardId
}
