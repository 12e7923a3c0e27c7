//! Macros for ergonomic machine configuration.

/// Declare named constants for machine identifiers.
///
/// Control tables read poorly as bare numbers. This macro binds symbolic
/// names to ids, one block per namespace (`state`, `choice`, `transition`,
/// `action`, `guard`), in any order. Each constant has the matching id
/// type, so a state name cannot be passed where a transition is expected.
///
/// # Example
///
/// ```
/// use detent::ids;
///
/// ids! {
///     state {
///         IDLE = 1,
///         ARMED = 2,
///     }
///     transition {
///         ARM = 1,
///         DISARM = 2,
///     }
///     guard {
///         INTERLOCK_CLEAR = 1,
///     }
/// }
///
/// assert_eq!(IDLE, detent::StateId(1));
/// assert_eq!(DISARM, detent::TransitionId(2));
/// ```
#[macro_export]
macro_rules! ids {
    () => {};
    (state { $($vis:vis $name:ident = $value:expr),+ $(,)? } $($rest:tt)*) => {
        $($vis const $name: $crate::StateId = $crate::StateId($value);)+
        $crate::ids!($($rest)*);
    };
    (choice { $($vis:vis $name:ident = $value:expr),+ $(,)? } $($rest:tt)*) => {
        $($vis const $name: $crate::ChoiceId = $crate::ChoiceId($value);)+
        $crate::ids!($($rest)*);
    };
    (transition { $($vis:vis $name:ident = $value:expr),+ $(,)? } $($rest:tt)*) => {
        $($vis const $name: $crate::TransitionId = $crate::TransitionId($value);)+
        $crate::ids!($($rest)*);
    };
    (action { $($vis:vis $name:ident = $value:expr),+ $(,)? } $($rest:tt)*) => {
        $($vis const $name: $crate::ActionId = $crate::ActionId($value);)+
        $crate::ids!($($rest)*);
    };
    (guard { $($vis:vis $name:ident = $value:expr),+ $(,)? } $($rest:tt)*) => {
        $($vis const $name: $crate::GuardId = $crate::GuardId($value);)+
        $crate::ids!($($rest)*);
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{ActionId, ChoiceId, StateId, TransitionId};

    ids! {
        state {
            OFF = 1,
            ON = 2,
        }
        transition {
            TOGGLE = 1,
        }
    }

    #[test]
    fn constants_carry_their_namespace_type() {
        assert_eq!(OFF, StateId(1));
        assert_eq!(ON, StateId(2));
        assert_eq!(TOGGLE, TransitionId(1));
    }

    #[test]
    fn namespaces_compose_in_any_order() {
        ids! {
            action {
                LOG = 3,
            }
            choice {
                ROUTE = 1,
            }
            action {
                RESET = 4,
            }
        }

        assert_eq!(LOG, ActionId(3));
        assert_eq!(ROUTE, ChoiceId(1));
        assert_eq!(RESET, ActionId(4));
    }

    #[test]
    fn visibility_modifiers_are_accepted() {
        mod plant {
            ids! {
                state {
                    pub RUNNING = 1,
                }
                guard {
                    pub(crate) SAFE = 1,
                }
            }
        }

        assert_eq!(plant::RUNNING, StateId(1));
        assert_eq!(plant::SAFE, crate::GuardId(1));
    }
}
