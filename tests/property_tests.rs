//! Property-based tests for the transition engine.
//!
//! These tests pit the engine against a reference model across many
//! randomly generated machines and request sequences.

use detent::{
    ActionId, Branch, ChoiceId, ConfigError, GuardId, RuntimeError, Shape, StateId, StateMachine,
    StateMachineBuilder, Target, TransitionId, TransitionOutcome,
};
use proptest::prelude::*;

/// Ring of `n` states: transition `i` leads from state `i` to `i + 1`
/// (wrapping), and every state logs its entries and exits.
fn ring_machine(n: u16) -> StateMachine<Vec<(char, u16)>> {
    let mut builder = StateMachineBuilder::new(Shape {
        states: n,
        transitions: n,
        actions: 2 * n,
        ..Shape::default()
    });
    for i in 1..=n {
        builder = builder
            .add_action(ActionId(2 * i - 1), move |log: &mut Vec<(char, u16)>| {
                log.push(('>', i))
            })
            .unwrap()
            .add_action(ActionId(2 * i), move |log: &mut Vec<(char, u16)>| {
                log.push(('<', i))
            })
            .unwrap()
            .add_state(StateId(i), Some(ActionId(2 * i - 1)), Some(ActionId(2 * i)))
            .unwrap()
            .add_transition(
                TransitionId(i),
                StateId(i),
                Target::State(StateId(if i == n { 1 } else { i + 1 })),
                None,
                None,
            )
            .unwrap();
    }
    builder.initial(StateId(1)).unwrap().build().unwrap()
}

prop_compose! {
    fn ring_plan()
        (n in 2u16..6)
        (n in Just(n), requests in prop::collection::vec(1u16..8, 0..24))
        -> (u16, Vec<u16>)
    {
        (n, requests)
    }
}

proptest! {
    #[test]
    fn the_engine_tracks_a_reference_model((n, requests) in ring_plan()) {
        let mut machine = ring_machine(n);
        let mut log = Vec::new();
        machine.start(&mut log).unwrap();

        let mut expected = 1u16;
        let mut taken = 0usize;
        for request in requests {
            let result = machine.make_transition(&mut log, TransitionId(request));
            if request == expected {
                // The only transition leaving state `i` is transition `i`.
                let to = StateId(if expected == n { 1 } else { expected + 1 });
                prop_assert_eq!(result.unwrap(), TransitionOutcome::Taken { to });
                expected = to.0;
                taken += 1;
            } else if request > n {
                prop_assert_eq!(
                    result.unwrap_err(),
                    RuntimeError::UnknownTransition(TransitionId(request))
                );
            } else {
                prop_assert_eq!(
                    result.unwrap_err(),
                    RuntimeError::TransitionUnavailable {
                        transition: TransitionId(request),
                        from: StateId(expected),
                    }
                );
            }
            prop_assert_eq!(machine.current_state(), Some(StateId(expected)));
        }

        // One entry per taken transition plus the start entry, one exit per
        // taken transition, and the newest entry names the resting state.
        let entries = log.iter().filter(|(kind, _)| *kind == '>').count();
        let exits = log.iter().filter(|(kind, _)| *kind == '<').count();
        prop_assert_eq!(entries, taken + 1);
        prop_assert_eq!(exits, taken);
        prop_assert_eq!(log.last().copied(), Some(('>', expected)));
    }

    #[test]
    fn stopping_always_returns_the_machine_to_rest((n, requests) in ring_plan()) {
        let mut machine = ring_machine(n);
        let mut log = Vec::new();
        machine.start(&mut log).unwrap();
        for request in requests {
            let _ = machine.make_transition(&mut log, TransitionId(request));
        }
        let resting = machine.current_state().unwrap();

        machine.stop(&mut log).unwrap();
        prop_assert_eq!(machine.current_state(), None);
        prop_assert_eq!(log.last().copied(), Some(('<', resting.0)));

        log.clear();
        machine.start(&mut log).unwrap();
        prop_assert_eq!(machine.current_state(), Some(StateId(1)));
        prop_assert_eq!(log, vec![('>', 1)]);
    }

    #[test]
    fn the_first_holding_branch_always_wins(
        truths in prop::collection::vec(any::<bool>(), 1..6)
    ) {
        let k = truths.len() as u16;
        let mut builder = StateMachineBuilder::new(Shape {
            states: k + 2,
            choices: 1,
            transitions: 1,
            guards: k,
            ..Shape::default()
        });
        for i in 1..=k {
            let index = (i - 1) as usize;
            builder = builder
                .add_guard(GuardId(i), move |flags: &Vec<bool>| flags[index])
                .unwrap();
        }
        for i in 1..=k + 2 {
            builder = builder.add_state(StateId(i), None, None).unwrap();
        }
        let branches: Vec<Branch> = (1..=k)
            .map(|i| Branch::new(GuardId(i), Target::State(StateId(i + 1))))
            .collect();
        let mut machine = builder
            .add_choice(ChoiceId(1), branches, Target::State(StateId(k + 2)))
            .unwrap()
            .add_transition(TransitionId(1), StateId(1), Target::Choice(ChoiceId(1)), None, None)
            .unwrap()
            .initial(StateId(1))
            .unwrap()
            .build()
            .unwrap();

        let mut flags = truths.clone();
        machine.start(&mut flags).unwrap();
        let outcome = machine.make_transition(&mut flags, TransitionId(1)).unwrap();

        // Branch `i` leads to state `i + 1`; the fallback leads to the last
        // state. The winner must be the first true flag.
        let expected = truths
            .iter()
            .position(|&holds| holds)
            .map_or(StateId(k + 2), |index| StateId(index as u16 + 2));
        prop_assert_eq!(outcome, TransitionOutcome::Taken { to: expected });
    }

    #[test]
    fn resolution_cost_is_bounded_by_the_chain_limit(limit in 0u16..6) {
        // Three chained choices resolved fallback to fallback need three hops.
        let mut machine = StateMachineBuilder::<()>::new(Shape {
            states: 2,
            choices: 3,
            transitions: 1,
            ..Shape::default()
        })
        .add_state(StateId(1), None, None).unwrap()
        .add_state(StateId(2), None, None).unwrap()
        .add_choice(ChoiceId(1), Vec::new(), Target::Choice(ChoiceId(2))).unwrap()
        .add_choice(ChoiceId(2), Vec::new(), Target::Choice(ChoiceId(3))).unwrap()
        .add_choice(ChoiceId(3), Vec::new(), Target::State(StateId(2))).unwrap()
        .add_transition(TransitionId(1), StateId(1), Target::Choice(ChoiceId(1)), None, None).unwrap()
        .initial(StateId(1)).unwrap()
        .chain_limit(limit)
        .build().unwrap();

        let mut ctx = ();
        machine.start(&mut ctx).unwrap();
        let result = machine.make_transition(&mut ctx, TransitionId(1));

        if limit >= 3 {
            prop_assert_eq!(result.unwrap(), TransitionOutcome::Taken { to: StateId(2) });
        } else {
            prop_assert_eq!(result.unwrap_err(), RuntimeError::ChainLimitExceeded { limit });
            prop_assert_eq!(machine.current_state(), Some(StateId(1)));
        }
    }

    #[test]
    fn single_holes_are_reported_precisely(n in 1u16..6, pick in 0u16..64) {
        let hole = pick % n + 1;
        let mut builder = StateMachineBuilder::<()>::new(Shape {
            states: n,
            ..Shape::default()
        });
        for i in 1..=n {
            if i != hole {
                builder = builder.add_state(StateId(i), None, None).unwrap();
            }
        }
        let result = builder.initial(StateId(1)).unwrap().build();

        prop_assert_eq!(result.err(), Some(ConfigError::UndefinedState(StateId(hole))));
    }
}
