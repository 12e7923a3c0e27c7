//! Coolant Valve Control
//!
//! A flat machine with a choice pseudo-state: one inspect request routes
//! the valve to open, throttled, or closed depending on the pressure
//! measured at the moment of the request.
//!
//! Key concepts:
//! - Guarded transitions over a host context
//! - Choice pseudo-states with ordered branches and a fallback
//! - Symbolic ids via the `ids!` macro
//!
//! Run with: cargo run --example valve_control

use detent::{ids, Branch, Shape, StateId, StateMachineBuilder, Target};

ids! {
    state {
        STANDBY = 1,
        OPEN = 2,
        THROTTLED = 3,
        CLOSED = 4,
    }
    choice {
        ROUTE_BY_PRESSURE = 1,
    }
    transition {
        INSPECT = 1,
        RESET_FROM_OPEN = 2,
        RESET_FROM_THROTTLED = 3,
        RESET_FROM_CLOSED = 4,
    }
    action {
        COUNT_OPEN = 1,
        COUNT_THROTTLED = 2,
        COUNT_CLOSED = 3,
    }
    guard {
        OVERPRESSURE = 1,
        NOMINAL = 2,
    }
}

#[derive(Default)]
struct Plant {
    pressure: u32,
    opened: u32,
    throttled: u32,
    closed: u32,
}

fn state_name(state: StateId) -> &'static str {
    match state {
        STANDBY => "standby",
        OPEN => "open",
        THROTTLED => "throttled",
        CLOSED => "closed",
        _ => "unknown",
    }
}

fn main() {
    println!("=== Coolant Valve Control ===\n");

    let mut machine = StateMachineBuilder::new(Shape {
        states: 4,
        choices: 1,
        transitions: 4,
        actions: 3,
        guards: 2,
    })
    .add_guard(OVERPRESSURE, |plant: &Plant| plant.pressure >= 80)
    .unwrap()
    .add_guard(NOMINAL, |plant: &Plant| plant.pressure >= 30)
    .unwrap()
    .add_action(COUNT_OPEN, |plant: &mut Plant| plant.opened += 1)
    .unwrap()
    .add_action(COUNT_THROTTLED, |plant: &mut Plant| plant.throttled += 1)
    .unwrap()
    .add_action(COUNT_CLOSED, |plant: &mut Plant| plant.closed += 1)
    .unwrap()
    .add_state(STANDBY, None, None)
    .unwrap()
    .add_state(OPEN, Some(COUNT_OPEN), None)
    .unwrap()
    .add_state(THROTTLED, Some(COUNT_THROTTLED), None)
    .unwrap()
    .add_state(CLOSED, Some(COUNT_CLOSED), None)
    .unwrap()
    .add_choice(
        ROUTE_BY_PRESSURE,
        vec![
            Branch::new(OVERPRESSURE, Target::State(CLOSED)),
            Branch::new(NOMINAL, Target::State(OPEN)),
        ],
        Target::State(THROTTLED),
    )
    .unwrap()
    .add_transition(INSPECT, STANDBY, Target::Choice(ROUTE_BY_PRESSURE), None, None)
    .unwrap()
    .add_transition(RESET_FROM_OPEN, OPEN, Target::State(STANDBY), None, None)
    .unwrap()
    .add_transition(RESET_FROM_THROTTLED, THROTTLED, Target::State(STANDBY), None, None)
    .unwrap()
    .add_transition(RESET_FROM_CLOSED, CLOSED, Target::State(STANDBY), None, None)
    .unwrap()
    .initial(STANDBY)
    .unwrap()
    .build()
    .unwrap();

    let mut plant = Plant::default();
    machine.start(&mut plant).unwrap();
    println!("valve controller started in {}\n", state_name(STANDBY));

    for pressure in [55, 95, 12] {
        plant.pressure = pressure;
        machine.make_transition(&mut plant, INSPECT).unwrap();
        let resting = machine.current_state().unwrap();
        println!("pressure {:>3} -> {}", pressure, state_name(resting));

        // Each resolved state has its own return transition.
        let reset = match resting {
            OPEN => RESET_FROM_OPEN,
            THROTTLED => RESET_FROM_THROTTLED,
            _ => RESET_FROM_CLOSED,
        };
        machine.make_transition(&mut plant, reset).unwrap();
    }

    println!(
        "\ntotals: opened {}, throttled {}, closed {}",
        plant.opened, plant.throttled, plant.closed
    );
    println!("\n=== Example Complete ===");
}
