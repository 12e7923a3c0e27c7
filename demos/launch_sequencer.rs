//! Launch Sequencer
//!
//! A hierarchical machine: the countdown state owns an embedded machine
//! that powers the vehicle bus while the countdown is live. Entering and
//! leaving the countdown cascades into the embedded machine, so a scrub
//! safes the vehicle without any extra host code.
//!
//! Key concepts:
//! - Guarded transitions gating lifecycle progress
//! - Embedded machines started and stopped with their owner state
//! - Configuration reports for built machines
//! - Structured tracing of engine activity (set RUST_LOG=trace to watch)
//!
//! Run with: cargo run --example launch_sequencer

use detent::{ids, report, Shape, StateId, StateMachineBuilder, Target, TransitionOutcome};

ids! {
    state {
        IDLE = 1,
        COUNTDOWN = 2,
        FLIGHT = 3,
        SCRUBBED = 4,
    }
    transition {
        BEGIN_COUNT = 1,
        LIFTOFF = 2,
        SCRUB = 3,
        RECYCLE = 4,
    }
    action {
        RECORD_COUNT = 1,
        RECORD_FLIGHT = 2,
        RECORD_SCRUB = 3,
    }
    guard {
        RANGE_CLEAR = 1,
        TANKS_FULL = 2,
    }
}

ids! {
    state {
        POWERED = 1,
    }
    action {
        POWER_UP = 1,
        POWER_DOWN = 2,
    }
}

#[derive(Default)]
struct Pad {
    range_clear: bool,
    tanks_full: bool,
    bus_powered: bool,
    events: Vec<&'static str>,
}

fn vehicle_bus() -> detent::StateMachine<Pad> {
    StateMachineBuilder::new(Shape {
        states: 1,
        actions: 2,
        ..Shape::default()
    })
    .add_action(POWER_UP, |pad: &mut Pad| {
        pad.bus_powered = true;
        pad.events.push("vehicle bus powered");
    })
    .unwrap()
    .add_action(POWER_DOWN, |pad: &mut Pad| {
        pad.bus_powered = false;
        pad.events.push("vehicle bus safed");
    })
    .unwrap()
    .add_state(POWERED, Some(POWER_UP), Some(POWER_DOWN))
    .unwrap()
    .initial(POWERED)
    .unwrap()
    .build()
    .unwrap()
}

fn sequencer() -> detent::StateMachine<Pad> {
    StateMachineBuilder::new(Shape {
        states: 4,
        transitions: 4,
        actions: 3,
        guards: 2,
        ..Shape::default()
    })
    .add_guard(RANGE_CLEAR, |pad: &Pad| pad.range_clear)
    .unwrap()
    .add_guard(TANKS_FULL, |pad: &Pad| pad.tanks_full)
    .unwrap()
    .add_action(RECORD_COUNT, |pad: &mut Pad| pad.events.push("countdown running"))
    .unwrap()
    .add_action(RECORD_FLIGHT, |pad: &mut Pad| pad.events.push("liftoff"))
    .unwrap()
    .add_action(RECORD_SCRUB, |pad: &mut Pad| pad.events.push("launch scrubbed"))
    .unwrap()
    .add_state(IDLE, None, None)
    .unwrap()
    .add_state(COUNTDOWN, Some(RECORD_COUNT), None)
    .unwrap()
    .add_state(FLIGHT, Some(RECORD_FLIGHT), None)
    .unwrap()
    .add_state(SCRUBBED, Some(RECORD_SCRUB), None)
    .unwrap()
    .add_transition(BEGIN_COUNT, IDLE, Target::State(COUNTDOWN), Some(RANGE_CLEAR), None)
    .unwrap()
    .add_transition(LIFTOFF, COUNTDOWN, Target::State(FLIGHT), Some(TANKS_FULL), None)
    .unwrap()
    .add_transition(SCRUB, COUNTDOWN, Target::State(SCRUBBED), None, None)
    .unwrap()
    .add_transition(RECYCLE, SCRUBBED, Target::State(IDLE), None, None)
    .unwrap()
    .embed(COUNTDOWN, vehicle_bus())
    .unwrap()
    .initial(IDLE)
    .unwrap()
    .build()
    .unwrap()
}

fn state_name(state: StateId) -> &'static str {
    match state {
        IDLE => "idle",
        COUNTDOWN => "countdown",
        FLIGHT => "flight",
        SCRUBBED => "scrubbed",
        _ => "unknown",
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Launch Sequencer ===\n");

    let mut machine = sequencer();

    let mut config = String::new();
    report::write_config_rec(&machine, &mut config).unwrap();
    println!("configuration:\n{config}");

    let mut pad = Pad::default();
    machine.start(&mut pad).unwrap();
    println!("sequencer started in {}", state_name(IDLE));

    // The range is fouled: the guard holds the request back.
    let outcome = machine.make_transition(&mut pad, BEGIN_COUNT).unwrap();
    assert_eq!(outcome, TransitionOutcome::GuardFailed);
    println!("begin count refused while the range is fouled");

    pad.range_clear = true;
    machine.make_transition(&mut pad, BEGIN_COUNT).unwrap();
    println!(
        "countdown running, vehicle bus powered: {} (substate {:?})",
        pad.bus_powered,
        machine.current_substate()
    );

    // A scrub leaves the countdown, which safes the vehicle bus on the way.
    machine.make_transition(&mut pad, SCRUB).unwrap();
    println!("scrubbed, vehicle bus powered: {}", pad.bus_powered);

    machine.make_transition(&mut pad, RECYCLE).unwrap();
    pad.tanks_full = true;
    machine.make_transition(&mut pad, BEGIN_COUNT).unwrap();
    machine.make_transition(&mut pad, LIFTOFF).unwrap();
    println!("second attempt reaches {}", state_name(machine.current_state().unwrap()));

    println!("\nevent log:");
    for event in &pad.events {
        println!("  {event}");
    }
    println!("\n=== Example Complete ===");
}
