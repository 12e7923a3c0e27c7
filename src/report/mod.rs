//! Read-only configuration reports.
//!
//! Reports render what was configured, never what is running: dumping a
//! machine before start, mid-flight, and after stop yields the same text.
//! The builder variant accepts half-finished configurations and marks the
//! holes, which is the first thing to reach for when [`build`] rejects a
//! topology.
//!
//! [`build`]: crate::StateMachineBuilder::build

use std::fmt::{self, Write};

use crate::builder::StateMachineBuilder;
use crate::core::{ActionId, ChoiceDef, GuardId, Shape, StateDef, Target, TransitionDef};
use crate::engine::StateMachine;

/// Render the full configuration of a built machine, one table row per
/// line. Embedded machines are marked but not expanded; see
/// [`write_config_rec`] for the deep version.
pub fn write_config<C, W: Write>(machine: &StateMachine<C>, out: &mut W) -> fmt::Result {
    let topology = machine.topology();
    write_shape_line(out, "machine", topology.shape())?;
    writeln!(out, "initial state: {}", topology.initial())?;
    for state in topology.states() {
        write_state_line(out, state, machine.embedded(state.id).is_some())?;
    }
    for choice in topology.choices() {
        write_choice_line(out, choice)?;
    }
    for transition in topology.transitions() {
        write_transition_line(out, transition)?;
    }
    Ok(())
}

/// Render a machine and, after it, every embedded machine in state order,
/// recursively.
pub fn write_config_rec<C, W: Write>(machine: &StateMachine<C>, out: &mut W) -> fmt::Result {
    write_config(machine, out)?;
    for state in machine.topology().states() {
        if let Some(embedded) = machine.embedded(state.id) {
            writeln!(out, "machine embedded in state {}:", state.id)?;
            write_config_rec(embedded, out)?;
        }
    }
    Ok(())
}

/// Render a configuration still in the builder, marking undefined slots.
pub fn write_builder_config<C, W: Write>(
    builder: &StateMachineBuilder<C>,
    out: &mut W,
) -> fmt::Result {
    write_shape_line(out, "machine under configuration", builder.shape)?;
    match builder.initial {
        Some(state) => writeln!(out, "initial state: {state}")?,
        None => writeln!(out, "initial state: undefined")?,
    }
    for (index, slot) in builder.states.iter().enumerate() {
        match slot {
            Some(state) => write_state_line(out, state, builder.embedded[index].is_some())?,
            None => writeln!(out, "state {}: undefined", index + 1)?,
        }
    }
    for (index, slot) in builder.choices.iter().enumerate() {
        match slot {
            Some(choice) => write_choice_line(out, choice)?,
            None => writeln!(out, "choice {}: undefined", index + 1)?,
        }
    }
    for (index, slot) in builder.transitions.iter().enumerate() {
        match slot {
            Some(transition) => write_transition_line(out, transition)?,
            None => writeln!(out, "transition {}: undefined", index + 1)?,
        }
    }
    writeln!(
        out,
        "actions registered: {}/{}",
        count_defined(&builder.actions),
        builder.shape.actions
    )?;
    writeln!(
        out,
        "guards registered: {}/{}",
        count_defined(&builder.guards),
        builder.shape.guards
    )?;
    Ok(())
}

fn write_shape_line<W: Write>(out: &mut W, label: &str, shape: Shape) -> fmt::Result {
    writeln!(
        out,
        "{label}: {} states, {} choice pseudo-states, {} transitions, {} actions, {} guards",
        shape.states, shape.choices, shape.transitions, shape.actions, shape.guards
    )
}

fn write_state_line<W: Write>(out: &mut W, state: &StateDef, composite: bool) -> fmt::Result {
    write!(out, "state {}: entry ", state.id)?;
    write_opt_action(out, state.entry)?;
    write!(out, ", exit ")?;
    write_opt_action(out, state.exit)?;
    if composite {
        write!(out, ", composite")?;
    }
    writeln!(out)
}

fn write_choice_line<W: Write>(out: &mut W, choice: &ChoiceDef) -> fmt::Result {
    write!(out, "choice {}:", choice.id)?;
    for branch in &choice.branches {
        write!(out, " branch (guard {} -> ", branch.guard)?;
        write_target(out, branch.target)?;
        write!(out, "),")?;
    }
    write!(out, " fallback -> ")?;
    write_target(out, choice.fallback)?;
    writeln!(out)
}

fn write_transition_line<W: Write>(out: &mut W, transition: &TransitionDef) -> fmt::Result {
    write!(out, "transition {}: state {} -> ", transition.id, transition.source)?;
    write_target(out, transition.target)?;
    write!(out, ", ")?;
    write_opt_guard(out, transition.guard)?;
    write!(out, ", ")?;
    write_opt_action(out, transition.action)?;
    writeln!(out)
}

fn write_target<W: Write>(out: &mut W, target: Target) -> fmt::Result {
    match target {
        Target::State(id) => write!(out, "state {id}"),
        Target::Choice(id) => write!(out, "choice {id}"),
    }
}

fn write_opt_action<W: Write>(out: &mut W, action: Option<ActionId>) -> fmt::Result {
    match action {
        Some(id) => write!(out, "action {id}"),
        None => write!(out, "action none"),
    }
}

fn write_opt_guard<W: Write>(out: &mut W, guard: Option<GuardId>) -> fmt::Result {
    match guard {
        Some(id) => write!(out, "guard {id}"),
        None => write!(out, "guard none"),
    }
}

fn count_defined<T>(slots: &[Option<T>]) -> usize {
    slots.iter().filter(|slot| slot.is_some()).count()
}
