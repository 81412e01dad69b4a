//! The state machine engine.
//!
//! Three stores sit behind [`StateMachine`]:
//!
//! - **Registry**: named states, the initial state and the current state
//! - **Graph**: transitions in an arena, indexed by source and by destination
//! - **Action table**: per-state action lists for entry and exit
//!
//! The machine is passive. Each [`StateMachine::update`] call evaluates the
//! transitions leaving the current state once, against one context value.

mod actions;
mod engine;
mod graph;
mod registry;

pub use engine::{MachineSnapshot, StateMachine, TransitionSnapshot};
