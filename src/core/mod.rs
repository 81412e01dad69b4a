//! Core types shared by every machine.
//!
//! This module contains the vocabulary the engine is driven by:
//! - States and their optional capabilities
//! - Transitions, their guard inputs and the built-in guard kinds
//! - Actions bound to state entry and exit
//! - The flag table read by flag-guarded transitions

mod action;
mod flags;
mod guard;
mod state;
mod transition;

pub use action::{Action, ActionFn, CallbackAction, RunMode};
pub use flags::Flags;
pub use guard::{
    AlwaysTransition, CallbackTransition, FlagTransition, GuardFn, LoopTransition, OnceTransition,
};
pub use state::{NamedState, Reset, State, StateLifecycle};
pub use transition::{GuardInput, Transition, TransitionId};
