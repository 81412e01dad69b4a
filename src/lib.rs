//! Stateloom: a passive, synchronous finite state machine engine.
//!
//! Callers declare named states, guarded transitions between them, and
//! actions bound to state entry and exit. The machine then moves forward one
//! step per [`StateMachine::update`] call, each carrying an opaque context
//! value that guards and actions can read.
//!
//! # Core Concepts
//!
//! - **State**: a named configuration, optionally reacting to activation
//!   ([`crate::core::StateLifecycle`]) or clearing memory on reset ([`crate::core::Reset`])
//! - **Transition**: a directed edge whose guard decides whether it fires;
//!   among transitions leaving a state, the first one added wins
//! - **Action**: a callable run when its state becomes or resigns active
//! - **Flags**: named booleans owned by the machine and read by guards
//!
//! # Example
//!
//! ```rust
//! use stateloom::core::{CallbackAction, CallbackTransition, NamedState, OnceTransition};
//! use stateloom::StateMachine;
//!
//! let mut machine = StateMachine::<u32>::new();
//! machine.add_state(NamedState::new("draft")).unwrap();
//! machine.add_state(NamedState::new("prepared")).unwrap();
//!
//! machine.add_transition(OnceTransition::new("draft", "prepared"));
//! machine.add_transition(CallbackTransition::<u32>::new("prepared", "draft", |input| {
//!     Ok(*input.context > 10)
//! }));
//! machine.add_action("prepared", CallbackAction::on_become_active(|_| Ok(true)));
//!
//! assert!(machine.update(&0).unwrap());
//! assert_eq!(machine.current_state_name(), Some("prepared"));
//!
//! assert!(!machine.update(&5).unwrap());
//! assert!(machine.update(&42).unwrap());
//! assert_eq!(machine.current_state_name(), Some("draft"));
//!
//! // The once-transition already fired in this cycle.
//! assert!(!machine.update(&0).unwrap());
//! machine.reset().unwrap();
//! assert!(machine.update(&0).unwrap());
//! ```

pub mod builder;
pub mod core;
pub mod error;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder};
pub use crate::core::{Action, Flags, RunMode, State, Transition, TransitionId};
pub use error::{CallbackError, FsmError};
pub use machine::{MachineSnapshot, StateMachine};
