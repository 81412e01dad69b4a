//! Builder API for ergonomic state machine construction.
//!
//! The machine itself validates lazily: an unknown initial state only fails
//! at the next `reset`. The builder checks the whole definition up front and
//! reports the first problem from [`MachineBuilder::build`].

pub mod error;
pub mod machine;

pub use error::BuildError;
pub use machine::MachineBuilder;
