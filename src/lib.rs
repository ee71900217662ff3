//! Simulation of a single building elevator.
//!
//! The `elevator` module holds the engine: a request queue, an observer table
//! and a control loop running on its own thread. `cli` is the line-oriented
//! shell the `elevator` binary puts around it.

/* Modules */
pub mod cli;
pub mod config;
pub mod elevator;
pub mod shared;

pub use config::{CallbackFailure, Config, ElevatorParams, EngineConfig};
pub use elevator::Elevator;
pub use shared::{Direction, ElevatorError, ElevatorState, EventKind, RequestSource};
