/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::io;
use thiserror::Error;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::EventKind;

/***************************************/
/*            Error types              */
/***************************************/

/// Errors raised by the elevator engine.
#[derive(Error, Debug)]
pub enum ElevatorError {
    /// Action or event name the elevator does not know. Displays as the bare name.
    #[error("{0}")]
    UnsupportedAction(String),

    #[error("Invalid elevator parameter {name}: {value}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("Elevator control loop is already running")]
    AlreadyRunning,

    #[error("Callback for {event} at floor {floor} failed: {source}")]
    Callback {
        event: EventKind,
        floor: i32,
        #[source]
        source: io::Error,
    },

    #[error("Failed to spawn elevator thread: {0}")]
    Spawn(#[source] io::Error),
}

/// Errors raised while loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Read(#[from] io::Error),

    #[error("Failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid floor range in configuration: min={min}, max={max}")]
    InvalidFloorRange { min: u32, max: u32 },

    #[error("Invalid idle timeout in configuration: {0} ms, must be at least 1")]
    InvalidIdleTimeout(u64),
}

/// Errors for a rejected input line. Never reaches the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Wrong input format. Expected: action_name floor_number")]
    Format,

    #[error("Wrong floors number: min={min}, max={max}")]
    FloorOutOfRange { min: u32, max: u32 },
}
