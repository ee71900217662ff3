pub mod errors;
pub mod macros;
pub mod structs;

pub use errors::ConfigError;
pub use errors::ElevatorError;
pub use errors::InputError;
pub use structs::Direction;
pub use structs::ElevatorState;
pub use structs::EventKind;
pub use structs::RequestSource;
