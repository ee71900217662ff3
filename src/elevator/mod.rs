pub mod engine;
pub mod fsm;
pub mod timer;

pub use engine::{Callback, Elevator};
pub use timer::{Sleeper, ThreadSleeper};
