pub mod args;
pub mod input;
pub mod output;

pub use args::Args;
pub use output::{OutputFormat, Printer, Reply};

use crate::elevator::Elevator;
use log::debug;

/// Parses one input line and hands it to the elevator. Every line gets exactly one reply.
pub fn handle_line(elevator: &Elevator, line: &str) -> Reply {
    let request = match input::parse_line(line, elevator.params().n_floors) {
        Ok(request) => request,
        Err(e) => {
            debug!("Rejected input {:?}: {}", line, e);
            return Reply::Rejected(e);
        }
    };

    match elevator.perform(&request.action, request.floor) {
        Ok(()) => Reply::Accepted,
        Err(e) => {
            debug!("Rejected action {:?}: {}", request.action, e);
            Reply::WrongAction
        }
    }
}
