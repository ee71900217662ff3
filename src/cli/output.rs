/***************************************/
/*        3rd party libraries          */
/***************************************/
use serde::Serialize;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::{EventKind, InputError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Answer to one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Accepted,
    WrongAction,
    Rejected(InputError),
}

#[derive(Serialize)]
struct EventRecord {
    event: EventKind,
    floor: i32,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum ReplyRecord {
    Ok,
    Error { message: String },
}

impl Reply {
    fn message(&self) -> Option<String> {
        match self {
            Reply::Accepted => None,
            Reply::WrongAction => Some("Wrong action".to_string()),
            Reply::Rejected(e) => Some(e.to_string()),
        }
    }
}

pub fn format_event(format: OutputFormat, event: EventKind, floor: i32) -> io::Result<String> {
    match format {
        OutputFormat::Text => Ok(format!("< {}: {}", floor, event)),
        OutputFormat::Json => Ok(serde_json::to_string(&EventRecord { event, floor })?),
    }
}

pub fn format_reply(format: OutputFormat, reply: &Reply) -> io::Result<String> {
    match (format, reply.message()) {
        (OutputFormat::Text, None) => Ok("< OK".to_string()),
        (OutputFormat::Text, Some(message)) => Ok(format!("< ERROR: {}", message)),
        (OutputFormat::Json, None) => Ok(serde_json::to_string(&ReplyRecord::Ok)?),
        (OutputFormat::Json, Some(message)) => {
            Ok(serde_json::to_string(&ReplyRecord::Error { message })?)
        }
    }
}

/**
 * Writes events and replies as whole lines to a shared sink.
 *
 * Clones share the sink, so the control-loop thread and the input thread can
 * both print without interleaving inside a line.
 */
pub struct Printer<W: Write + Send> {
    format: OutputFormat,
    out: Arc<Mutex<W>>,
}

impl<W: Write + Send> Clone for Printer<W> {
    fn clone(&self) -> Self {
        Printer {
            format: self.format,
            out: Arc::clone(&self.out),
        }
    }
}

impl<W: Write + Send> Printer<W> {
    pub fn new(out: W, format: OutputFormat) -> Printer<W> {
        Printer {
            format,
            out: Arc::new(Mutex::new(out)),
        }
    }

    pub fn event(&self, event: EventKind, floor: i32) -> io::Result<()> {
        let line = format_event(self.format, event, floor)?;
        self.write_line(&line)
    }

    pub fn reply(&self, reply: &Reply) -> io::Result<()> {
        let line = format_reply(self.format, reply)?;
        self.write_line(&line)
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(out, "{}", line)?;
        out.flush()
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_event() {
        let line = format_event(OutputFormat::Text, EventKind::PassedFloor, 3).unwrap();
        assert_eq!(line, "< 3: passed_floor");
    }

    #[test]
    fn test_json_event() {
        let line = format_event(OutputFormat::Json, EventKind::OpenedDoors, 2).unwrap();
        assert_eq!(line, r#"{"event":"opened_doors","floor":2}"#);
    }

    #[test]
    fn test_text_replies() {
        let text = |reply: Reply| format_reply(OutputFormat::Text, &reply).unwrap();

        assert_eq!(text(Reply::Accepted), "< OK");
        assert_eq!(text(Reply::WrongAction), "< ERROR: Wrong action");
        assert_eq!(
            text(Reply::Rejected(InputError::Format)),
            "< ERROR: Wrong input format. Expected: action_name floor_number"
        );
        assert_eq!(
            text(Reply::Rejected(InputError::FloorOutOfRange { min: 1, max: 5 })),
            "< ERROR: Wrong floors number: min=1, max=5"
        );
    }

    #[test]
    fn test_json_replies() {
        let json = |reply: Reply| format_reply(OutputFormat::Json, &reply).unwrap();

        assert_eq!(json(Reply::Accepted), r#"{"status":"ok"}"#);
        assert_eq!(
            json(Reply::WrongAction),
            r#"{"status":"error","message":"Wrong action"}"#
        );
    }

    #[test]
    fn test_printer_clones_share_sink() {
        let printer = Printer::new(Vec::new(), OutputFormat::Text);
        let events = printer.clone();

        events.event(EventKind::ClosedDoors, 4).unwrap();
        printer.reply(&Reply::Accepted).unwrap();

        let out = printer.out.lock().unwrap().clone();
        assert_eq!(String::from_utf8(out).unwrap(), "< 4: closed_doors\n< OK\n");
    }
}
