use std::sync::mpsc::Sender;

use tracing::{info, warn};

use crate::opcode::Opcode;

/// Things the interpreter reports to its host
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The sound timer ran out this tick
    Beep,
    /// A word that doesn't decode to any instruction was fetched
    UnknownOpcode { pc: u16, opcode: Opcode },
}

/// Receives events as they happen
pub trait EventSink {
    fn emit(&mut self, event: Event);
}

/// Logs every event
#[derive(Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: Event) {
        match event {
            Event::Beep => info!("beep"),
            Event::UnknownOpcode { pc, opcode } => {
                warn!(%opcode, "unknown opcode at {:#06X}", pc)
            }
        }
    }
}

/// Drops every event
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: Event) {}
}

/// Forwards events to a channel; a hung up receiver just stops getting them
impl EventSink for Sender<Event> {
    fn emit(&mut self, event: Event) {
        let _ = self.send(event);
    }
}
