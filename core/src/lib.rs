pub use chip8::Chip8;
pub use clock::{Clock, Ticks};
pub use config::{Config, Quirks, UnknownOpcodePolicy};
pub use constants::CLOCK_SPEED;
pub use error::{Error, Result};
pub use events::{Event, EventSink, NullSink, TracingSink};
pub use frame::FrameBuffer;
pub use instruction::Instruction;
pub use opcode::Opcode;

mod chip8;
mod clock;
mod config;
pub mod constants;
mod error;
mod events;
mod frame;
mod instruction;
pub mod keypad;
pub mod memory;
mod opcode;
mod operations;
pub mod stack;
pub mod state;
pub mod timers;
