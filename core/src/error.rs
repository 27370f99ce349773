use thiserror::Error;

use crate::opcode::Opcode;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unable to read ROM: {0}")]
    Io(#[from] std::io::Error),

    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("memory access out of bounds at {address:#06X} (length {len})")]
    MemoryOutOfBounds { address: usize, len: usize },

    #[error("stack overflow calling from {pc:#06X}")]
    StackOverflow { pc: u16 },

    #[error("stack underflow returning from {pc:#06X}")]
    StackUnderflow { pc: u16 },

    #[error("unknown opcode {opcode} at {pc:#06X}")]
    UnknownOpcode { pc: u16, opcode: Opcode },

    #[error("key {0:#X} is not on the keypad")]
    InvalidKey(u8),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
