use crate::constants::PROGRAM_START;
use crate::frame::FrameBuffer;
use crate::keypad::Keypad;
use crate::memory::Memory;
use crate::stack::Stack;
use crate::timers::Timers;

/// A snapshot of the Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry/borrow/collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Timers
/// - 2 8-bit timers (delay & sound)
///
/// ## Memory
/// - 16 level call stack of return addresses
/// - 4096 bytes of addressable memory
/// - 64x32 frame buffer
///     - `draw_flag` is raised whenever it changes and stays up until the display renders it
///
/// ## Input
/// - pressed status of keys 0..F
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub stack: Stack,
    pub timers: Timers,
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub draw_flag: bool,
    pub keypad: Keypad,
}

impl State {
    pub fn new() -> Self {
        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            stack: Stack::default(),
            timers: Timers::default(),
            memory: Memory::new(),
            frame_buffer: FrameBuffer::new(),
            draw_flag: false,
            keypad: Keypad::default(),
        }
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
