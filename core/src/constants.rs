/// Total addressable memory in bytes
pub const MEMORY_SIZE: usize = 4096;

/// ROMs are loaded (and execution starts) at this address.
/// Everything below it is reserved for the interpreter and the sprite sheet.
pub const PROGRAM_START: u16 = 0x200;

/// The largest ROM that fits between `PROGRAM_START` and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Number of return addresses the call stack can hold
pub const STACK_SIZE: usize = 16;

/// Number of keys on the hexadecimal keypad
pub const KEY_COUNT: usize = 16;

/// VF doubles as the carry/borrow/collision flag
pub const FLAG: usize = 0xF;

/// Where the sprite sheet is stored in memory
pub const SPRITE_SHEET_START: u16 = 0x000;

/// Each glyph in the sprite sheet is 5 rows tall
pub const GLYPH_SIZE: u16 = 5;

/// Instructions executed per second unless configured otherwise
pub const CLOCK_SPEED: u32 = 500;

/// The delay and sound timers count down at 60Hz
pub const TIMER_HZ: u32 = 60;

/// How many previous states are kept around for rewinding
pub const MAX_SAVED_STATES: usize = 600;

/// # Sprite sheet
/// Built-in hexadecimal glyphs `0..F`, each 4 pixels wide and 5 pixels tall.
/// Only the high nibble of each row is used.
/// ```text
/// 0xF0  ****
/// 0x90  *  *
/// 0x90  *  *
/// 0x90  *  *
/// 0xF0  ****
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
