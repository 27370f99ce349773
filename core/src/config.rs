use crate::constants::{CLOCK_SPEED, MAX_SAVED_STATES, TIMER_HZ};

/// What to do when the CPU fetches a word that isn't a Chip-8 instruction
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum UnknownOpcodePolicy {
    /// Report it, leave the program counter where it is, and fail the cycle
    #[default]
    Halt,
    /// Report it and carry on with the next word
    Skip,
}

/// Behaviors that differ between Chip-8 interpreters
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Quirks {
    /// CALL pushes the address after itself and RET resumes 2 bytes past the popped address.
    /// When false RET resumes at the popped address.
    pub return_skips_next: bool,
    /// 8XY6 and 8XYE shift Vy into Vx rather than shifting Vx in place
    pub shift_uses_vy: bool,
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks {
            return_skips_next: true,
            shift_uses_vy: false,
        }
    }
}

/// Settings a `Chip8` is built from
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub cycles_per_second: u32,
    pub timer_hz: u32,
    pub on_unknown_opcode: UnknownOpcodePolicy,
    pub quirks: Quirks,
    /// Seed for RND; drawn from the OS when missing
    pub rng_seed: Option<u64>,
    pub max_saved_states: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cycles_per_second: CLOCK_SPEED,
            timer_hz: TIMER_HZ,
            on_unknown_opcode: UnknownOpcodePolicy::default(),
            quirks: Quirks::default(),
            rng_seed: None,
            max_saved_states: MAX_SAVED_STATES,
        }
    }
}
