use std::collections::VecDeque;
use std::io::Read;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{debug, trace};

use crate::clock::Clock;
use crate::config::{Config, UnknownOpcodePolicy};
use crate::error::{Error, Result};
use crate::events::{Event, EventSink, TracingSink};
use crate::frame::FrameBuffer;
use crate::instruction::Instruction;
use crate::operations;
use crate::state::State;

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `previous_states` for rewinding
///  - a `clock` pacing instructions and timers for hosts that run in real time
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing and reversing the CPU
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
///
/// Randomness and event reporting are injected so a host (or a test) controls both.
pub struct Chip8 {
    state: State,
    previous_states: VecDeque<State>,
    config: Config,
    clock: Clock,
    rng: Box<dyn RngCore>,
    sink: Box<dyn EventSink>,
}

impl Chip8 {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!(?config, "creating chip-8");
        Chip8 {
            state: State::new(),
            previous_states: VecDeque::with_capacity(config.max_saved_states),
            clock: Clock::new(config.cycles_per_second, config.timer_hz),
            config,
            rng: Box::new(rng),
            sink: Box::new(TracingSink),
        }
    }

    /// Replaces where beeps and unknown opcodes are reported; logged by default
    pub fn with_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Replaces the random source used by RND
    pub fn with_rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Load a rom from a source file
    ///
    /// # Arguments
    /// * `reader` a file reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<()> {
        self.state.memory.load_from(reader)
    }

    /// Load a rom that's already in memory
    pub fn load_program(&mut self, rom: &[u8]) -> Result<()> {
        self.state.memory.load_program(rom)
    }

    /// Returns the FrameBuffer if the display should be redrawn
    pub fn get_frame(&self) -> Option<&FrameBuffer> {
        if self.state.draw_flag {
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    pub fn needs_redraw(&self) -> bool {
        self.state.draw_flag
    }

    /// Called by the display once it has rendered the current frame
    pub fn clear_redraw(&mut self) {
        self.state.draw_flag = false;
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) -> Result<()> {
        self.state.keypad.set(key, true)
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) -> Result<()> {
        self.state.keypad.set(key, false)
    }

    /// Advances the CPU by a single instruction without touching the timers
    /// - gets, decodes and executes the next opcode
    /// - saves the state it started from so it can be reversed
    ///
    /// Nothing changes if the instruction fails.
    pub fn step(&mut self) -> Result<()> {
        let pc = self.state.pc;
        let opcode = self.state.memory.fetch(pc)?;
        let previous = self.state;

        match Instruction::decode(opcode) {
            Some(instruction) => {
                trace!(%opcode, %instruction, "executing at {:#06X}", pc);
                operations::execute(
                    instruction,
                    &mut self.state,
                    self.rng.as_mut(),
                    &self.config.quirks,
                )?;
            }
            None => {
                self.sink.emit(Event::UnknownOpcode { pc, opcode });
                match self.config.on_unknown_opcode {
                    UnknownOpcodePolicy::Halt => return Err(Error::UnknownOpcode { pc, opcode }),
                    UnknownOpcodePolicy::Skip => self.state.pc += 0x2,
                }
            }
        }

        self.save_state(previous);
        Ok(())
    }

    /// Decrements the delay and sound timers once, beeping if the sound timer runs out
    pub fn tick_timers(&mut self) {
        if self.state.timers.tick() {
            self.sink.emit(Event::Beep);
        }
    }

    /// Runs one full cycle: a single instruction followed by a single timer tick
    pub fn run_cycle(&mut self) -> Result<()> {
        self.step()?;
        self.tick_timers();
        Ok(())
    }

    /// Runs however many instructions and timer ticks are due after `elapsed` of real time
    pub fn run_for(&mut self, elapsed: Duration) -> Result<()> {
        let ticks = self.clock.advance(elapsed);
        for _ in 0..ticks.cycles {
            self.step()?;
        }
        for _ in 0..ticks.timer_ticks {
            self.tick_timers();
        }
        Ok(())
    }

    /// Reverses the CPU by a single instruction if possible
    /// - if there are previous_states, pops the last one and restores it
    /// - keys stay as the host last set them
    pub fn reverse_cycle(&mut self) {
        if let Some(state) = self.previous_states.pop_front() {
            let keypad = self.state.keypad;
            self.state = State { keypad, ..state };
            debug!(
                pc = self.state.pc,
                remaining = self.previous_states.len(),
                "rewound"
            );
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Puts a state in previous_states
    /// - if there are already `max_saved_states` saved then the oldest is dropped
    fn save_state(&mut self, state: State) {
        if self.config.max_saved_states == 0 {
            return;
        }
        if self.previous_states.len() == self.config.max_saved_states {
            self.previous_states.pop_back();
        }
        self.previous_states.push_front(state);
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{channel, Receiver};

    use super::*;
    use crate::events::NullSink;
    use crate::opcode::Opcode;

    fn chip8_with(config: Config, program: &[u8]) -> (Chip8, Receiver<Event>) {
        let (sender, receiver) = channel();
        let mut chip8 = Chip8::with_config(Config {
            rng_seed: Some(0x8),
            ..config
        })
        .with_sink(sender);
        chip8.load_program(program).unwrap();
        (chip8, receiver)
    }

    fn chip8(program: &[u8]) -> Chip8 {
        chip8_with(Config::default(), program).0
    }

    #[test]
    fn test_step_executes_and_advances() {
        // insert a cls opcode so there's something to do
        let mut chip8 = chip8(&[0x00, 0xE0]);
        chip8.step().unwrap();
        assert_eq!(chip8.state.pc, 0x202);
        assert!(chip8.needs_redraw());
    }

    #[test]
    fn test_step_does_not_tick_timers() {
        let mut chip8 = chip8(&[0x00, 0xE0]);
        chip8.state.timers.delay = 0x5;
        chip8.step().unwrap();
        assert_eq!(chip8.state.timers.delay, 0x5);
    }

    #[test]
    fn test_run_cycle_ticks_timers_once() {
        let mut chip8 = chip8(&[0x00, 0xE0]);
        chip8.state.timers.delay = 0x5;
        chip8.state.timers.sound = 0x5;
        chip8.run_cycle().unwrap();
        assert_eq!(chip8.state.timers.delay, 0x4);
        assert_eq!(chip8.state.timers.sound, 0x4);
    }

    #[test]
    fn test_beeps_when_sound_timer_runs_out() {
        // LD V0, 0x02; LD ST, V0; JP 0x204
        let (mut chip8, events) = chip8_with(Config::default(), &[0x60, 0x02, 0xF0, 0x18, 0x12, 0x04]);
        for _ in 0..4 {
            chip8.run_cycle().unwrap();
        }
        let events: Vec<Event> = events.try_iter().collect();
        assert_eq!(events, [Event::Beep]);
        assert_eq!(chip8.state.timers.sound, 0);
    }

    #[test]
    fn test_unknown_opcode_halts_by_default() {
        let (mut chip8, events) = chip8_with(Config::default(), &[0xFF, 0xFF]);
        let before = chip8.state;
        assert!(matches!(
            chip8.run_cycle(),
            Err(Error::UnknownOpcode { pc: 0x200, opcode: Opcode(0xFFFF) })
        ));
        assert_eq!(chip8.state, before);
        assert_eq!(
            events.try_recv().unwrap(),
            Event::UnknownOpcode {
                pc: 0x200,
                opcode: Opcode(0xFFFF)
            }
        );
    }

    #[test]
    fn test_unknown_opcode_can_be_skipped() {
        let config = Config {
            on_unknown_opcode: UnknownOpcodePolicy::Skip,
            ..Config::default()
        };
        let (mut chip8, events) = chip8_with(config, &[0xFF, 0xFF, 0x61, 0x01]);
        chip8.run_cycle().unwrap();
        chip8.run_cycle().unwrap();
        assert_eq!(chip8.state.pc, 0x204);
        assert_eq!(chip8.state.v[0x1], 0x1);
        assert_eq!(events.try_iter().count(), 1);
    }

    #[test]
    fn test_fetch_past_memory_fails() {
        let mut chip8 = chip8(&[]);
        chip8.state.pc = 0xFFF;
        assert!(matches!(
            chip8.step(),
            Err(Error::MemoryOutOfBounds { address: 0xFFF, .. })
        ));
    }

    #[test]
    fn test_failed_cycle_skips_timer_tick() {
        // RET with an empty stack
        let mut chip8 = chip8(&[0x00, 0xEE]);
        chip8.state.timers.delay = 0x3;
        assert!(chip8.run_cycle().is_err());
        assert_eq!(chip8.state.timers.delay, 0x3);
    }

    #[test]
    fn test_waits_for_key_then_continues() {
        // LD V3, K
        let mut chip8 = chip8(&[0xF3, 0x0A]);
        chip8.run_cycle().unwrap();
        chip8.run_cycle().unwrap();
        assert_eq!(chip8.state.pc, 0x200);
        chip8.key_press(0xB).unwrap();
        chip8.run_cycle().unwrap();
        assert_eq!(chip8.state.pc, 0x202);
        assert_eq!(chip8.state.v[0x3], 0xB);
    }

    #[test]
    fn test_rejects_invalid_keys() {
        let mut chip8 = chip8(&[]);
        assert!(matches!(chip8.key_press(0x10), Err(Error::InvalidKey(0x10))));
        assert!(chip8.key_release(0x0F).is_ok());
    }

    #[test]
    fn test_get_frame_until_cleared() {
        let mut chip8 = chip8(&[0x00, 0xE0]);
        assert!(chip8.get_frame().is_none());
        chip8.step().unwrap();
        assert!(chip8.get_frame().is_some());
        chip8.clear_redraw();
        assert!(chip8.get_frame().is_none());
    }

    #[test]
    fn test_run_for_paces_cycles_and_timers() {
        // ADD V0, 0x01; JP 0x200
        let mut chip8 = chip8(&[0x70, 0x01, 0x12, 0x00]);
        chip8.state.timers.delay = 0xFF;
        chip8.run_for(Duration::from_millis(100)).unwrap();
        // 50 instructions at 500Hz, half of them adds
        assert_eq!(chip8.state.v[0x0], 25);
        // 6 ticks at 60Hz
        assert_eq!(chip8.state.timers.delay, 0xFF - 6);
    }

    #[test]
    fn test_reverse_restores_previous_state() {
        let mut chip8 = chip8(&[0x61, 0x11, 0x62, 0x22]);
        chip8.step().unwrap();
        chip8.step().unwrap();
        chip8.reverse_cycle();
        assert_eq!(chip8.state.pc, 0x202);
        assert_eq!(chip8.state.v[0x2], 0x0);
        chip8.reverse_cycle();
        assert_eq!(chip8.state.pc, 0x200);
        assert_eq!(chip8.state.v[0x1], 0x0);
        // Nothing left to rewind
        chip8.reverse_cycle();
        assert_eq!(chip8.state.pc, 0x200);
    }

    #[test]
    fn test_reverse_keeps_keypad() {
        let mut chip8 = chip8(&[0x61, 0x11]);
        chip8.step().unwrap();
        chip8.key_press(0x4).unwrap();
        chip8.reverse_cycle();
        assert!(chip8.state.keypad.is_pressed(0x4).unwrap());
    }

    #[test]
    fn test_chip8_saves_state() {
        let mut chip8 = chip8(&[]);
        chip8.save_state(chip8.state);
        assert_eq!(chip8.previous_states.len(), 1);
    }

    #[test]
    fn test_chip8_drops_old_saved_states() {
        let config = Config {
            max_saved_states: 4,
            ..Config::default()
        };
        let (mut chip8, _) = chip8_with(config, &[]);
        for _ in 0..4 {
            chip8.save_state(chip8.state);
        }
        assert_eq!(chip8.previous_states.len(), 4);
        chip8.save_state(chip8.state);
        assert_eq!(chip8.previous_states.len(), 4);
    }

    #[test]
    fn test_seeded_chips_agree() {
        // RND V0, 0xFF
        let mut a = chip8(&[0xC0, 0xFF]);
        let mut b = chip8(&[0xC0, 0xFF]);
        a.step().unwrap();
        b.step().unwrap();
        assert_eq!(a.state.v[0x0], b.state.v[0x0]);
    }

    #[test]
    fn test_with_rng_overrides_random_source() {
        struct Fixed;
        impl RngCore for Fixed {
            fn next_u32(&mut self) -> u32 {
                0xAB
            }
            fn next_u64(&mut self) -> u64 {
                0xAB
            }
            fn fill_bytes(&mut self, dest: &mut [u8]) {
                dest.fill(0xAB)
            }
            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
                dest.fill(0xAB);
                Ok(())
            }
        }
        let mut chip8 = Chip8::new().with_sink(NullSink).with_rng(Fixed);
        chip8.load_program(&[0xC0, 0x0F]).unwrap();
        chip8.step().unwrap();
        assert_eq!(chip8.state.v[0x0], 0x0B);
    }
}
