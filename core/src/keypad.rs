use crate::constants::KEY_COUNT;
use crate::error::{Error, Result};

/// # Keypad
/// Pressed status of the hexadecimal keys `0..F`.
/// Only the host's input layer presses and releases keys; instructions just look.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Keypad([bool; KEY_COUNT]);

impl Keypad {
    pub fn set(&mut self, key: u8, pressed: bool) -> Result<()> {
        let slot = self.0.get_mut(key as usize).ok_or(Error::InvalidKey(key))?;
        *slot = pressed;
        Ok(())
    }

    pub fn is_pressed(&self, key: u8) -> Result<bool> {
        self.0.get(key as usize).copied().ok_or(Error::InvalidKey(key))
    }

    /// The lowest numbered key that is currently held down
    pub fn first_pressed(&self) -> Option<u8> {
        self.0.iter().position(|pressed| *pressed).map(|key| key as u8)
    }
}
