use std::io::Read;

use tracing::debug;

use crate::constants::{MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET, SPRITE_SHEET_START};
use crate::error::{Error, Result};
use crate::opcode::Opcode;

/// # Memory
/// 4096 bytes of flat, byte-addressable memory.
///
/// - `0x000..0x050` holds the built-in sprite sheet
/// - `0x050..0x200` is otherwise reserved for the interpreter
/// - `0x200..0x1000` holds the loaded program and its working RAM
///
/// Every access is bounds checked and reported as `Error::MemoryOutOfBounds`
/// rather than panicking.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Memory([u8; MEMORY_SIZE]);

impl Memory {
    /// Zeroed memory with the sprite sheet in place
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let start = SPRITE_SHEET_START as usize;
        bytes[start..start + SPRITE_SHEET.len()].copy_from_slice(&SPRITE_SHEET);
        Memory(bytes)
    }

    pub fn read(&self, address: u16) -> Result<u8> {
        self.slice(address, 1).map(|bytes| bytes[0])
    }

    /// Gets the opcode at `address`; bytes are combined most significant first.
    pub fn fetch(&self, address: u16) -> Result<Opcode> {
        let bytes = self.slice(address, 2)?;
        Ok(Opcode::from_bytes(bytes[0], bytes[1]))
    }

    /// Borrows `len` bytes starting at `address`
    pub fn slice(&self, address: u16, len: usize) -> Result<&[u8]> {
        let range = Self::range(address, len)?;
        Ok(&self.0[range])
    }

    /// Mutably borrows `len` bytes starting at `address`
    pub fn slice_mut(&mut self, address: u16, len: usize) -> Result<&mut [u8]> {
        let range = Self::range(address, len)?;
        Ok(&mut self.0[range])
    }

    /// Copies a ROM into program memory.
    /// Nothing is written if the ROM doesn't fit.
    pub fn load_program(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        self.slice_mut(PROGRAM_START, rom.len())?.copy_from_slice(rom);
        debug!(size = rom.len(), "loaded program at {:#05X}", PROGRAM_START);
        Ok(())
    }

    /// Reads a whole ROM and copies it into program memory.
    ///
    /// # Arguments
    /// * `reader` a source positioned at the start of a ROM
    pub fn load_from(&mut self, reader: &mut dyn Read) -> Result<()> {
        // Read one byte past the limit so oversized ROMs are detected without slurping all of them
        let mut rom = Vec::with_capacity(MAX_ROM_SIZE);
        let size = reader.take(MAX_ROM_SIZE as u64 + 1).read_to_end(&mut rom)?;
        if size > MAX_ROM_SIZE {
            return Err(Error::RomTooLarge {
                size,
                max: MAX_ROM_SIZE,
            });
        }
        self.load_program(&rom)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn range(address: u16, len: usize) -> Result<std::ops::Range<usize>> {
        let start = address as usize;
        match start.checked_add(len) {
            Some(end) if end <= MEMORY_SIZE => Ok(start..end),
            _ => Err(Error::MemoryOutOfBounds {
                address: start,
                len,
            }),
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_sheet_is_loaded() {
        let memory = Memory::new();
        assert_eq!(memory.as_bytes()[0..80], SPRITE_SHEET);
        assert!(memory.as_bytes()[80..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_fetch_combines_bytes() {
        let mut memory = Memory::new();
        memory
            .slice_mut(0x200, 2)
            .unwrap()
            .copy_from_slice(&[0xAA, 0xBB]);
        assert_eq!(memory.fetch(0x200).unwrap(), Opcode(0xAABB));
    }

    #[test]
    fn test_fetch_at_last_byte_is_out_of_bounds() {
        let memory = Memory::new();
        assert!(matches!(
            memory.fetch(0xFFF),
            Err(Error::MemoryOutOfBounds { address: 0xFFF, len: 2 })
        ));
        assert!(memory.fetch(0xFFE).is_ok());
    }

    #[test]
    fn test_read_out_of_bounds() {
        let memory = Memory::new();
        assert!(memory.read(0x1000).is_err());
        assert!(memory.read(0xFFF).is_ok());
    }

    #[test]
    fn test_loads_program() {
        let mut memory = Memory::new();
        memory.load_program(&[0x60, 0x0A, 0x70, 0x05]).unwrap();
        assert_eq!(memory.as_bytes()[0x200..0x204], [0x60, 0x0A, 0x70, 0x05]);
    }

    #[test]
    fn test_loads_program_filling_memory() {
        let mut memory = Memory::new();
        let rom = vec![0xAB; MAX_ROM_SIZE];
        memory.load_program(&rom).unwrap();
        assert_eq!(memory.as_bytes()[0xFFF], 0xAB);
    }

    #[test]
    fn test_rejects_oversized_program() {
        let mut memory = Memory::new();
        let before = memory;
        let rom = vec![0xAB; MAX_ROM_SIZE + 1];
        assert!(matches!(
            memory.load_program(&rom),
            Err(Error::RomTooLarge { size: 3585, max: 3584 })
        ));
        assert_eq!(memory, before);
    }

    #[test]
    fn test_load_from_reader() {
        let mut memory = Memory::new();
        let rom: &[u8] = &[0x00, 0xE0, 0x12, 0x00];
        memory.load_from(&mut &rom[..]).unwrap();
        assert_eq!(memory.as_bytes()[0x200..0x204], [0x00, 0xE0, 0x12, 0x00]);
    }

    #[test]
    fn test_load_from_rejects_oversized_reader() {
        let mut memory = Memory::new();
        let before = memory;
        let rom = vec![0x1; 4096];
        assert!(matches!(
            memory.load_from(&mut &rom[..]),
            Err(Error::RomTooLarge { size: 3585, .. })
        ));
        assert_eq!(memory, before);
    }
}
