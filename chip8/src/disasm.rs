use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;

use octet_core::constants::{MAX_ROM_SIZE, PROGRAM_START};
use octet_core::{Instruction, Opcode};

/// Prints one line per 16-bit word of a ROM
pub fn disasm(rom: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(rom).with_context(|| format!("unable to read {}", rom.display()))?;
    if bytes.len() > MAX_ROM_SIZE {
        anyhow::bail!(
            "{} is {} bytes, max size is {} bytes",
            rom.display(),
            bytes.len(),
            MAX_ROM_SIZE
        );
    }
    print!("{}", listing(&bytes));
    Ok(())
}

/// `address  opcode  mnemonic` for each word, as if loaded at `PROGRAM_START`.
/// A trailing odd byte is listed as a half word.
fn listing(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (n, word) in bytes.chunks(2).enumerate() {
        let address = PROGRAM_START as usize + n * 2;
        match word {
            [high, low] => {
                let opcode = Opcode::from_bytes(*high, *low);
                let mnemonic = Instruction::decode(opcode)
                    .map(|instruction| instruction.to_string())
                    .unwrap_or_else(|| "???".to_string());
                let _ = writeln!(out, "{:#05X}  {}  {}", address, opcode, mnemonic);
            }
            [high, ..] => {
                let _ = writeln!(out, "{:#05X}  {:#04X}", address, high);
            }
            [] => {}
        }
    }
    out
}
