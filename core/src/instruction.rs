use std::fmt;

use crate::opcode::Opcode;

/// A decoded Chip-8 instruction and its operands.
///
/// `x` and `y` name registers Vx and Vy, `kk` is an immediate byte,
/// `addr` a 12-bit address and `n` a 4-bit immediate.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// 0nnn: call a machine routine; ignored
    Sys { addr: u16 },
    /// 00E0: clear the display
    Clr,
    /// 00EE: return from a subroutine
    Rts,
    /// 1nnn: PC = addr
    Jump { addr: u16 },
    /// 2nnn: STACK.push(PC + 2); PC = addr
    Call { addr: u16 },
    /// 3xkk: skip if Vx == kk
    Ske { x: u8, kk: u8 },
    /// 4xkk: skip if Vx != kk
    Skne { x: u8, kk: u8 },
    /// 5xy0: skip if Vx == Vy
    Skre { x: u8, y: u8 },
    /// 6xkk: Vx = kk
    Load { x: u8, kk: u8 },
    /// 7xkk: Vx += kk
    Add { x: u8, kk: u8 },
    /// 8xy0: Vx = Vy
    Move { x: u8, y: u8 },
    /// 8xy1: Vx |= Vy
    Or { x: u8, y: u8 },
    /// 8xy2: Vx &= Vy
    And { x: u8, y: u8 },
    /// 8xy3: Vx ^= Vy
    Xor { x: u8, y: u8 },
    /// 8xy4: Vx += Vy; VF = carry
    Addr { x: u8, y: u8 },
    /// 8xy5: Vx -= Vy; VF = !borrow
    Sub { x: u8, y: u8 },
    /// 8xy6: Vx >>= 1; VF = shifted out bit
    Shr { x: u8, y: u8 },
    /// 8xy7: Vx = Vy - Vx; VF = !borrow
    Subn { x: u8, y: u8 },
    /// 8xyE: Vx <<= 1; VF = shifted out bit
    Shl { x: u8, y: u8 },
    /// 9xy0: skip if Vx != Vy
    Skrne { x: u8, y: u8 },
    /// Annn: I = addr
    LoadI { addr: u16 },
    /// Bnnn: PC = V0 + addr
    JumpV0 { addr: u16 },
    /// Cxkk: Vx = random & kk
    Rand { x: u8, kk: u8 },
    /// Dxyn: draw n rows of sprite from I at (Vx, Vy)
    Draw { x: u8, y: u8, n: u8 },
    /// Ex9E: skip if key Vx is pressed
    Skpr { x: u8 },
    /// ExA1: skip if key Vx is not pressed
    Skup { x: u8 },
    /// Fx07: Vx = DT
    MoveDelay { x: u8 },
    /// Fx0A: wait for a key and store it in Vx
    KeyWait { x: u8 },
    /// Fx15: DT = Vx
    LoadDelay { x: u8 },
    /// Fx18: ST = Vx
    LoadSound { x: u8 },
    /// Fx1E: I += Vx; VF = I > 0xFFF
    AddI { x: u8 },
    /// Fx29: I = address of glyph Vx
    LoadSprite { x: u8 },
    /// Fx33: mem[I..I+3] = bcd(Vx)
    Bcd { x: u8 },
    /// Fx55: mem[I..=I+x] = V0..=Vx
    Store { x: u8 },
    /// Fx65: V0..=Vx = mem[I..=I+x]
    Read { x: u8 },
}

impl Instruction {
    /// Selects the Instruction for a given Opcode, if there is one
    pub fn decode(op: Opcode) -> Option<Self> {
        use Instruction::*;

        let (x, y, n, kk, addr) = (op.x(), op.y(), op.n(), op.kk(), op.addr());
        let instruction = match op.nibbles() {
            (0x0, 0x0, 0xE, 0x0) => Clr,
            (0x0, 0x0, 0xE, 0xE) => Rts,
            (0x0, ..) => Sys { addr },
            (0x1, ..) => Jump { addr },
            (0x2, ..) => Call { addr },
            (0x3, ..) => Ske { x, kk },
            (0x4, ..) => Skne { x, kk },
            (0x5, .., 0x0) => Skre { x, y },
            (0x6, ..) => Load { x, kk },
            (0x7, ..) => Add { x, kk },
            (0x8, .., 0x0) => Move { x, y },
            (0x8, .., 0x1) => Or { x, y },
            (0x8, .., 0x2) => And { x, y },
            (0x8, .., 0x3) => Xor { x, y },
            (0x8, .., 0x4) => Addr { x, y },
            (0x8, .., 0x5) => Sub { x, y },
            (0x8, .., 0x6) => Shr { x, y },
            (0x8, .., 0x7) => Subn { x, y },
            (0x8, .., 0xE) => Shl { x, y },
            (0x9, .., 0x0) => Skrne { x, y },
            (0xA, ..) => LoadI { addr },
            (0xB, ..) => JumpV0 { addr },
            (0xC, ..) => Rand { x, kk },
            (0xD, ..) => Draw { x, y, n },
            (0xE, .., 0x9, 0xE) => Skpr { x },
            (0xE, .., 0xA, 0x1) => Skup { x },
            (0xF, .., 0x0, 0x7) => MoveDelay { x },
            (0xF, .., 0x0, 0xA) => KeyWait { x },
            (0xF, .., 0x1, 0x5) => LoadDelay { x },
            (0xF, .., 0x1, 0x8) => LoadSound { x },
            (0xF, .., 0x1, 0xE) => AddI { x },
            (0xF, .., 0x2, 0x9) => LoadSprite { x },
            (0xF, .., 0x3, 0x3) => Bcd { x },
            (0xF, .., 0x5, 0x5) => Store { x },
            (0xF, .., 0x6, 0x5) => Read { x },
            _ => return None,
        };
        Some(instruction)
    }
}

/// Prints conventional assembler mnemonics, e.g. `LD V1, 0x22`
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;

        match *self {
            Sys { addr } => write!(f, "SYS {:#05X}", addr),
            Clr => write!(f, "CLS"),
            Rts => write!(f, "RET"),
            Jump { addr } => write!(f, "JP {:#05X}", addr),
            Call { addr } => write!(f, "CALL {:#05X}", addr),
            Ske { x, kk } => write!(f, "SE V{:X}, {:#04X}", x, kk),
            Skne { x, kk } => write!(f, "SNE V{:X}, {:#04X}", x, kk),
            Skre { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            Load { x, kk } => write!(f, "LD V{:X}, {:#04X}", x, kk),
            Add { x, kk } => write!(f, "ADD V{:X}, {:#04X}", x, kk),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            Addr { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            Shr { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            Subn { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            Shl { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            Skrne { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadI { addr } => write!(f, "LD I, {:#05X}", addr),
            JumpV0 { addr } => write!(f, "JP V0, {:#05X}", addr),
            Rand { x, kk } => write!(f, "RND V{:X}, {:#04X}", x, kk),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            Skpr { x } => write!(f, "SKP V{:X}", x),
            Skup { x } => write!(f, "SKNP V{:X}", x),
            MoveDelay { x } => write!(f, "LD V{:X}, DT", x),
            KeyWait { x } => write!(f, "LD V{:X}, K", x),
            LoadDelay { x } => write!(f, "LD DT, V{:X}", x),
            LoadSound { x } => write!(f, "LD ST, V{:X}", x),
            AddI { x } => write!(f, "ADD I, V{:X}", x),
            LoadSprite { x } => write!(f, "LD F, V{:X}", x),
            Bcd { x } => write!(f, "LD B, V{:X}", x),
            Store { x } => write!(f, "LD [I], V{:X}", x),
            Read { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}
