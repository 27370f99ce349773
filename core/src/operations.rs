use rand::RngCore;
use tracing::debug;

use crate::config::Quirks;
use crate::constants::{FLAG, GLYPH_SIZE, SPRITE_SHEET_START};
use crate::error::{Error, Result};
use crate::instruction::Instruction;
use crate::state::State;

/// Applies a single instruction to `state`.
///
/// Every operation advances the program counter itself. An operation that fails
/// leaves `state` exactly as it found it.
pub fn execute(
    instruction: Instruction,
    state: &mut State,
    rng: &mut dyn RngCore,
    quirks: &Quirks,
) -> Result<()> {
    use Instruction::*;

    let v = state.v;
    let r = |x: u8| v[x as usize];

    match instruction {
        Sys { addr } => sys(state, addr),
        Clr => clr(state),
        Rts => rts(state, quirks)?,
        Jump { addr } => jump(state, addr),
        Call { addr } => call(state, addr)?,
        Ske { x, kk } => skip_if(state, r(x) == kk),
        Skne { x, kk } => skip_if(state, r(x) != kk),
        Skre { x, y } => skip_if(state, r(x) == r(y)),
        Load { x, kk } => load(state, x, kk),
        Add { x, kk } => add(state, x, kk),
        Move { x, y } => alu(state, x, r(y)),
        Or { x, y } => alu(state, x, r(x) | r(y)),
        And { x, y } => alu(state, x, r(x) & r(y)),
        Xor { x, y } => alu(state, x, r(x) ^ r(y)),
        Addr { x, y } => addr(state, x, y),
        Sub { x, y } => sub(state, x, y),
        Shr { x, y } => shr(state, x, y, quirks),
        Subn { x, y } => subn(state, x, y),
        Shl { x, y } => shl(state, x, y, quirks),
        Skrne { x, y } => skip_if(state, r(x) != r(y)),
        LoadI { addr } => loadi(state, addr),
        JumpV0 { addr } => jumpi(state, addr),
        Rand { x, kk } => rand(state, x, kk, rng),
        Draw { x, y, n } => draw(state, x, y, n)?,
        Skpr { x } => skpr(state, x)?,
        Skup { x } => skup(state, x)?,
        MoveDelay { x } => moved(state, x),
        KeyWait { x } => keyd(state, x),
        LoadDelay { x } => loads(state, x),
        LoadSound { x } => ld(state, x),
        AddI { x } => addi(state, x),
        LoadSprite { x } => ldspr(state, x),
        Bcd { x } => bcd(state, x)?,
        Store { x } => stor(state, x)?,
        Read { x } => read(state, x)?,
    }
    Ok(())
}

fn reg(state: &State, x: u8) -> u8 {
    state.v[x as usize]
}

fn advance(state: &mut State) {
    state.pc += 0x2;
}

/// if condition then skip the next instruction
fn skip_if(state: &mut State, condition: bool) {
    state.pc += if condition { 0x4 } else { 0x2 };
}

/// Machine code routines don't exist here
fn sys(state: &mut State, addr: u16) {
    debug!("ignoring SYS {:#05X}", addr);
    advance(state);
}

/// clear
fn clr(state: &mut State) {
    state.frame_buffer.clear();
    state.draw_flag = true;
    advance(state);
}

/// PC = STACK.pop() (+ 2)
fn rts(state: &mut State, quirks: &Quirks) -> Result<()> {
    let pc = state.pc;
    let address = state.stack.pop().ok_or(Error::StackUnderflow { pc })?;
    state.pc = if quirks.return_skips_next {
        address + 0x2
    } else {
        address
    };
    Ok(())
}

/// PC = addr
fn jump(state: &mut State, addr: u16) {
    state.pc = addr;
}

/// STACK.push(PC + 2); PC = addr
fn call(state: &mut State, addr: u16) -> Result<()> {
    let pc = state.pc;
    state
        .stack
        .push(pc + 0x2)
        .ok_or(Error::StackOverflow { pc })?;
    state.pc = addr;
    Ok(())
}

/// Vx = kk
fn load(state: &mut State, x: u8, kk: u8) {
    state.v[x as usize] = kk;
    advance(state);
}

/// Vx += kk
/// Add kk to Vx; allow for overflow but implicitly drop it
fn add(state: &mut State, x: u8, kk: u8) {
    state.v[x as usize] = reg(state, x).wrapping_add(kk);
    advance(state);
}

/// Vx = value for the flagless register to register ops
fn alu(state: &mut State, x: u8, value: u8) {
    state.v[x as usize] = value;
    advance(state);
}

/// Writes the flag first so a result landing in VF wins
fn flagged(state: &mut State, x: u8, value: u8, flag: bool) {
    state.v[FLAG] = u8::from(flag);
    state.v[x as usize] = value;
    advance(state);
}

/// Vx += Vy; VF = overflow
fn addr(state: &mut State, x: u8, y: u8) {
    let (res, over) = reg(state, x).overflowing_add(reg(state, y));
    flagged(state, x, res, over);
}

/// Vx -= Vy; VF = !underflow
fn sub(state: &mut State, x: u8, y: u8) {
    let (res, under) = reg(state, x).overflowing_sub(reg(state, y));
    flagged(state, x, res, !under);
}

/// Vx = Vy - Vx; VF = !underflow
fn subn(state: &mut State, x: u8, y: u8) {
    let (res, under) = reg(state, y).overflowing_sub(reg(state, x));
    flagged(state, x, res, !under);
}

fn shift_source(state: &State, x: u8, y: u8, quirks: &Quirks) -> u8 {
    if quirks.shift_uses_vy {
        reg(state, y)
    } else {
        reg(state, x)
    }
}

/// Vx >>= 1; VF = lsb
fn shr(state: &mut State, x: u8, y: u8, quirks: &Quirks) {
    let source = shift_source(state, x, y, quirks);
    flagged(state, x, source >> 1, source & 0x1 == 0x1);
}

/// Vx <<= 1; VF = msb
fn shl(state: &mut State, x: u8, y: u8, quirks: &Quirks) {
    let source = shift_source(state, x, y, quirks);
    flagged(state, x, source << 1, source & 0x80 == 0x80);
}

/// I = addr
fn loadi(state: &mut State, addr: u16) {
    state.i = addr;
    advance(state);
}

/// PC = V0 + addr
fn jumpi(state: &mut State, addr: u16) {
    state.pc = u16::from(state.v[0x0]) + addr;
}

/// Vx = rand_byte & kk
fn rand(state: &mut State, x: u8, kk: u8, rng: &mut dyn RngCore) {
    let rand_byte = rng.next_u32() as u8;
    state.v[x as usize] = rand_byte & kk;
    advance(state);
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels are erased
fn draw(state: &mut State, x: u8, y: u8, n: u8) -> Result<()> {
    let (x, y) = (reg(state, x) as usize, reg(state, y) as usize);
    let sprite = state.memory.slice(state.i, n as usize)?;
    let collision = state.frame_buffer.draw_sprite(x, y, sprite);
    state.v[FLAG] = u8::from(collision);
    state.draw_flag = true;
    advance(state);
    Ok(())
}

/// if Vx.pressed then skip
fn skpr(state: &mut State, x: u8) -> Result<()> {
    let pressed = state.keypad.is_pressed(reg(state, x))?;
    skip_if(state, pressed);
    Ok(())
}

/// if !Vx.pressed then skip
fn skup(state: &mut State, x: u8) -> Result<()> {
    let pressed = state.keypad.is_pressed(reg(state, x))?;
    skip_if(state, !pressed);
    Ok(())
}

/// Vx = DT
fn moved(state: &mut State, x: u8) {
    state.v[x as usize] = state.timers.delay;
    advance(state);
}

/// await keypress for Vx
/// Stays on this instruction until some key is held; the lowest numbered one wins
fn keyd(state: &mut State, x: u8) {
    if let Some(key) = state.keypad.first_pressed() {
        state.v[x as usize] = key;
        advance(state);
    }
}

/// DT = Vx
fn loads(state: &mut State, x: u8) {
    state.timers.delay = reg(state, x);
    advance(state);
}

/// ST = Vx
fn ld(state: &mut State, x: u8) {
    state.timers.sound = reg(state, x);
    advance(state);
}

/// I += Vx; VF = I > 0xFFF
fn addi(state: &mut State, x: u8) {
    let i = state.i.wrapping_add(u16::from(reg(state, x)));
    state.v[FLAG] = u8::from(i > 0x0FFF);
    state.i = i;
    advance(state);
}

/// I = Vx * 5
/// Set I to the memory address of the sprite for the low nibble of Vx
/// See constants::SPRITE_SHEET for more details
fn ldspr(state: &mut State, x: u8) {
    let digit = u16::from(reg(state, x) & 0xF);
    state.i = SPRITE_SHEET_START + digit * GLYPH_SIZE;
    advance(state);
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
fn bcd(state: &mut State, x: u8) -> Result<()> {
    let value = reg(state, x);
    state
        .memory
        .slice_mut(state.i, 3)?
        .copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
    advance(state);
    Ok(())
}

/// mem[I..=I+x] = V0..=Vx; I += x + 1
fn stor(state: &mut State, x: u8) -> Result<()> {
    let count = x as usize + 1;
    state
        .memory
        .slice_mut(state.i, count)?
        .copy_from_slice(&state.v[..count]);
    state.i = state.i.wrapping_add(count as u16);
    advance(state);
    Ok(())
}

/// V0..=Vx = mem[I..=I+x]; I += x + 1
fn read(state: &mut State, x: u8) -> Result<()> {
    let count = x as usize + 1;
    let bytes = state.memory.slice(state.i, count)?;
    state.v[..count].copy_from_slice(bytes);
    state.i = state.i.wrapping_add(count as u16);
    advance(state);
    Ok(())
}
