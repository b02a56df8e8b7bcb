use log::debug;
use rand::Rng;

use crate::constants::{
    ADDRESS_MASK, FLAG_REGISTER as VF, FONT_GLYPH_SIZE, FONT_START, STACK_DEPTH,
};
use crate::cpu::Cpu;
use crate::error::{Error, Result};
use crate::instruction::Instruction;
use crate::state::State;

/// Rows in the tallest sprite `Dxyn` can draw.
const MAX_SPRITE_ROWS: usize = 15;

impl Instruction {
    /// Applies the instruction to `state`.
    ///
    /// Each handler owns the program counter: it advances by 2, skips the next
    /// instruction, or replaces it outright. A failing instruction changes nothing.
    pub(crate) fn execute(self, state: &mut State) -> Result<()> {
        match self {
            Instruction::Sys { .. } => next(&mut state.cpu),
            Instruction::Cls => clr(state),
            Instruction::Ret => rts(&mut state.cpu)?,
            Instruction::Jump { addr } => jump(&mut state.cpu, addr),
            Instruction::Call { addr } => call(&mut state.cpu, addr)?,
            Instruction::SkipEqImm { x, kk } => ske(&mut state.cpu, x, kk),
            Instruction::SkipNeImm { x, kk } => skne(&mut state.cpu, x, kk),
            Instruction::SkipEqReg { x, y } => skre(&mut state.cpu, x, y),
            Instruction::LoadImm { x, kk } => load(&mut state.cpu, x, kk),
            Instruction::AddImm { x, kk } => add(&mut state.cpu, x, kk),
            Instruction::Move { x, y } => mv(&mut state.cpu, x, y),
            Instruction::Or { x, y } => or(&mut state.cpu, x, y),
            Instruction::And { x, y } => and(&mut state.cpu, x, y),
            Instruction::Xor { x, y } => xor(&mut state.cpu, x, y),
            Instruction::AddReg { x, y } => addv(&mut state.cpu, x, y),
            Instruction::Sub { x, y } => sub(&mut state.cpu, x, y),
            Instruction::ShiftRight { x } => shr(&mut state.cpu, x),
            Instruction::SubN { x, y } => subn(&mut state.cpu, x, y),
            Instruction::ShiftLeft { x } => shl(&mut state.cpu, x),
            Instruction::SkipNeReg { x, y } => skrne(&mut state.cpu, x, y),
            Instruction::LoadIndex { addr } => loadi(&mut state.cpu, addr),
            Instruction::JumpOffset { addr } => jumpi(&mut state.cpu, addr),
            Instruction::Random { x, kk } => rnd(state, x, kk),
            Instruction::Draw { x, y, n } => draw(state, x, y, n),
            Instruction::SkipKeyPressed { x } => skpr(state, x),
            Instruction::SkipKeyReleased { x } => skup(state, x),
            Instruction::LoadDelay { x } => moved(&mut state.cpu, x),
            Instruction::WaitKey { x } => keyd(state, x),
            Instruction::SetDelay { x } => loads(&mut state.cpu, x),
            Instruction::SetSound { x } => ld(&mut state.cpu, x),
            Instruction::AddIndex { x } => addi(&mut state.cpu, x),
            Instruction::LoadFont { x } => ldspr(&mut state.cpu, x),
            Instruction::Bcd { x } => bcd(state, x),
            Instruction::StoreRegisters { x } => stor(state, x),
            Instruction::LoadRegisters { x } => read(state, x),
        }
        Ok(())
    }
}

/// pc += 2
fn next(cpu: &mut Cpu) {
    cpu.pc = cpu.pc.wrapping_add(0x2) & ADDRESS_MASK;
}

/// if cond then pc += 4 else pc += 2
fn skip_if(cpu: &mut Cpu, cond: bool) {
    let step = if cond { 0x4 } else { 0x2 };
    cpu.pc = cpu.pc.wrapping_add(step) & ADDRESS_MASK;
}

/// clear
fn clr(state: &mut State) {
    state.frame_buffer.clear();
    next(&mut state.cpu);
}

/// PC = STACK.pop()
fn rts(cpu: &mut Cpu) -> Result<()> {
    let sp = cpu
        .sp
        .checked_sub(1)
        .filter(|&sp| sp < STACK_DEPTH)
        .ok_or(Error::StackUnderflow { pc: cpu.pc })?;
    cpu.sp = sp;
    cpu.pc = cpu.stack[sp];
    Ok(())
}

/// PC = addr
fn jump(cpu: &mut Cpu, addr: u16) {
    cpu.pc = addr & ADDRESS_MASK;
}

/// STACK.push(PC + 2); PC = addr
fn call(cpu: &mut Cpu, addr: u16) -> Result<()> {
    if cpu.sp >= STACK_DEPTH {
        return Err(Error::StackOverflow { pc: cpu.pc });
    }
    cpu.stack[cpu.sp] = cpu.pc.wrapping_add(0x2) & ADDRESS_MASK;
    cpu.sp += 1;
    cpu.pc = addr & ADDRESS_MASK;
    Ok(())
}

/// if Vx == kk then skip
fn ske(cpu: &mut Cpu, x: usize, kk: u8) {
    let cond = cpu.v[x] == kk;
    skip_if(cpu, cond);
}

/// if Vx != kk then skip
fn skne(cpu: &mut Cpu, x: usize, kk: u8) {
    let cond = cpu.v[x] != kk;
    skip_if(cpu, cond);
}

/// if Vx == Vy then skip
fn skre(cpu: &mut Cpu, x: usize, y: usize) {
    let cond = cpu.v[x] == cpu.v[y];
    skip_if(cpu, cond);
}

/// Vx = kk
fn load(cpu: &mut Cpu, x: usize, kk: u8) {
    cpu.v[x] = kk;
    next(cpu);
}

/// Vx += kk
/// Wraps without touching VF
fn add(cpu: &mut Cpu, x: usize, kk: u8) {
    cpu.v[x] = cpu.v[x].wrapping_add(kk);
    next(cpu);
}

/// Vx = Vy
fn mv(cpu: &mut Cpu, x: usize, y: usize) {
    cpu.v[x] = cpu.v[y];
    next(cpu);
}

/// Vx |= Vy
fn or(cpu: &mut Cpu, x: usize, y: usize) {
    cpu.v[x] |= cpu.v[y];
    next(cpu);
}

/// Vx &= Vy
fn and(cpu: &mut Cpu, x: usize, y: usize) {
    cpu.v[x] &= cpu.v[y];
    next(cpu);
}

/// Vx ^= Vy
fn xor(cpu: &mut Cpu, x: usize, y: usize) {
    cpu.v[x] ^= cpu.v[y];
    next(cpu);
}

/// Vx += Vy; VF = carry
fn addv(cpu: &mut Cpu, x: usize, y: usize) {
    let (res, carry) = cpu.v[x].overflowing_add(cpu.v[y]);
    cpu.v[VF] = carry as u8;
    cpu.v[x] = res;
    next(cpu);
}

/// Vx -= Vy; VF = !borrow
fn sub(cpu: &mut Cpu, x: usize, y: usize) {
    let (res, borrow) = cpu.v[x].overflowing_sub(cpu.v[y]);
    cpu.v[VF] = !borrow as u8;
    cpu.v[x] = res;
    next(cpu);
}

/// Vx >>= 1; VF = lsb
fn shr(cpu: &mut Cpu, x: usize) {
    let value = cpu.v[x];
    cpu.v[VF] = value & 0x1;
    cpu.v[x] = value >> 1;
    next(cpu);
}

/// Vx = Vy - Vx; VF = !borrow
fn subn(cpu: &mut Cpu, x: usize, y: usize) {
    let (res, borrow) = cpu.v[y].overflowing_sub(cpu.v[x]);
    cpu.v[VF] = !borrow as u8;
    cpu.v[x] = res;
    next(cpu);
}

/// Vx <<= 1; VF = msb
fn shl(cpu: &mut Cpu, x: usize) {
    let value = cpu.v[x];
    cpu.v[VF] = value >> 7;
    cpu.v[x] = value << 1;
    next(cpu);
}

/// if Vx != Vy then skip
fn skrne(cpu: &mut Cpu, x: usize, y: usize) {
    let cond = cpu.v[x] != cpu.v[y];
    skip_if(cpu, cond);
}

/// I = addr
fn loadi(cpu: &mut Cpu, addr: u16) {
    cpu.i = addr;
    next(cpu);
}

/// PC = V0 + addr
fn jumpi(cpu: &mut Cpu, addr: u16) {
    cpu.pc = addr.wrapping_add(u16::from(cpu.v[0x0])) & ADDRESS_MASK;
}

/// Vx = rand_byte & kk
fn rnd(state: &mut State, x: usize, kk: u8) {
    let byte: u8 = state.rng.gen();
    state.cpu.v[x] = byte & kk;
    next(&mut state.cpu);
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs the n byte sprite at I onto the FrameBuffer; VF = collision
fn draw(state: &mut State, x: usize, y: usize, n: u8) {
    let height = (n as usize).min(MAX_SPRITE_ROWS);
    let mut rows = [0; MAX_SPRITE_ROWS];
    for (offset, row) in rows.iter_mut().enumerate().take(height) {
        *row = state.memory.read_byte(state.cpu.i.wrapping_add(offset as u16));
    }

    let collision = state.frame_buffer.draw_sprite(
        state.cpu.v[x] as usize,
        state.cpu.v[y] as usize,
        &rows[..height],
    );
    state.cpu.v[VF] = collision as u8;
    next(&mut state.cpu);
}

/// if Vx.pressed then skip
fn skpr(state: &mut State, x: usize) {
    let cond = state.keypad.is_pressed(state.cpu.v[x]);
    skip_if(&mut state.cpu, cond);
}

/// if !Vx.pressed then skip
fn skup(state: &mut State, x: usize) {
    let cond = !state.keypad.is_pressed(state.cpu.v[x]);
    skip_if(&mut state.cpu, cond);
}

/// Vx = DT
fn moved(cpu: &mut Cpu, x: usize) {
    cpu.v[x] = cpu.delay_timer;
    next(cpu);
}

/// Vx = await_key()
///
/// Completes immediately if a key is already held. Otherwise the program counter stays put
/// and `awaiting_key` is set; the tick driver calls back in here on every tick until a key
/// is held, at which point the register write and the advance happen once.
pub(crate) fn keyd(state: &mut State, x: usize) {
    match state.keypad.first_pressed() {
        Some(key) => {
            if state.awaiting_key.take().is_some() {
                debug!("Key wait resolved [key: {:X}] [register: V{:X}]", key, x);
            }
            state.cpu.v[x] = key;
            next(&mut state.cpu);
        }
        None => {
            if state.awaiting_key.replace(x).is_none() {
                debug!("Waiting for key [register: V{:X}]", x);
            }
        }
    }
}

/// DT = Vx
fn loads(cpu: &mut Cpu, x: usize) {
    cpu.delay_timer = cpu.v[x];
    next(cpu);
}

/// ST = Vx
fn ld(cpu: &mut Cpu, x: usize) {
    cpu.sound_timer = cpu.v[x];
    next(cpu);
}

/// I += Vx
fn addi(cpu: &mut Cpu, x: usize) {
    cpu.i = cpu.i.wrapping_add(u16::from(cpu.v[x]));
    next(cpu);
}

/// I = address of the font glyph for the low nibble of Vx
fn ldspr(cpu: &mut Cpu, x: usize) {
    cpu.i = FONT_START + u16::from(cpu.v[x] & 0xF) * FONT_GLYPH_SIZE;
    next(cpu);
}

/// mem[I..I+3] = bcd(Vx)
/// Hundreds, tens, then units
fn bcd(state: &mut State, x: usize) {
    let value = state.cpu.v[x];
    let i = state.cpu.i;
    state.memory.write_byte(i, value / 100);
    state.memory.write_byte(i.wrapping_add(1), value / 10 % 10);
    state.memory.write_byte(i.wrapping_add(2), value % 10);
    next(&mut state.cpu);
}

/// mem[I..=I+x] = V0..=Vx
fn stor(state: &mut State, x: usize) {
    for register in 0..=x {
        let addr = state.cpu.i.wrapping_add(register as u16);
        state.memory.write_byte(addr, state.cpu.v[register]);
    }
    next(&mut state.cpu);
}

/// V0..=Vx = mem[I..=I+x]
fn read(state: &mut State, x: usize) {
    for register in 0..=x {
        let addr = state.cpu.i.wrapping_add(register as u16);
        state.cpu.v[register] = state.memory.read_byte(addr);
    }
    next(&mut state.cpu);
}

#[cfg(test)]
mod test_operations {
    use super::*;
    use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn new_state() -> State {
        State::with_rng(&[], StdRng::seed_from_u64(0x8)).unwrap()
    }

    fn run(op: u16, state: &mut State) {
        Instruction::decode(op).unwrap().execute(state).unwrap();
    }

    #[test]
    fn test_0nnn_sys_is_ignored() {
        let mut state = new_state();
        run(0x0123, &mut state);
        assert_eq!(state.cpu.pc, 0x0202);
        assert_eq!(state.cpu.sp, 0);
    }

    #[test]
    fn test_00e0_cls() {
        let mut state = new_state();
        state.frame_buffer.draw_sprite(0, 0, &[0xFF]);
        state.frame_buffer.take_dirty_flag();
        run(0x00E0, &mut state);
        assert_eq!(state.frame_buffer.snapshot()[0][0], 0);
        assert!(state.frame_buffer.take_dirty_flag());
        assert_eq!(state.cpu.pc, 0x0202);
    }

    #[test]
    fn test_00ee_ret() {
        let mut state = new_state();
        state.cpu.sp = 0x1;
        state.cpu.stack[0] = 0x0ABC;
        run(0x00EE, &mut state);
        assert_eq!(state.cpu.sp, 0x0);
        assert_eq!(state.cpu.pc, 0x0ABC);
    }

    #[test]
    fn test_00ee_ret_underflow() {
        let mut state = new_state();
        let result = Instruction::Ret.execute(&mut state);
        assert_eq!(result, Err(Error::StackUnderflow { pc: 0x200 }));
        assert_eq!(state.cpu.pc, 0x200);
        assert_eq!(state.cpu.sp, 0);
    }

    #[test]
    fn test_1nnn_jp() {
        let mut state = new_state();
        state.cpu.pc = 0x0ABC;
        run(0x12F0, &mut state);
        assert_eq!(state.cpu.pc, 0x02F0);
    }

    #[test]
    fn test_2nnn_call() {
        let mut state = new_state();
        state.cpu.pc = 0x0ABC;
        run(0x2123, &mut state);
        assert_eq!(state.cpu.sp, 0x1);
        assert_eq!(state.cpu.stack[0], 0x0ABE);
        assert_eq!(state.cpu.pc, 0x0123);
    }

    #[test]
    fn test_2nnn_call_then_00ee_ret() {
        let mut state = new_state();
        run(0x2400, &mut state);
        assert_eq!(state.cpu.pc, 0x0400);
        run(0x6001, &mut state);
        run(0x00EE, &mut state);
        assert_eq!(state.cpu.pc, 0x0202);
        assert_eq!(state.cpu.sp, 0);
    }

    #[test]
    fn test_2nnn_call_overflow() {
        let mut state = new_state();
        for _ in 0..STACK_DEPTH {
            run(0x2200, &mut state);
        }
        let before = state.cpu;
        let result = Instruction::Call { addr: 0x300 }.execute(&mut state);
        assert_eq!(result, Err(Error::StackOverflow { pc: 0x200 }));
        assert_eq!(state.cpu, before);
    }

    #[test]
    fn test_3xkk_se_skips() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0x11;
        run(0x3111, &mut state);
        assert_eq!(state.cpu.pc, 0x0204);
    }

    #[test]
    fn test_3xkk_se_doesntskip() {
        let mut state = new_state();
        run(0x3111, &mut state);
        assert_eq!(state.cpu.pc, 0x0202);
    }

    #[test]
    fn test_4xkk_sne_skips() {
        let mut state = new_state();
        run(0x4111, &mut state);
        assert_eq!(state.cpu.pc, 0x0204);
    }

    #[test]
    fn test_4xkk_sne_doesntskip() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0x11;
        run(0x4111, &mut state);
        assert_eq!(state.cpu.pc, 0x0202);
    }

    #[test]
    fn test_5xy0_se_skips() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0x11;
        state.cpu.v[0x2] = 0x11;
        run(0x5120, &mut state);
        assert_eq!(state.cpu.pc, 0x0204);
    }

    #[test]
    fn test_5xy0_se_doesntskip() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0x11;
        run(0x5120, &mut state);
        assert_eq!(state.cpu.pc, 0x0202);
    }

    #[test]
    fn test_6xkk_ld() {
        let mut state = new_state();
        run(0x6122, &mut state);
        assert_eq!(state.cpu.v[0x1], 0x22);
        assert_eq!(state.cpu.pc, 0x0202);
    }

    #[test]
    fn test_7xkk_add_wraps_without_flag() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0xFF;
        state.cpu.v[0xF] = 0x7;
        run(0x7102, &mut state);
        assert_eq!(state.cpu.v[0x1], 0x01);
        assert_eq!(state.cpu.v[0xF], 0x7);
    }

    #[test]
    fn test_8xy0_ld() {
        let mut state = new_state();
        state.cpu.v[0x2] = 0x1;
        run(0x8120, &mut state);
        assert_eq!(state.cpu.v[0x1], 0x1);
    }

    #[test]
    fn test_8xy1_or() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0x6;
        state.cpu.v[0x2] = 0x3;
        run(0x8121, &mut state);
        assert_eq!(state.cpu.v[0x1], 0x7);
    }

    #[test]
    fn test_8xy2_and() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0x6;
        state.cpu.v[0x2] = 0x3;
        run(0x8122, &mut state);
        assert_eq!(state.cpu.v[0x1], 0x2);
    }

    #[test]
    fn test_8xy3_xor() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0x6;
        state.cpu.v[0x2] = 0x3;
        run(0x8123, &mut state);
        assert_eq!(state.cpu.v[0x1], 0x5);
    }

    #[test]
    fn test_8xy4_add_carry() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0xFF;
        state.cpu.v[0x2] = 0x11;
        run(0x8124, &mut state);
        assert_eq!(state.cpu.v[0x1], 0x10);
        assert_eq!(state.cpu.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy4_add_all_operands() {
        let mut state = new_state();
        for a in 0..=255u16 {
            for b in 0..=255u16 {
                state.cpu.v[0x3] = a as u8;
                state.cpu.v[0x4] = b as u8;
                run(0x8344, &mut state);
                assert_eq!(state.cpu.v[0x3], ((a + b) % 256) as u8);
                assert_eq!(state.cpu.v[0xF], (a + b > 255) as u8);
            }
        }
    }

    #[test]
    fn test_8xy5_sub_all_operands() {
        let mut state = new_state();
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                state.cpu.v[0x3] = a;
                state.cpu.v[0x4] = b;
                run(0x8345, &mut state);
                assert_eq!(state.cpu.v[0x3], a.wrapping_sub(b));
                assert_eq!(state.cpu.v[0xF], (a >= b) as u8);
            }
        }
    }

    #[test]
    fn test_8xy5_sub_equal_has_no_borrow() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0x11;
        state.cpu.v[0x2] = 0x11;
        run(0x8125, &mut state);
        assert_eq!(state.cpu.v[0x1], 0x0);
        assert_eq!(state.cpu.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy6_shr_lsb() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0x5;
        run(0x8106, &mut state);
        assert_eq!(state.cpu.v[0x1], 0x2);
        assert_eq!(state.cpu.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy6_shr_nolsb() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0x4;
        state.cpu.v[0xF] = 0x1;
        run(0x8106, &mut state);
        assert_eq!(state.cpu.v[0x1], 0x2);
        assert_eq!(state.cpu.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy7_subn_nocarry() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0x11;
        state.cpu.v[0x2] = 0x33;
        run(0x8127, &mut state);
        assert_eq!(state.cpu.v[0x1], 0x22);
        assert_eq!(state.cpu.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy7_subn_carry() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0x12;
        state.cpu.v[0x2] = 0x11;
        run(0x8127, &mut state);
        assert_eq!(state.cpu.v[0x1], 0xFF);
        assert_eq!(state.cpu.v[0xF], 0x0);
    }

    #[test]
    fn test_8xye_shl_msb() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0x81;
        run(0x810E, &mut state);
        assert_eq!(state.cpu.v[0x1], 0x02);
        assert_eq!(state.cpu.v[0xF], 0x1);
    }

    #[test]
    fn test_8xye_shl_nomsb() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0x4;
        run(0x810E, &mut state);
        assert_eq!(state.cpu.v[0x1], 0x8);
        assert_eq!(state.cpu.v[0xF], 0x0);
    }

    #[test]
    fn test_8fy4_result_overwrites_flag() {
        let mut state = new_state();
        state.cpu.v[0xF] = 0x10;
        state.cpu.v[0x1] = 0x02;
        run(0x8F14, &mut state);
        assert_eq!(state.cpu.v[0xF], 0x12);
    }

    #[test]
    fn test_8fy5_result_overwrites_flag() {
        let mut state = new_state();
        state.cpu.v[0xF] = 0x10;
        state.cpu.v[0x1] = 0x02;
        run(0x8F15, &mut state);
        assert_eq!(state.cpu.v[0xF], 0x0E);
    }

    #[test]
    fn test_8fy6_result_overwrites_flag() {
        let mut state = new_state();
        state.cpu.v[0xF] = 0x05;
        run(0x8F06, &mut state);
        assert_eq!(state.cpu.v[0xF], 0x02);
    }

    #[test]
    fn test_8fy7_result_overwrites_flag() {
        let mut state = new_state();
        state.cpu.v[0xF] = 0x02;
        state.cpu.v[0x1] = 0x10;
        run(0x8F17, &mut state);
        assert_eq!(state.cpu.v[0xF], 0x0E);
    }

    #[test]
    fn test_8fye_result_overwrites_flag() {
        let mut state = new_state();
        state.cpu.v[0xF] = 0x41;
        run(0x8F0E, &mut state);
        assert_eq!(state.cpu.v[0xF], 0x82);
    }

    #[test]
    fn test_9xy0_sne_skips() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0x11;
        run(0x9120, &mut state);
        assert_eq!(state.cpu.pc, 0x0204);
    }

    #[test]
    fn test_9xy0_sne_doesntskip() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0x11;
        state.cpu.v[0x2] = 0x11;
        run(0x9120, &mut state);
        assert_eq!(state.cpu.pc, 0x0202);
    }

    #[test]
    fn test_annn_ld() {
        let mut state = new_state();
        run(0xAABC, &mut state);
        assert_eq!(state.cpu.i, 0xABC);
    }

    #[test]
    fn test_bnnn_jp() {
        let mut state = new_state();
        state.cpu.v[0x0] = 0x2;
        run(0xBABC, &mut state);
        assert_eq!(state.cpu.pc, 0xABE);
    }

    #[test]
    fn test_bnnn_jp_wraps() {
        let mut state = new_state();
        state.cpu.v[0x0] = 0x10;
        run(0xBFF8, &mut state);
        assert_eq!(state.cpu.pc, 0x008);
    }

    #[test]
    fn test_cxkk_rnd_masks() {
        let mut state = new_state();
        for _ in 0..64 {
            run(0xC10F, &mut state);
            assert_eq!(state.cpu.v[0x1] & 0xF0, 0);
        }
        run(0xC100, &mut state);
        assert_eq!(state.cpu.v[0x1], 0);
    }

    #[test]
    fn test_cxkk_rnd_is_seeded() {
        let mut a = new_state();
        let mut b = new_state();
        for _ in 0..8 {
            run(0xC1FF, &mut a);
            run(0xC1FF, &mut b);
            assert_eq!(a.cpu.v[0x1], b.cpu.v[0x1]);
        }
    }

    #[test]
    fn test_dxyn_drw_draws() {
        let mut state = new_state();
        state.cpu.v[0x0] = 0x1;
        state.cpu.i = FONT_START;
        // Draw the 0x0 glyph with a 1x 1y offset
        run(0xD005, &mut state);
        let mut expected = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        expected[1][1..5].copy_from_slice(&[1, 1, 1, 1]);
        expected[2][1..5].copy_from_slice(&[1, 0, 0, 1]);
        expected[3][1..5].copy_from_slice(&[1, 0, 0, 1]);
        expected[4][1..5].copy_from_slice(&[1, 0, 0, 1]);
        expected[5][1..5].copy_from_slice(&[1, 1, 1, 1]);
        assert!(state
            .frame_buffer
            .snapshot()
            .iter()
            .zip(expected.iter())
            .all(|(a, b)| a[..] == b[..]));
        assert_eq!(state.cpu.v[0xF], 0x0);
        assert!(state.frame_buffer.take_dirty_flag());
    }

    #[test]
    fn test_dxyn_drw_twice_erases_and_collides() {
        let mut state = new_state();
        state.cpu.i = FONT_START + 0x8 * FONT_GLYPH_SIZE;
        state.cpu.v[0x1] = 60;
        state.cpu.v[0x2] = 30;
        run(0xD125, &mut state);
        assert_eq!(state.cpu.v[0xF], 0x0);
        run(0xD125, &mut state);
        assert_eq!(state.cpu.v[0xF], 0x1);
        assert!(state
            .frame_buffer
            .snapshot()
            .iter()
            .all(|row| row.iter().all(|&p| p == 0)));
    }

    #[test]
    fn test_dxyn_drw_clears_stale_flag() {
        let mut state = new_state();
        state.cpu.v[0xF] = 0x1;
        state.cpu.i = FONT_START;
        run(0xD005, &mut state);
        assert_eq!(state.cpu.v[0xF], 0x0);
        assert_eq!(state.frame_buffer.snapshot()[0][0..4], [1, 1, 1, 1]);
    }

    #[test]
    fn test_dxyn_drw_xors() {
        let mut state = new_state();
        state.memory.write_byte(0x300, 0b1100_0000);
        state.cpu.i = 0x300;
        state.cpu.v[0x0] = 0x2;
        state.frame_buffer.draw_sprite(2, 0, &[0b0101_0000]);
        run(0xD011, &mut state);
        assert_eq!(state.frame_buffer.snapshot()[0][2..6], [1, 0, 0, 1]);
        assert_eq!(state.cpu.v[0xF], 0x1);
    }

    #[test]
    fn test_ex9e_skp_skips() {
        let mut state = new_state();
        state.keypad.set_key(0xE, true);
        state.cpu.v[0x1] = 0xE;
        run(0xE19E, &mut state);
        assert_eq!(state.cpu.pc, 0x0204);
    }

    #[test]
    fn test_ex9e_skp_doesntskip() {
        let mut state = new_state();
        run(0xE19E, &mut state);
        assert_eq!(state.cpu.pc, 0x0202);
    }

    #[test]
    fn test_exa1_sknp_skips() {
        let mut state = new_state();
        run(0xE1A1, &mut state);
        assert_eq!(state.cpu.pc, 0x0204);
    }

    #[test]
    fn test_exa1_sknp_doesntskip() {
        let mut state = new_state();
        state.keypad.set_key(0xE, true);
        state.cpu.v[0x1] = 0xE;
        run(0xE1A1, &mut state);
        assert_eq!(state.cpu.pc, 0x0202);
    }

    #[test]
    fn test_fx07_ld() {
        let mut state = new_state();
        state.cpu.delay_timer = 0xF;
        run(0xF107, &mut state);
        assert_eq!(state.cpu.v[0x1], 0xF);
    }

    #[test]
    fn test_fx0a_ld_completes_when_key_held() {
        let mut state = new_state();
        state.keypad.set_key(0x7, true);
        state.keypad.set_key(0xC, true);
        run(0xF10A, &mut state);
        assert_eq!(state.cpu.v[0x1], 0x7);
        assert_eq!(state.cpu.pc, 0x0202);
        assert_eq!(state.awaiting_key, None);
    }

    #[test]
    fn test_fx0a_ld_waits_without_key() {
        let mut state = new_state();
        run(0xF10A, &mut state);
        assert_eq!(state.awaiting_key, Some(0x1));
        assert_eq!(state.cpu.pc, 0x0200);

        keyd(&mut state, 0x1);
        assert_eq!(state.awaiting_key, Some(0x1));
        assert_eq!(state.cpu.pc, 0x0200);

        state.keypad.set_key(0xB, true);
        keyd(&mut state, 0x1);
        assert_eq!(state.awaiting_key, None);
        assert_eq!(state.cpu.v[0x1], 0xB);
        assert_eq!(state.cpu.pc, 0x0202);
    }

    #[test]
    fn test_fx15_ld() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0xF;
        run(0xF115, &mut state);
        assert_eq!(state.cpu.delay_timer, 0xF);
    }

    #[test]
    fn test_fx18_ld() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0xF;
        run(0xF118, &mut state);
        assert_eq!(state.cpu.sound_timer, 0xF);
    }

    #[test]
    fn test_fx1e_add() {
        let mut state = new_state();
        state.cpu.i = 0x1;
        state.cpu.v[0x1] = 0x1;
        run(0xF11E, &mut state);
        assert_eq!(state.cpu.i, 0x2);
        assert_eq!(state.cpu.v[0xF], 0x0);
    }

    #[test]
    fn test_fx29_ld() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0x2;
        run(0xF129, &mut state);
        assert_eq!(state.cpu.i, FONT_START + 0xA);
    }

    #[test]
    fn test_fx29_ld_uses_low_nibble() {
        let mut state = new_state();
        state.cpu.v[0x1] = 0x1F;
        run(0xF129, &mut state);
        assert_eq!(state.cpu.i, FONT_START + 0xF * FONT_GLYPH_SIZE);
        assert_eq!(state.memory.read_byte(state.cpu.i), 0xF0);
    }

    #[test]
    fn test_fx33_ld() {
        let mut state = new_state();
        state.cpu.v[0x1] = 235;
        state.cpu.i = 0x300;
        run(0xF133, &mut state);
        assert_eq!(state.memory.read_byte(0x300), 2);
        assert_eq!(state.memory.read_byte(0x301), 3);
        assert_eq!(state.memory.read_byte(0x302), 5);
        assert_eq!(state.cpu.i, 0x300);
    }

    #[test]
    fn test_fx55_ld() {
        let mut state = new_state();
        state.cpu.i = 0x300;
        state.cpu.v[0x0..0x5].copy_from_slice(&[0x1, 0x2, 0x3, 0x4, 0x5]);
        run(0xF455, &mut state);
        for (offset, expected) in [0x1, 0x2, 0x3, 0x4, 0x5, 0x0].iter().enumerate() {
            assert_eq!(state.memory.read_byte(0x300 + offset as u16), *expected);
        }
        assert_eq!(state.cpu.i, 0x300);
    }

    #[test]
    fn test_fx65_ld() {
        let mut state = new_state();
        state.cpu.i = 0x300;
        for (offset, byte) in [0x1, 0x2, 0x3, 0x4, 0x5].iter().enumerate() {
            state.memory.write_byte(0x300 + offset as u16, *byte);
        }
        run(0xF465, &mut state);
        assert_eq!(state.cpu.v[0x0..0x6], [0x1, 0x2, 0x3, 0x4, 0x5, 0x0]);
    }

    #[test]
    fn test_fx55_then_fx65_round_trips() {
        let mut state = new_state();
        let registers: [u8; 16] = [
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB, 0xCC, 0xDD,
            0xEE, 0xFF,
        ];
        state.cpu.v = registers;
        state.cpu.i = 0xFF8;
        run(0xFF55, &mut state);
        state.cpu.v = [0; 16];
        run(0xFF65, &mut state);
        assert_eq!(state.cpu.v, registers);
    }
}
