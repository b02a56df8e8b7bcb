use crate::constants::{PROGRAM_START, REGISTER_COUNT, STACK_DEPTH};

/// # CPU
///
/// ## Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is also written as the carry, borrow and collision flag
/// - (i) a 16-bit memory address register
///
/// ## Counter
/// - (pc) a 16-bit program counter, starting where programs are loaded
///
/// ## Stack
/// - (stack) 16 return addresses
/// - (sp) the number of return addresses currently stored
///
/// ## Timers
/// - 2 8-bit timers (delay & sound), decremented once per tick while non-zero
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cpu {
    pub v: [u8; REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub sp: usize,
    pub stack: [u16; STACK_DEPTH],
    pub delay_timer: u8,
    pub sound_timer: u8,
}

impl Cpu {
    pub fn new() -> Self {
        Cpu {
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            stack: [0; STACK_DEPTH],
            delay_timer: 0,
            sound_timer: 0,
        }
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}
