use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::cpu::Cpu;
use crate::error::Result;
use crate::framebuffer::FrameBuffer;
use crate::keypad::Keypad;
use crate::memory::Memory;

/// Everything an instruction can read or write.
///
/// ## Components
/// - `cpu` registers, program counter, call stack and timers
/// - `memory` font, program and work RAM
/// - `frame_buffer` the 64x32 display
/// - `keypad` the host's latest key states
///
/// ## Key wait
/// `awaiting_key` holds the destination register while `Fx0A` is blocked on input.
/// While it is set, ticks poll the keypad instead of fetching new instructions.
#[derive(Clone)]
pub struct State {
    pub cpu: Cpu,
    pub memory: Memory,
    pub frame_buffer: FrameBuffer,
    pub keypad: Keypad,
    pub awaiting_key: Option<usize>,
    pub rng: StdRng,
}

impl State {
    /// Builds a machine ready to run `program`, with a randomly seeded generator.
    pub fn new(program: &[u8]) -> Result<Self> {
        Self::with_rng(program, StdRng::from_entropy())
    }

    pub fn with_rng(program: &[u8], rng: StdRng) -> Result<Self> {
        Ok(State {
            cpu: Cpu::default(),
            memory: Memory::load(program)?,
            frame_buffer: FrameBuffer::default(),
            keypad: Keypad::default(),
            awaiting_key: None,
            rng,
        })
    }
}
