use log::trace;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio::Audio;
use crate::constants::KEY_COUNT;
use crate::cpu::Cpu;
use crate::error::Result;
use crate::framebuffer::Pixels;
use crate::instruction::Instruction;
use crate::operations;
use crate::state::State;

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - the machine `state`
///  - an optional `audio` collaborator told when to start and stop the tone
///
/// Supplies interfaces for:
/// - constructing a machine around a program
/// - pressing and releasing keys
/// - advancing the machine one tick at a time
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    audio: Option<Box<dyn Audio>>,
}

impl Chip8 {
    /// Builds a machine with `program` loaded and the program counter pointing at it.
    ///
    /// Fails with `Error::ProgramTooLarge` if the program doesn't fit in memory.
    pub fn new(program: &[u8]) -> Result<Self> {
        Ok(Self::from_state(State::new(program)?))
    }

    /// Like `new`, but `Cxkk` draws from a generator seeded with `seed`.
    pub fn with_seed(program: &[u8], seed: u64) -> Result<Self> {
        Ok(Self::from_state(State::with_rng(
            program,
            StdRng::seed_from_u64(seed),
        )?))
    }

    fn from_state(state: State) -> Self {
        Chip8 { state, audio: None }
    }

    pub fn set_audio(&mut self, audio: Box<dyn Audio>) {
        self.audio = Some(audio);
    }

    /// Set the pressed status of a single key
    ///
    /// # Arguments
    /// * `key` the key index, 0x0..=0xF
    /// * `pressed` whether it's currently held down
    pub fn set_key(&mut self, key: u8, pressed: bool) {
        self.state.keypad.set_key(key, pressed);
    }

    /// Replace the pressed status of every key
    pub fn set_keys(&mut self, keys: [bool; KEY_COUNT]) {
        self.state.keypad.set_keys(keys);
    }

    /// Advances the machine by a single tick
    /// - executes one instruction, or polls the keypad while `Fx0A` is waiting
    /// - decrements the timers
    /// - starts or stops the tone depending on the sound timer
    ///
    /// Errors are returned before any state changes, timers included.
    pub fn tick(&mut self) -> Result<()> {
        self.advance_cpu()?;
        self.advance_timers();
        Ok(())
    }

    fn advance_cpu(&mut self) -> Result<()> {
        if let Some(register) = self.state.awaiting_key {
            operations::keyd(&mut self.state, register);
            return Ok(());
        }

        let pc = self.state.cpu.pc;
        let op = self.state.memory.read_opcode(pc);
        let instruction = Instruction::decode(op)?;
        trace!("{:03X}: {:04X} {}", pc, op, instruction);
        instruction.execute(&mut self.state)
    }

    fn advance_timers(&mut self) {
        let cpu = &mut self.state.cpu;
        if cpu.delay_timer > 0 {
            cpu.delay_timer -= 1;
        }

        let sounding = cpu.sound_timer > 0;
        if sounding {
            cpu.sound_timer -= 1;
        }

        if let Some(audio) = self.audio.as_mut() {
            if sounding {
                audio.start_tone();
            } else {
                audio.stop_tone();
            }
        }
    }

    /// Returns whether the frame buffer changed since the last call, and resets the flag
    pub fn take_dirty_flag(&mut self) -> bool {
        self.state.frame_buffer.take_dirty_flag()
    }

    /// Read-only view of the pixels, indexed as [y][x]
    pub fn snapshot(&self) -> &Pixels {
        self.state.frame_buffer.snapshot()
    }

    /// Whether an `Fx0A` is holding the program counter until a key is pressed
    pub fn is_awaiting_key(&self) -> bool {
        self.state.awaiting_key.is_some()
    }

    pub fn cpu(&self) -> &Cpu {
        &self.state.cpu
    }
}
