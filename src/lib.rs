pub use audio::Audio;
pub use chip8::Chip8;
pub use cpu::Cpu;
pub use error::{Error, Result};
pub use framebuffer::{FrameBuffer, Pixels};
pub use instruction::Instruction;
pub use keypad::Keypad;

mod audio;
mod chip8;
pub mod constants;
mod cpu;
mod error;
mod framebuffer;
mod instruction;
mod keypad;
mod memory;
mod opcode;
mod operations;
mod state;
