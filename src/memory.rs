use log::info;

use crate::constants::{
    ADDRESS_MASK, FONT, FONT_START, MAX_PROGRAM_SIZE, MEMORY_SIZE, PROGRAM_START,
};
use crate::error::{Error, Result};

/// # Memory
/// 4096 bytes of linear, byte-addressable memory.
///
/// - the font table is copied to `FONT_START` on construction
/// - the program is copied to `PROGRAM_START` on construction
/// - every other byte starts zeroed
///
/// Addresses are masked to 12 bits, so reads and writes past the end wrap back to 0x000.
#[derive(Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Builds memory holding the font and `program`.
    ///
    /// # Arguments
    /// * `program` raw program bytes; must fit between `PROGRAM_START` and the end of memory
    pub fn load(program: &[u8]) -> Result<Self> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Error::ProgramTooLarge {
                size: program.len(),
                max_size: MAX_PROGRAM_SIZE,
            });
        }

        let mut bytes = [0; MEMORY_SIZE];
        let font = FONT_START as usize;
        bytes[font..font + FONT.len()].copy_from_slice(&FONT);
        let start = PROGRAM_START as usize;
        bytes[start..start + program.len()].copy_from_slice(program);

        info!("Loaded program [size: {}]", program.len());
        Ok(Memory { bytes })
    }

    pub fn read_byte(&self, addr: u16) -> u8 {
        self.bytes[Self::index(addr)]
    }

    pub fn write_byte(&mut self, addr: u16, value: u8) {
        self.bytes[Self::index(addr)] = value;
    }

    /// Reads the two bytes at `addr` as one big-endian opcode.
    pub fn read_opcode(&self, addr: u16) -> u16 {
        u16::from_be_bytes([self.read_byte(addr), self.read_byte(addr.wrapping_add(1))])
    }

    fn index(addr: u16) -> usize {
        (addr & ADDRESS_MASK) as usize
    }
}

impl Default for Memory {
    fn default() -> Self {
        Memory {
            bytes: [0; MEMORY_SIZE],
        }
    }
}
