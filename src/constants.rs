//! Fixed layout of the machine.
//!
//! ```text
//! 0x000-0x04F  unused
//! 0x050-0x09F  built-in hexadecimal font (16 glyphs x 5 bytes)
//! 0x0A0-0x1FF  unused
//! 0x200-0xFFF  program and work RAM
//! ```

/// Bytes of addressable memory; the full space reachable by a 12-bit address.
pub const MEMORY_SIZE: usize = 4096;

/// Applied to every computed address so accesses wrap around the address space.
pub const ADDRESS_MASK: u16 = 0x0FFF;

/// Where the font table is copied at construction.
pub const FONT_START: u16 = 0x050;

/// Where programs are loaded and where the program counter starts.
pub const PROGRAM_START: u16 = 0x200;

/// Largest program that fits between `PROGRAM_START` and the end of memory.
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Return addresses the call stack can hold.
pub const STACK_DEPTH: usize = 16;

pub const REGISTER_COUNT: usize = 16;
pub const KEY_COUNT: usize = 16;

/// Index of the register doubling as the carry/borrow/collision flag.
pub const FLAG_REGISTER: usize = 0xF;

/// Bytes per font glyph.
pub const FONT_GLYPH_SIZE: u16 = 5;

/// Rate at which hosts are expected to render and poll input.
pub const FRAME_RATE: u32 = 60;

/// Ticks a host runs between two frames unless configured otherwise.
pub const DEFAULT_CYCLES_PER_FRAME: u32 = 10;

/// # Font
/// Each glyph is 4 pixels wide and 5 rows tall; only the high nibble of each row is drawn.
///
/// ```text
/// "0"     Binary   Hex
/// ****    11110000 0xF0
/// *  *    10010000 0x90
/// *  *    10010000 0x90
/// *  *    10010000 0x90
/// ****    11110000 0xF0
/// ```
pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
