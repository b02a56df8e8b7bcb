/// # Opcodes
///
/// Opcodes are 16 bits each, fetched big-endian from two consecutive bytes.
/// Operands always sit at the same place, so they're pulled out with fixed masks:
///
/// ```text
/// F___  family; picks the group of operations
/// _X__  register Vx, or the last register of the range V0..Vx
/// __Y_  register Vy
/// ___N  4-bit immediate (sprite height) or sub-operation
/// __KK  8-bit immediate or sub-operation
/// _NNN  12-bit address
/// ```
pub trait Opcode {
    /// Returns the Opcode's component nibbles, most significant first.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// `[F___]`
    fn family(&self) -> u8;

    /// `[_X__]`
    fn x(&self) -> usize;

    /// `[__Y_]`
    fn y(&self) -> usize;

    /// `[___N]`
    fn n(&self) -> u8;

    /// `[__KK]`
    fn kk(&self) -> u8;

    /// `[_NNN]`
    fn addr(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.family(), self.x() as u8, self.y() as u8, self.n())
    }

    fn family(&self) -> u8 {
        ((self & 0xF000) >> 12) as u8
    }

    fn x(&self) -> usize {
        ((self & 0x0F00) >> 8) as usize
    }

    fn y(&self) -> usize {
        ((self & 0x00F0) >> 4) as usize
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn addr(&self) -> u16 {
        self & 0x0FFF
    }
}
