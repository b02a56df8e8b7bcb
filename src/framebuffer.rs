use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// The pixel grid, indexed as [y][x]; every pixel is either 0 or 1.
pub type Pixels = [[u8; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// # Frame Buffer
/// A 64x32 monochrome grid that sprites are XORed into.
///
/// Every clear or draw marks the buffer dirty; the flag stays set until a host takes it,
/// so a renderer only has to redraw when something changed.
#[derive(Clone)]
pub struct FrameBuffer {
    pixels: Pixels,
    dirty: bool,
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            dirty: false,
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [[0; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        self.dirty = true;
    }

    /// XORs a sprite onto the grid with its top left corner at (x, y).
    ///
    /// Each byte of `rows` is one 8 pixel row, most significant bit leftmost.
    /// Pixels falling off an edge wrap around to the opposite one.
    /// Returns whether any lit pixel was switched off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, rows: &[u8]) -> bool {
        let mut collision = false;

        for (row, byte) in rows.iter().enumerate() {
            let py = (y + row) % DISPLAY_HEIGHT;
            for bit in 0..8 {
                if byte & (0x80 >> bit) == 0 {
                    continue;
                }
                let px = (x + bit) % DISPLAY_WIDTH;
                let pixel = &mut self.pixels[py][px];
                collision |= *pixel == 1;
                *pixel ^= 1;
            }
        }

        self.dirty = true;
        collision
    }

    /// Returns whether the buffer changed since the last call, and resets the flag.
    pub fn take_dirty_flag(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    pub fn snapshot(&self) -> &Pixels {
        &self.pixels
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}
