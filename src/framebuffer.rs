use std::fmt;

use crate::error::{Chip8Error, Result};

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;
const ROW_BYTES: usize = DISPLAY_WIDTH / 8;
const PIXEL_COUNT: usize = DISPLAY_WIDTH * DISPLAY_HEIGHT;
pub const DISPLAY_BYTES: usize = PIXEL_COUNT / 8;

/// The 64x32 monochrome display, packed one bit per pixel with the most
/// significant bit of each byte leftmost. Rows are `ROW_BYTES` apart.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bytes: [u8; DISPLAY_BYTES],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        FrameBuffer {
            bytes: [0; DISPLAY_BYTES],
        }
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.bytes = [0; DISPLAY_BYTES];
    }

    /// packed bytes, as a `display::Display` wants them
    pub fn as_bytes(&self) -> &[u8; DISPLAY_BYTES] {
        &self.bytes
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let bit = (y % DISPLAY_HEIGHT) * DISPLAY_WIDTH + x % DISPLAY_WIDTH;
        self.bytes[bit / 8] & (0x80 >> (bit % 8)) != 0
    }

    /// XOR `byte` into the framebuffer byte at `pos`; true if that turned a
    /// lit pixel off
    fn xor_byte(&mut self, pos: usize, byte: u8) -> bool {
        let before = self.bytes[pos];
        self.bytes[pos] ^= byte;
        before & byte != 0
    }

    /// XOR a sprite, one byte per row, onto the display with its top left at
    /// (x, y), both taken modulo the display size. Returns true if any lit
    /// pixel was turned off.
    ///
    /// A row whose start falls off the bottom wraps to the top. A row that
    /// isn't byte-aligned straddles two framebuffer bytes; the second one
    /// wraps back to the start of the same pixel row if it would run off the
    /// right edge.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let x = x as usize % DISPLAY_WIDTH;
        let y = y as usize % DISPLAY_HEIGHT;
        let shift = x % 8;
        let mut collision = false;

        for (r, &row) in rows.iter().enumerate() {
            let bit = ((y + r) * DISPLAY_WIDTH + x) % PIXEL_COUNT;
            let pos = bit / 8;
            collision |= self.xor_byte(pos, row >> shift);
            if shift != 0 {
                let next = if (pos + 1) % ROW_BYTES == 0 {
                    pos + 1 - ROW_BYTES
                } else {
                    pos + 1
                };
                collision |= self.xor_byte(next, row << (8 - shift));
            }
        }
        collision
    }

    /// expand into one colour per pixel, row by row
    pub fn render_into(&self, out: &mut [u32], on: u32, off: u32) -> Result<()> {
        if out.len() != PIXEL_COUNT {
            return Err(Chip8Error::RenderBufferSize {
                expected: PIXEL_COUNT,
                actual: out.len(),
            });
        }
        for (bit, px) in out.iter_mut().enumerate() {
            *px = if self.bytes[bit / 8] & (0x80 >> (bit % 8)) != 0 {
                on
            } else {
                off
            };
        }
        Ok(())
    }
}

/// one character per pixel, `#` lit, `.` dark
impl fmt::Display for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..DISPLAY_HEIGHT {
            let line: String = (0..DISPLAY_WIDTH)
                .map(|x| if self.pixel(x, y) { '#' } else { '.' })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameBuffer\n{}", self)
    }
}
