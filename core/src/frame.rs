use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};

/// # Frame buffer
/// The 64x32 monochrome display, one byte per pixel holding 0 (off) or 1 (on).
/// Cells are stored row-major so pixel `(x, y)` lives at `y * 64 + x`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer([u8; DISPLAY_WIDTH * DISPLAY_HEIGHT]);

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer([0; DISPLAY_WIDTH * DISPLAY_HEIGHT])
    }

    pub fn clear(&mut self) {
        self.0 = [0; DISPLAY_WIDTH * DISPLAY_HEIGHT];
    }

    /// Gets the pixel at `(x, y)`; coordinates wrap around the edges of the display.
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.0[Self::index(x, y)]
    }

    /// XORs a sprite onto the display with its top left corner at `(x, y)`.
    ///
    /// Each byte of `sprite` is one 8 pixel row, most significant bit leftmost.
    /// Pixels that fall off the right or bottom edge wrap around to the opposite side.
    ///
    /// Returns true if any pixel that was on got switched off.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut collision = false;
        for (row, byte) in sprite.iter().enumerate() {
            for bit in 0..8 {
                if byte & (0x80 >> bit) == 0 {
                    continue;
                }
                let cell = &mut self.0[Self::index(x + bit, y + row)];
                collision |= *cell == 1;
                *cell ^= 1;
            }
        }
        collision
    }

    /// All 2048 cells, row-major
    pub fn cells(&self) -> &[u8] {
        &self.0
    }

    /// Iterates over the display one 64 pixel row at a time
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.0.chunks_exact(DISPLAY_WIDTH)
    }

    fn index(x: usize, y: usize) -> usize {
        (y % DISPLAY_HEIGHT) * DISPLAY_WIDTH + (x % DISPLAY_WIDTH)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draws_row_msb_first() {
        let mut frame = FrameBuffer::new();
        assert!(!frame.draw_sprite(0, 0, &[0b1010_0001]));
        let row: Vec<u8> = (0..8).map(|x| frame.get(x, 0)).collect();
        assert_eq!(row, [1, 0, 1, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_collision_when_erasing() {
        let mut frame = FrameBuffer::new();
        frame.draw_sprite(10, 10, &[0xFF]);
        assert!(frame.draw_sprite(17, 10, &[0x80]));
        assert_eq!(frame.get(17, 10), 0);
    }

    #[test]
    fn test_no_collision_for_clear_sprite_bits() {
        let mut frame = FrameBuffer::new();
        frame.draw_sprite(0, 0, &[0xF0]);
        // Only the low nibble is set so nothing already on is touched
        assert!(!frame.draw_sprite(0, 0, &[0x0F]));
        assert!(frame.cells()[0..8].iter().all(|p| *p == 1));
    }

    #[test]
    fn test_wraps_horizontally_and_vertically() {
        let mut frame = FrameBuffer::new();
        frame.draw_sprite(62, 31, &[0xF0, 0xF0]);
        assert_eq!(frame.get(62, 31), 1);
        assert_eq!(frame.get(63, 31), 1);
        assert_eq!(frame.get(0, 31), 1);
        assert_eq!(frame.get(1, 31), 1);
        assert_eq!(frame.get(62, 0), 1);
        assert_eq!(frame.get(1, 0), 1);
        assert_eq!(frame.cells().iter().filter(|p| **p == 1).count(), 8);
    }

    #[test]
    fn test_clear() {
        let mut frame = FrameBuffer::new();
        frame.draw_sprite(5, 5, &[0xFF; 4]);
        frame.clear();
        assert_eq!(frame, FrameBuffer::new());
    }

    #[test]
    fn test_rows() {
        let mut frame = FrameBuffer::new();
        frame.draw_sprite(0, 1, &[0x80]);
        let rows: Vec<&[u8]> = frame.rows().collect();
        assert_eq!(rows.len(), DISPLAY_HEIGHT);
        assert_eq!(rows[1][0], 1);
        assert_eq!(rows[0][0], 0);
    }
}
