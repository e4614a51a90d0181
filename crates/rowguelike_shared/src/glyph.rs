//! Custom character bitmaps.

use bytemuck::{Pod, Zeroable};

use crate::constants::GLYPH_ROWS;

/// One user-defined character: eight pixel rows, low five bits used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Glyph {
    /// Pixel rows, top to bottom. Bit 4 is the leftmost column.
    pub rows: [u8; GLYPH_ROWS],
}

impl Glyph {
    /// Width of a glyph cell in pixels.
    pub const WIDTH: u8 = 5;

    /// Creates a glyph from its pixel rows.
    #[inline]
    #[must_use]
    pub const fn new(rows: [u8; GLYPH_ROWS]) -> Self {
        Self { rows }
    }

    /// Returns whether the pixel at (`x`, `y`) is lit.
    ///
    /// Out-of-cell coordinates read as unlit.
    #[inline]
    #[must_use]
    pub fn pixel(&self, x: u8, y: u8) -> bool {
        if x >= Self::WIDTH || usize::from(y) >= GLYPH_ROWS {
            return false;
        }
        self.rows[usize::from(y)] & (1 << (Self::WIDTH - 1 - x)) != 0
    }

    /// Lights the pixel at (`x`, `y`). Out-of-cell writes are ignored.
    #[inline]
    pub fn set_pixel(&mut self, x: u8, y: u8) {
        if x >= Self::WIDTH || usize::from(y) >= GLYPH_ROWS {
            return;
        }
        self.rows[usize::from(y)] |= 1 << (Self::WIDTH - 1 - x);
    }

    /// Raw bytes as sent to the display controller.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_addressing() {
        let mut glyph = Glyph::default();
        glyph.set_pixel(0, 0);
        glyph.set_pixel(4, 7);

        assert_eq!(glyph.rows[0], 0b1_0000);
        assert_eq!(glyph.rows[7], 0b0_0001);
        assert!(glyph.pixel(0, 0));
        assert!(!glyph.pixel(1, 0));
    }

    #[test]
    fn test_out_of_cell_ignored() {
        let mut glyph = Glyph::default();
        glyph.set_pixel(5, 0);
        glyph.set_pixel(0, 8);
        assert_eq!(glyph, Glyph::default());
        assert!(!glyph.pixel(9, 9));
    }

    #[test]
    fn test_glyph_layout() {
        assert_eq!(std::mem::size_of::<Glyph>(), GLYPH_ROWS);
        let glyph = Glyph::new([1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(glyph.as_bytes(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }
}
