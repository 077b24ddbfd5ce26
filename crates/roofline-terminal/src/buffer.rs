//! Character-cell raster with braille sub-cell dots.
//!
//! Each cell holds either text or a braille pattern of 2×4 dots, so a
//! `width × height` buffer has a `2·width × 4·height` dot grid for lines.

use crate::color::Color;
use unicode_width::UnicodeWidthChar;

const BRAILLE_BASE: u32 = 0x2800;

/// Bit for dot `(column, row)` inside one braille cell.
const fn braille_bit(column: usize, row: usize) -> u8 {
    match (column, row) {
        (0, 3) => 0x40,
        (1, 3) => 0x80,
        (0, r) => 1 << r,
        (_, r) => 1 << (r + 3),
    }
}

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub symbol: char,
    /// `None` uses the terminal's default colour.
    pub fg: Option<Color>,
    dots: u8,
    width: u8,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            symbol: ' ',
            fg: None,
            dots: 0,
            width: 1,
        }
    }
}

impl Cell {
    /// Braille dot bits, zero for text cells.
    #[must_use]
    pub const fn dots(&self) -> u8 {
        self.dots
    }

    /// Second half of a wide character; writers skip it.
    #[must_use]
    pub const fn is_continuation(&self) -> bool {
        self.width == 0
    }

    const fn accepts_dots(&self) -> bool {
        self.dots != 0 || (self.symbol == ' ' && self.width == 1)
    }
}

/// Fixed-size grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellBuffer {
    cells: Vec<Cell>,
    width: u16,
    height: u16,
}

impl CellBuffer {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            cells: vec![Cell::default(); usize::from(width) * usize::from(height)],
            width,
            height,
        }
    }

    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    #[must_use]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Width of the dot grid.
    #[must_use]
    pub fn dot_width(&self) -> usize {
        usize::from(self.width) * 2
    }

    /// Height of the dot grid.
    #[must_use]
    pub fn dot_height(&self) -> usize {
        usize::from(self.height) * 4
    }

    /// Light one braille dot. Cells holding text are left alone.
    pub fn set_dot(&mut self, dx: usize, dy: usize, color: Color) {
        let (Ok(x), Ok(y)) = (u16::try_from(dx / 2), u16::try_from(dy / 4)) else {
            return;
        };
        let Some(i) = self.index(x, y) else {
            return;
        };
        let cell = &mut self.cells[i];
        if !cell.accepts_dots() {
            return;
        }
        cell.dots |= braille_bit(dx % 2, dy % 4);
        cell.symbol = char::from_u32(BRAILLE_BASE + u32::from(cell.dots)).unwrap_or('⣿');
        cell.fg = Some(color);
    }

    /// Write one character, replacing whatever the cell held.
    pub fn put_char(&mut self, x: u16, y: u16, ch: char, color: Option<Color>) {
        self.put_text(x, y, ch.encode_utf8(&mut [0; 4]), color);
    }

    /// Write text starting at `(x, y)`, clipped at the right edge.
    /// Returns the number of columns used.
    pub fn put_text(&mut self, x: u16, y: u16, text: &str, color: Option<Color>) -> u16 {
        let mut col = x;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0) as u16;
            if w == 0 {
                continue;
            }
            if col.saturating_add(w) > self.width {
                break;
            }
            let Some(i) = self.index(col, y) else {
                break;
            };
            self.cells[i] = Cell {
                symbol: ch,
                fg: color,
                dots: 0,
                width: w as u8,
            };
            if w == 2 {
                if let Some(next) = self.index(col + 1, y) {
                    self.cells[next] = Cell {
                        symbol: ' ',
                        fg: color,
                        dots: 0,
                        width: 0,
                    };
                }
            }
            col += w;
        }
        col - x
    }

    /// Cells of row `y`.
    #[must_use]
    pub fn row(&self, y: u16) -> &[Cell] {
        self.index(0, y).map_or(&[], |start| {
            &self.cells[start..start + usize::from(self.width)]
        })
    }

    /// Row `y` as plain text, trailing spaces removed.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        let text: String = self
            .row(y)
            .iter()
            .filter(|c| !c.is_continuation())
            .map(|c| c.symbol)
            .collect();
        text.trim_end().to_string()
    }

    /// Whole buffer as plain text, one line per row.
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        (0..self.height)
            .map(|y| self.row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_blank() {
        let buf = CellBuffer::new(10, 3);
        assert_eq!(buf.width(), 10);
        assert_eq!(buf.height(), 3);
        assert_eq!(buf.dot_width(), 20);
        assert_eq!(buf.dot_height(), 12);
        assert_eq!(buf.to_plain_text(), "\n\n");
    }

    #[test]
    fn test_braille_bits() {
        assert_eq!(braille_bit(0, 0), 0x01);
        assert_eq!(braille_bit(0, 2), 0x04);
        assert_eq!(braille_bit(1, 0), 0x08);
        assert_eq!(braille_bit(1, 2), 0x20);
        assert_eq!(braille_bit(0, 3), 0x40);
        assert_eq!(braille_bit(1, 3), 0x80);
    }

    #[test]
    fn test_set_dot_accumulates() {
        let mut buf = CellBuffer::new(2, 1);
        buf.set_dot(0, 0, Color::WHITE);
        assert_eq!(buf.get(0, 0).unwrap().symbol, '⠁');
        buf.set_dot(1, 3, Color::WHITE);
        assert_eq!(buf.get(0, 0).unwrap().dots(), 0x81);
        assert_eq!(buf.get(0, 0).unwrap().symbol, '⢁');
    }

    #[test]
    fn test_full_cell() {
        let mut buf = CellBuffer::new(1, 1);
        for dx in 0..2 {
            for dy in 0..4 {
                buf.set_dot(dx, dy, Color::WHITE);
            }
        }
        assert_eq!(buf.get(0, 0).unwrap().symbol, '⣿');
    }

    #[test]
    fn test_set_dot_out_of_bounds_is_ignored() {
        let mut buf = CellBuffer::new(2, 2);
        buf.set_dot(4, 0, Color::WHITE);
        buf.set_dot(0, 8, Color::WHITE);
        assert_eq!(buf.to_plain_text(), "\n");
    }

    #[test]
    fn test_dots_do_not_overwrite_text() {
        let mut buf = CellBuffer::new(4, 1);
        buf.put_text(0, 0, "L1", None);
        buf.set_dot(0, 0, Color::WHITE);
        assert_eq!(buf.row_text(0), "L1");
    }

    #[test]
    fn test_text_overwrites_dots() {
        let mut buf = CellBuffer::new(4, 1);
        buf.set_dot(0, 0, Color::WHITE);
        buf.put_char(0, 0, '•', Some(Color::BLACK));
        let cell = buf.get(0, 0).unwrap();
        assert_eq!(cell.symbol, '•');
        assert_eq!(cell.dots(), 0);
        assert_eq!(cell.fg, Some(Color::BLACK));
    }

    #[test]
    fn test_put_text_clips() {
        let mut buf = CellBuffer::new(5, 1);
        assert_eq!(buf.put_text(2, 0, "DRAM", None), 3);
        assert_eq!(buf.row_text(0), "  DRA");
    }

    #[test]
    fn test_wide_characters() {
        let mut buf = CellBuffer::new(6, 1);
        assert_eq!(buf.put_text(0, 0, "日本", None), 4);
        assert!(buf.get(1, 0).unwrap().is_continuation());
        assert_eq!(buf.row_text(0), "日本");
    }

    #[test]
    fn test_row_out_of_range() {
        let buf = CellBuffer::new(3, 1);
        assert!(buf.row(5).is_empty());
        assert!(buf.get(3, 0).is_none());
    }
}
