//! Streams a [`CellBuffer`] to a terminal or any `io::Write`.

use crate::buffer::CellBuffer;
use crate::color::ColorMode;
use crate::error::RenderError;
use crossterm::queue;
use crossterm::style::{Color as CrosstermColor, Print, ResetColor, SetForegroundColor};
use std::io::{BufWriter, Write};

/// Writes buffers row by row as styled text. Unlike a full-screen
/// renderer it never moves the cursor, so the output can be piped.
#[derive(Debug)]
pub struct TerminalWriter<W: Write> {
    out: BufWriter<W>,
    mode: ColorMode,
    style_changes: usize,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(out: W, mode: ColorMode) -> Self {
        Self {
            out: BufWriter::with_capacity(8192, out),
            mode,
            style_changes: 0,
        }
    }

    #[must_use]
    pub const fn mode(&self) -> ColorMode {
        self.mode
    }

    /// Foreground changes emitted so far.
    #[must_use]
    pub const fn style_changes(&self) -> usize {
        self.style_changes
    }

    /// Write every row followed by a newline, then flush.
    pub fn write_buffer(&mut self, buffer: &CellBuffer) -> Result<(), RenderError> {
        for y in 0..buffer.height() {
            // Colour actually emitted; always `None` in mono mode.
            let mut current: Option<CrosstermColor> = None;
            let row = buffer.row(y);
            // Trailing blanks add nothing but escape codes.
            let used = row
                .iter()
                .rposition(|c| c.symbol != ' ' || c.dots() != 0)
                .map_or(0, |i| i + 1);
            for cell in &row[..used] {
                if cell.is_continuation() {
                    continue;
                }
                let wanted = cell
                    .fg
                    .filter(|_| cell.symbol != ' ')
                    .and_then(|c| self.mode.to_crossterm(c));
                if wanted != current {
                    self.apply(wanted)?;
                    current = wanted;
                }
                queue!(self.out, Print(cell.symbol))?;
            }
            if current.is_some() {
                queue!(self.out, ResetColor)?;
            }
            queue!(self.out, Print('\n'))?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Write a blank separator line.
    pub fn write_blank_line(&mut self) -> Result<(), RenderError> {
        queue!(self.out, Print('\n'))?;
        self.out.flush()?;
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W, RenderError> {
        self.out
            .into_inner()
            .map_err(|e| RenderError::Io(e.into_error()))
    }

    fn apply(&mut self, color: Option<CrosstermColor>) -> Result<(), RenderError> {
        match color {
            Some(fg) => queue!(self.out, SetForegroundColor(fg))?,
            None => queue!(self.out, ResetColor)?,
        }
        self.style_changes += 1;
        Ok(())
    }
}
