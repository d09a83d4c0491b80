use std::io::{self, Write};

use crossterm::cursor::MoveToPreviousLine;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};

/// Moves the cursor to the start of the line `lines` rows up and clears
/// everything from there to the end of the screen.
pub fn erase_lines<W: Write>(out: &mut W, lines: usize) -> io::Result<()> {
    if lines == 0 {
        return Ok(());
    }
    let lines = u16::try_from(lines).unwrap_or(u16::MAX);
    queue!(out, MoveToPreviousLine(lines), Clear(ClearType::FromCursorDown))?;
    out.flush()
}
