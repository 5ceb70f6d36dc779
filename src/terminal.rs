use anyhow::Context;
use crossterm::{
    cursor,
    terminal::{self, ClearType},
    ExecutableCommand,
};
use std::io::{stdout, Stdout, Write};

/// Smallest terminal that still holds a recognizable wheel: 8 columns by 4
/// rows gives an 8x8 half-block canvas.
pub const MIN_COLS: u16 = 8;
pub const MIN_ROWS: u16 = 4;

pub fn fits_wheel(cols: u16, rows: u16) -> bool {
    cols >= MIN_COLS && rows >= MIN_ROWS
}

/// Raw mode plus alternate screen for the lifetime of the guard. Creation fails
/// up front, before any mode change, when the terminal cannot hold the wheel.
pub struct TerminalGuard {
    size: (u16, u16),
}

impl TerminalGuard {
    pub fn new() -> anyhow::Result<Self> {
        let (cols, rows) = terminal::size().context("get terminal size")?;
        if !fits_wheel(cols, rows) {
            anyhow::bail!(
                "terminal too small for the wheel (need at least {MIN_COLS}x{MIN_ROWS}, got {cols}x{rows})"
            );
        }

        terminal::enable_raw_mode().context("enable raw mode")?;
        let guard = Self { size: (cols, rows) };

        let mut out = stdout();
        out.execute(terminal::EnterAlternateScreen)
            .context("enter alternate screen")?;
        out.execute(terminal::Clear(ClearType::All))
            .context("clear screen")?;
        out.execute(cursor::Hide).context("hide cursor")?;

        Ok(guard)
    }

    /// Size in cells when the guard was created.
    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    pub fn stdout() -> Stdout {
        stdout()
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let mut out = stdout();
        let _ = out.write_all(b"\x1b[?2026l\x1b[?7h\x1b[0m");
        let _ = out.flush();
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
    }
}
