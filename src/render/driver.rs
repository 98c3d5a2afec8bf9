//! Terminal backend.
//!
//! Owns the real terminal: raw mode, the alternate screen and the buffered
//! writer the rendered surface is flushed through. Everything above this
//! module draws into a [`Surface`]; only the driver talks to crossterm.

use std::io::{self, BufWriter, Stdout, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event};
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::queue;

use crate::render::style::{CellStyle, NamedColor};
use crate::render::surface::Surface;

/// Terminal driver. Restores the terminal on drop.
pub struct Driver {
    out: BufWriter<Stdout>,
    active: bool,
}

impl Driver {
    /// Enter raw mode and the alternate screen.
    pub fn new() -> io::Result<Self> {
        let mut out = BufWriter::new(io::stdout());
        terminal::enable_raw_mode()?;
        queue!(out, EnterAlternateScreen, Hide)?;
        out.flush()?;
        Ok(Driver { out, active: true })
    }

    /// Current terminal size in cells.
    pub fn size(&self) -> io::Result<(i32, i32)> {
        let (w, h) = terminal::size()?;
        Ok((i32::from(w), i32::from(h)))
    }

    /// Write the whole surface to the terminal, then place or hide the
    /// hardware cursor.
    pub fn present(&mut self, surface: &Surface, cursor: Option<(i32, i32)>) -> io::Result<()> {
        queue!(self.out, MoveTo(0, 0), Clear(ClearType::All))?;
        let mut current: Option<CellStyle> = None;
        for y in 0..surface.height() {
            queue!(self.out, MoveTo(0, y as u16))?;
            for x in 0..surface.width() {
                let cell = surface.cell(x, y).expect("cell in bounds");
                if cell.is_continuation() {
                    continue;
                }
                if current != Some(cell.style) {
                    self.apply_style(cell.style)?;
                    current = Some(cell.style);
                }
                queue!(self.out, Print(cell.ch))?;
            }
        }
        queue!(self.out, ResetColor, SetAttribute(Attribute::Reset))?;
        match cursor {
            Some((x, y)) if x >= 0 && y >= 0 => {
                queue!(self.out, MoveTo(x as u16, y as u16), Show)?;
            }
            _ => queue!(self.out, Hide)?,
        }
        self.out.flush()
    }

    fn apply_style(&mut self, style: CellStyle) -> io::Result<()> {
        queue!(self.out, ResetColor, SetAttribute(Attribute::Reset))?;
        if let Some(fg) = style.fg {
            queue!(self.out, SetForegroundColor(map_color(fg)))?;
        }
        if let Some(bg) = style.bg {
            queue!(self.out, SetBackgroundColor(map_color(bg)))?;
        }
        if style.bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        if style.dim {
            queue!(self.out, SetAttribute(Attribute::Dim))?;
        }
        if style.underline {
            queue!(self.out, SetAttribute(Attribute::Underlined))?;
        }
        if style.blink {
            queue!(self.out, SetAttribute(Attribute::SlowBlink))?;
        }
        // Standout has no direct counterpart; reverse video is the closest.
        if style.reverse || style.standout {
            queue!(self.out, SetAttribute(Attribute::Reverse))?;
        }
        if style.invis {
            queue!(self.out, SetAttribute(Attribute::Hidden))?;
        }
        // Protect is accepted but has no terminal effect.
        Ok(())
    }

    /// Wait for the next input event. `timeout` of `None` blocks forever;
    /// `Some` returns `Ok(None)` once the duration elapses with no input.
    pub fn wait_event(&mut self, timeout: Option<Duration>) -> io::Result<Option<Event>> {
        match timeout {
            Some(limit) => {
                if event::poll(limit)? {
                    Ok(Some(event::read()?))
                } else {
                    Ok(None)
                }
            }
            None => Ok(Some(event::read()?)),
        }
    }

    /// Leave the alternate screen and raw mode.
    pub fn shutdown(&mut self) -> io::Result<()> {
        if self.active {
            self.active = false;
            queue!(self.out, ResetColor, SetAttribute(Attribute::Reset))?;
            queue!(self.out, Show, LeaveAlternateScreen)?;
            self.out.flush()?;
            terminal::disable_raw_mode()?;
        }
        Ok(())
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}

fn map_color(color: NamedColor) -> Color {
    match color {
        NamedColor::Black => Color::Black,
        NamedColor::Red => Color::DarkRed,
        NamedColor::Green => Color::DarkGreen,
        NamedColor::Yellow => Color::DarkYellow,
        NamedColor::Blue => Color::DarkBlue,
        NamedColor::Magenta => Color::DarkMagenta,
        NamedColor::Cyan => Color::DarkCyan,
        NamedColor::White => Color::White,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
