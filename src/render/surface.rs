//! Off-screen cell grid the widgets draw into.
//!
//! Drawing follows a current-style model: callers select a style once with
//! [`Surface::set_style`] and every subsequent put inherits it. All drawing
//! primitives clip against the grid bounds, so widgets can draw with their
//! assigned rect without bounds checks of their own.
//!
//! Wide characters occupy their first column; the covered continuation
//! columns hold a `'\0'` marker cell that rendering skips.

use unicode_width::UnicodeWidthChar;

use crate::geometry::Size;
use crate::render::style::CellStyle;

/// One character cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        style: CellStyle {
            fg: None,
            bg: None,
            standout: false,
            underline: false,
            reverse: false,
            blink: false,
            dim: false,
            bold: false,
            protect: false,
            invis: false,
        },
    };

    /// True for the marker cell covered by a preceding wide character.
    pub fn is_continuation(&self) -> bool {
        self.ch == '\0'
    }
}

/// A rectangular grid of cells.
#[derive(Clone, Debug)]
pub struct Surface {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    style: CellStyle,
}

impl Surface {
    /// A blank surface of the given size. Negative dimensions clamp to zero.
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Surface {
            width,
            height,
            cells: vec![Cell::BLANK; (width * height) as usize],
            style: CellStyle::default(),
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Select the style for subsequent drawing.
    pub fn set_style(&mut self, style: CellStyle) {
        self.style = style;
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            None
        } else {
            Some((y * self.width + x) as usize)
        }
    }

    /// Put one character at (x, y) in the current style.
    ///
    /// Wide characters write a continuation marker into the columns they
    /// cover; a wide character that would overhang the right edge is
    /// replaced by a space. Off-grid positions are ignored.
    pub fn put_ch(&mut self, x: i32, y: i32, ch: char) {
        let w = ch.width().unwrap_or(0) as i32;
        if w == 0 {
            return;
        }
        let Some(i) = self.index(x, y) else { return };
        if x + w > self.width {
            self.cells[i] = Cell { ch: ' ', style: self.style };
            return;
        }
        // Overwriting half of an existing wide character leaves its other
        // half dangling. Blank out both halves first.
        self.clear_overlap(x, y);
        self.clear_overlap(x + w - 1, y);
        self.cells[i] = Cell { ch, style: self.style };
        for c in 1..w {
            let j = self.index(x + c, y).unwrap();
            self.cells[j] = Cell { ch: '\0', style: self.style };
        }
    }

    fn clear_overlap(&mut self, x: i32, y: i32) {
        let Some(i) = self.index(x, y) else { return };
        if self.cells[i].is_continuation() {
            // Walk back to the wide character that owns this column.
            let mut k = x;
            while k > 0 && self.cells[self.index(k, y).unwrap()].is_continuation() {
                k -= 1;
            }
            let end = k + self.cells[self.index(k, y).unwrap()].ch.width().unwrap_or(1) as i32;
            for c in k..end {
                let j = self.index(c, y).unwrap();
                self.cells[j] = Cell { ch: ' ', style: self.cells[j].style };
            }
        } else if self.cells[i].ch.width().unwrap_or(1) > 1 {
            let end = x + self.cells[i].ch.width().unwrap_or(1) as i32;
            for c in x..end {
                let Some(j) = self.index(c, y) else { break };
                self.cells[j] = Cell { ch: ' ', style: self.cells[j].style };
            }
        }
    }

    /// Draw a string starting at (x, y), clipped to `max_width` columns and
    /// to the grid. Returns the number of columns consumed.
    pub fn put_str(&mut self, x: i32, y: i32, text: &str, max_width: i32) -> i32 {
        let mut cursor = 0;
        for ch in text.chars() {
            let w = ch.width().unwrap_or(0) as i32;
            if w == 0 {
                continue;
            }
            if cursor + w > max_width {
                break;
            }
            self.put_ch(x + cursor, y, ch);
            cursor += w;
        }
        cursor
    }

    /// Fill `width` columns starting at (x, y) with `ch`.
    pub fn fill(&mut self, x: i32, y: i32, width: i32, ch: char) {
        for c in 0..width.max(0) {
            self.put_ch(x + c, y, ch);
        }
    }

    /// Horizontal rule of `len` cells.
    pub fn hline(&mut self, x: i32, y: i32, len: i32, ch: char) {
        for c in 0..len.max(0) {
            self.put_ch(x + c, y, ch);
        }
    }

    /// Vertical rule of `len` cells.
    pub fn vline(&mut self, x: i32, y: i32, len: i32, ch: char) {
        for r in 0..len.max(0) {
            self.put_ch(x, y + r, ch);
        }
    }

    /// Render the grid as newline-separated text, dropping styles.
    /// Continuation cells are skipped so wide characters come out once.
    pub fn to_text(&self) -> String {
        let mut out = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for y in 0..self.height {
            if y > 0 {
                out.push('\n');
            }
            for x in 0..self.width {
                let cell = &self.cells[self.index(x, y).unwrap()];
                if !cell.is_continuation() {
                    out.push(cell.ch);
                }
            }
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Line-drawing junctions
// ---------------------------------------------------------------------------

/// Pick the box-drawing glyph for a junction with rules arriving from the
/// given directions. No arriving rule yields `None`.
pub fn junction(left: bool, right: bool, up: bool, down: bool) -> Option<char> {
    match (left, right, up, down) {
        (false, false, false, false) => None,
        (false, false, _, _) => Some('│'),
        (_, _, false, false) => Some('─'),
        (false, true, false, true) => Some('┌'),
        (false, true, true, false) => Some('└'),
        (false, true, true, true) => Some('├'),
        (true, false, false, true) => Some('┐'),
        (true, false, true, false) => Some('┘'),
        (true, false, true, true) => Some('┤'),
        (true, true, false, true) => Some('┬'),
        (true, true, true, false) => Some('┴'),
        (true, true, true, true) => Some('┼'),
    }
}

// ===========================================================================
// Tests
// ===========================================================================
