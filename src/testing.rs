//! Headless testing helpers: drive a form without a terminal.
//!
//! [`Pilot`] wraps a [`Form`], simulates key presses and captures the
//! program-level events they produce. [`render_to_string`] captures a
//! render pass as plain text for snapshot-style assertions.

use crate::error::Error;
use crate::event::{Key, KeyInput};
use crate::form::{Form, FormState};

// ---------------------------------------------------------------------------
// Snapshot rendering
// ---------------------------------------------------------------------------

/// Render the form into a `width` x `height` grid and return it as text.
///
/// Each row becomes one line with trailing spaces trimmed; lines are joined
/// with `'\n'` and the result carries no trailing newline.
pub fn render_to_string(f: &mut FormState, width: i32, height: i32) -> String {
    let text = f.render(width, height).to_text();
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.lines().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(line.trim_end());
    }
    out
}

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless form driver.
///
/// The pilot renders into an off-screen grid of a fixed size, feeds keys
/// through the same dispatch path the interactive loop uses, and records
/// the events that come back out.
pub struct Pilot {
    form: Form,
    width: i32,
    height: i32,
    events: Vec<String>,
}

impl Pilot {
    /// Parse a description and set up a headless form of the given size.
    pub fn new(text: &str, width: i32, height: i32) -> Result<Self, Error> {
        let form = Form::create(text)?;
        let mut pilot = Pilot { form, width, height, events: Vec::new() };
        pilot.redraw();
        Ok(pilot)
    }

    fn redraw(&mut self) {
        let (width, height) = (self.width, self.height);
        self.form.with_state(|st| {
            st.render(width, height);
        });
    }

    /// Simulate one key press. Any resulting program-level event is
    /// recorded and also returned.
    pub fn press(&mut self, key: KeyInput) -> Option<String> {
        self.redraw();
        let event = self.form.with_state(|st| st.handle_key(&key));
        if let Some(event) = &event {
            self.events.push(event.clone());
        }
        event
    }

    /// Simulate typing each character of `text` as separate key presses.
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyInput::ch(c));
        }
    }

    /// Press a non-character key without modifiers.
    pub fn press_plain(&mut self, key: Key) -> Option<String> {
        self.press(KeyInput::plain(key))
    }

    /// Capture the current screen as trimmed text.
    pub fn screen(&mut self) -> String {
        let (width, height) = (self.width, self.height);
        self.form.with_state(|st| render_to_string(st, width, height))
    }

    /// The cursor position requested by the last render, if any.
    pub fn cursor(&mut self) -> Option<(i32, i32)> {
        self.redraw();
        self.form.with_state(|st| st.cursor)
    }

    /// All program-level events recorded so far, oldest first.
    pub fn events(&self) -> &[String] {
        &self.events
    }

    /// The underlying form, for get/set/modify/dump calls.
    pub fn form(&self) -> &Form {
        &self.form
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn screen_trims_trailing_blanks() {
        let mut pilot = Pilot::new("label text:hi\n", 6, 2).unwrap();
        assert_eq!(pilot.screen(), "hi\n");
    }

    #[test]
    fn typing_reaches_the_focused_input() {
        let mut pilot = Pilot::new("input[i] text[t]:\n", 10, 1).unwrap();
        pilot.type_text("ok");
        assert_eq!(pilot.form().get("t").as_deref(), Some("ok"));
        assert!(pilot.events().is_empty());
    }

    #[test]
    fn unbound_keys_surface_as_events() {
        let mut pilot = Pilot::new("label text:x\n", 10, 1).unwrap();
        assert_eq!(pilot.press_plain(Key::Enter).as_deref(), Some("ENTER"));
        assert_eq!(pilot.events(), ["ENTER"]);
    }

    #[test]
    fn cursor_follows_the_input() {
        let mut pilot = Pilot::new("input[i] text[t]:abc pos:3\n", 10, 1).unwrap();
        assert_eq!(pilot.cursor(), Some((3, 0)));
    }
}
