//! Key input and canonical key names.
//!
//! Bindings and events refer to keys by name: `ENTER`, `ESC`, `SPACE`,
//! `TAB`, `F1`..`F12`, the arrow and paging keys, `BACKSPACE`, `DC`
//! (delete), `IC` (insert), `^X` for control characters and the character
//! itself for everything else.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthChar;

/// A decoded key, independent of the terminal backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Enter,
    Esc,
    Tab,
    Backspace,
    Delete,
    Insert,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Function(u8),
    Char(char),
}

/// A key press with its control-modifier state.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        KeyInput { key, ctrl: false }
    }

    pub fn ch(c: char) -> Self {
        KeyInput { key: Key::Char(c), ctrl: false }
    }

    pub fn ctrl(c: char) -> Self {
        KeyInput { key: Key::Char(c), ctrl: true }
    }

    /// The canonical name used in binding descriptions and events.
    pub fn name(&self) -> String {
        if self.ctrl {
            if let Key::Char(c) = self.key {
                return format!("^{}", c.to_ascii_uppercase());
            }
        }
        match self.key {
            Key::Enter => "ENTER".into(),
            Key::Esc => "ESC".into(),
            Key::Tab => "TAB".into(),
            Key::Backspace => "BACKSPACE".into(),
            Key::Delete => "DC".into(),
            Key::Insert => "IC".into(),
            Key::Left => "LEFT".into(),
            Key::Right => "RIGHT".into(),
            Key::Up => "UP".into(),
            Key::Down => "DOWN".into(),
            Key::Home => "HOME".into(),
            Key::End => "END".into(),
            Key::PageUp => "PPAGE".into(),
            Key::PageDown => "NPAGE".into(),
            Key::Function(n) => format!("F{n}"),
            Key::Char(' ') => "SPACE".into(),
            Key::Char(c) => c.to_string(),
        }
    }

    /// True for keys that insert text: an unmodified character with a
    /// nonzero display width.
    pub fn is_printable(&self) -> bool {
        match self.key {
            Key::Char(c) => !self.ctrl && c.width().unwrap_or(0) > 0,
            _ => false,
        }
    }

    /// The character to insert, for printable keys.
    pub fn printable_char(&self) -> Option<char> {
        if self.is_printable() {
            match self.key {
                Key::Char(c) => Some(c),
                _ => None,
            }
        } else {
            None
        }
    }

    /// Decode a terminal key event. Keys with no name in the binding
    /// vocabulary map to `None`.
    pub fn from_event(event: &KeyEvent) -> Option<Self> {
        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        let key = match event.code {
            KeyCode::Enter => Key::Enter,
            KeyCode::Esc => Key::Esc,
            KeyCode::Tab => Key::Tab,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Insert => Key::Insert,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            KeyCode::F(n) => Key::Function(n),
            KeyCode::Char(c) => Key::Char(c),
            _ => return None,
        };
        Some(KeyInput { key, ctrl })
    }
}

// ===========================================================================
// Tests
// ===========================================================================
