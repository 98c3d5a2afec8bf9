//! Single-line text entry.
//!
//! The edited text lives in the `text` kv, the cursor in `pos` and the
//! horizontal scroll in `offset`. Positions are character indices, not
//! bytes, so multibyte input behaves. A `modal` input traps the navigation
//! keys that would otherwise move focus away.

use crate::event::{matchbind, Key, KeyInput};
use crate::form::FormState;
use crate::geometry::Size;
use crate::render::Surface;
use crate::tree::{NodeId, Tree};
use crate::widget::Behavior;
use crate::widgets::{is_focused, select_style};

pub struct InputBehavior;

/// Clamp `pos` and `offset` into the text and scroll the window so the
/// cursor stays visible. Returns the clamped pair.
fn fix_offset_pos(f: &mut FormState, w: NodeId) -> (i32, i32) {
    let len = f.tree.scoped_or(w, "text", "").chars().count() as i32;
    let width = f.tree.node(w).rect.width;
    let mut pos = f.tree.scoped_int(w, "pos", 0).clamp(0, len);
    let mut offset = f.tree.scoped_int(w, "offset", 0).clamp(0, len);
    if offset > pos {
        offset = pos;
    }
    while width > 0 && pos - offset >= width {
        offset += 1;
    }
    if pos != f.tree.scoped_int(w, "pos", 0) {
        f.tree.node_mut(w).set_kv_int("pos", pos);
    }
    if offset != f.tree.scoped_int(w, "offset", 0) {
        f.tree.node_mut(w).set_kv_int("offset", offset);
    }
    (pos, offset)
}

fn set_text(f: &mut FormState, w: NodeId, chars: &[char], pos: i32) {
    let text: String = chars.iter().collect();
    let node = f.tree.node_mut(w);
    node.set_kv("text", &text);
    node.set_kv_int("pos", pos);
    fix_offset_pos(f, w);
}

impl Behavior for InputBehavior {
    fn init(&self, tree: &mut Tree, w: NodeId) {
        tree.node_mut(w).focusable = true;
    }

    fn prepare(&self, f: &mut FormState, w: NodeId) {
        let size = f.tree.scoped_int(w, "size", 5);
        f.tree.node_mut(w).min = Size::new(size, 1);
        fix_offset_pos(f, w);
    }

    fn draw(&self, f: &mut FormState, w: NodeId, surface: &mut Surface) {
        let (pos, offset) = fix_offset_pos(f, w);
        let rect = f.tree.node(w).rect;
        let text = f.tree.scoped_or(w, "text", "");
        select_style(f, w, surface, "style_normal");
        surface.fill(rect.x, rect.y, rect.width, ' ');
        let visible: String = text.chars().skip(offset as usize).collect();
        surface.put_str(rect.x, rect.y, &visible, rect.width);
        if is_focused(f, w) {
            f.cursor = Some((rect.x + pos - offset, rect.y));
        }
    }

    fn process(&self, f: &mut FormState, w: NodeId, _fw: NodeId, key: &KeyInput) -> bool {
        let chars: Vec<char> = f.tree.scoped_or(w, "text", "").chars().collect();
        let len = chars.len() as i32;
        let (pos, _) = fix_offset_pos(f, w);

        if f.tree.scoped_int(w, "modal", 0) != 0 && !key.ctrl {
            let trapped = match key.key {
                Key::Tab | Key::Up | Key::Down => true,
                Key::Left => pos <= 0,
                Key::Right => pos >= len,
                _ => false,
            };
            if trapped {
                return true;
            }
        }

        if matchbind(&f.tree, w, key, "left", "LEFT") {
            if pos <= 0 {
                return false;
            }
            f.tree.node_mut(w).set_kv_int("pos", pos - 1);
            fix_offset_pos(f, w);
            return true;
        }
        if matchbind(&f.tree, w, key, "right", "RIGHT") {
            if pos >= len {
                return false;
            }
            f.tree.node_mut(w).set_kv_int("pos", pos + 1);
            fix_offset_pos(f, w);
            return true;
        }
        if matchbind(&f.tree, w, key, "home", "HOME ^A") {
            f.tree.node_mut(w).set_kv_int("pos", 0);
            fix_offset_pos(f, w);
            return true;
        }
        if matchbind(&f.tree, w, key, "end", "END ^E") {
            f.tree.node_mut(w).set_kv_int("pos", len);
            fix_offset_pos(f, w);
            return true;
        }
        if matchbind(&f.tree, w, key, "delete", "DC") {
            if pos >= len {
                return false;
            }
            let mut chars = chars;
            chars.remove(pos as usize);
            set_text(f, w, &chars, pos);
            return true;
        }
        if matchbind(&f.tree, w, key, "backspace", "BACKSPACE ^H") {
            if pos <= 0 {
                return false;
            }
            let mut chars = chars;
            chars.remove(pos as usize - 1);
            set_text(f, w, &chars, pos - 1);
            return true;
        }
        if let Some(c) = key.printable_char() {
            let mut chars = chars;
            chars.insert(pos as usize, c);
            set_text(f, w, &chars, pos + 1);
            return true;
        }
        false
    }
}

// ===========================================================================
// Tests
// ===========================================================================
