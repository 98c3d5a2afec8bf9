//! Selection list.
//!
//! Children are `listitem` widgets whose `text` kv is one row. The `pos` kv
//! selects a row, `offset` scrolls the window and `pos_name` mirrors the
//! selected item's name for the program to read back.

use unicode_width::UnicodeWidthStr;

use crate::event::{matchbind, KeyInput};
use crate::form::FormState;
use crate::geometry::Size;
use crate::render::Surface;
use crate::tree::NodeId;
use crate::widget::Behavior;
use crate::widgets::{is_focused, select_style};

pub struct ListBehavior;

/// Clamp `pos` into the item range and scroll `offset` so the selection
/// stays visible. Returns the clamped pair.
fn fix_offset_pos(f: &mut FormState, w: NodeId) -> (i32, i32) {
    let maxpos = f.tree.children(w).len() as i32 - 1;
    let height = f.tree.node(w).rect.height;
    let mut pos = f.tree.scoped_int(w, "pos", 0).clamp(0, maxpos.max(0));
    if maxpos < 0 {
        pos = 0;
    }
    let mut offset = f.tree.scoped_int(w, "offset", 0).max(0);
    while pos < offset {
        offset -= 1;
    }
    while height > 0 && pos >= offset + height {
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

impl Behavior for ListBehavior {
    fn prepare(&self, f: &mut FormState, w: NodeId) {
        let children = f.tree.children(w).to_vec();
        let mut width = 1;
        for &c in &children {
            width = width.max(f.tree.scoped_or(c, "text", "").width() as i32);
        }
        let node = f.tree.node_mut(w);
        node.min = Size::new(width, 5);
        node.focusable = !children.is_empty();
    }

    fn draw(&self, f: &mut FormState, w: NodeId, surface: &mut Surface) {
        let (pos, offset) = fix_offset_pos(f, w);
        let rect = f.tree.node(w).rect;
        let children = f.tree.children(w).to_vec();
        let focused = is_focused(f, w);

        select_style(f, w, surface, "style_normal");
        for row in 0..rect.height {
            surface.fill(rect.x, rect.y + row, rect.width, ' ');
        }
        for row in 0..rect.height {
            let Some(&c) = children.get((offset + row) as usize) else { break };
            if offset + row == pos {
                let key = if focused { "style_focus" } else { "style_selected" };
                select_style(f, c, surface, key);
            } else {
                select_style(f, c, surface, "style_normal");
            }
            let text = f.tree.scoped_or(c, "text", "");
            let used = surface.put_str(rect.x, rect.y + row, &text, rect.width);
            surface.fill(rect.x + used, rect.y + row, rect.width - used, ' ');
        }

        let pos_name = children
            .get(pos as usize)
            .and_then(|&c| f.tree.node(c).name.clone())
            .unwrap_or_default();
        f.tree.node_mut(w).set_kv("pos_name", &pos_name);
        if focused {
            f.cursor = None;
        }
    }

    fn process(&self, f: &mut FormState, w: NodeId, _fw: NodeId, key: &KeyInput) -> bool {
        let maxpos = f.tree.children(w).len() as i32 - 1;
        let height = f.tree.node(w).rect.height;
        let pos = f.tree.scoped_int(w, "pos", 0);

        let new_pos = if matchbind(&f.tree, w, key, "up", "UP") {
            (pos > 0).then(|| pos - 1)
        } else if matchbind(&f.tree, w, key, "down", "DOWN") {
            (pos < maxpos).then(|| pos + 1)
        } else if matchbind(&f.tree, w, key, "page_up", "PPAGE") {
            (pos > 0).then(|| (pos - height + 1).max(0))
        } else if matchbind(&f.tree, w, key, "page_down", "NPAGE") {
            (pos < maxpos).then(|| (pos + height - 1).min(maxpos))
        } else if matchbind(&f.tree, w, key, "home", "HOME") {
            (pos > 0).then_some(0)
        } else if matchbind(&f.tree, w, key, "end", "END") {
            (pos < maxpos).then_some(maxpos)
        } else {
            None
        };

        match new_pos {
            Some(p) => {
                f.tree.node_mut(w).set_kv_int("pos", p);
                fix_offset_pos(f, w);
                true
            }
            None => false,
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
