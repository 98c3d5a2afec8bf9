//! Multi-line text: the read-only pager and the line editor.
//!
//! Both widgets keep one `listitem` child per line. The pager scrolls with
//! the `offset` kv; the editor tracks `cursor_x`/`cursor_y` and derives the
//! `scroll_x`/`scroll_y` window from them. Rows past the last line show a
//! `~` marker in the `style_end` style.

use unicode_width::UnicodeWidthStr;

use crate::event::{matchbind, KeyInput};
use crate::form::FormState;
use crate::geometry::Size;
use crate::render::Surface;
use crate::tree::{Node, NodeId};
use crate::widget::{Behavior, WidgetKind};
use crate::widgets::{is_focused, select_style};

pub struct TextViewBehavior;
pub struct TextEditBehavior;

fn prepare_lines(f: &mut FormState, w: NodeId) {
    let children = f.tree.children(w).to_vec();
    let mut width = 1;
    for &c in &children {
        width = width.max(f.tree.scoped_or(c, "text", "").width() as i32);
    }
    let node = f.tree.node_mut(w);
    node.min = Size::new(width, 5);
    node.focusable = !children.is_empty();
}

fn draw_end_marker(f: &FormState, w: NodeId, surface: &mut Surface, x: i32, y: i32, width: i32) {
    select_style(f, w, surface, "style_end");
    surface.put_ch(x, y, '~');
    surface.fill(x + 1, y, width - 1, ' ');
}

// ---------------------------------------------------------------------------
// textview
// ---------------------------------------------------------------------------

impl Behavior for TextViewBehavior {
    fn prepare(&self, f: &mut FormState, w: NodeId) {
        prepare_lines(f, w);
    }

    fn draw(&self, f: &mut FormState, w: NodeId, surface: &mut Surface) {
        let rect = f.tree.node(w).rect;
        let children = f.tree.children(w).to_vec();
        let offset = f.tree.scoped_int(w, "offset", 0).max(0);
        for row in 0..rect.height {
            match children.get((offset + row) as usize) {
                Some(&c) => {
                    select_style(f, w, surface, "style_normal");
                    let text = f.tree.scoped_or(c, "text", "");
                    let used = surface.put_str(rect.x, rect.y + row, &text, rect.width);
                    surface.fill(rect.x + used, rect.y + row, rect.width - used, ' ');
                }
                None => draw_end_marker(f, w, surface, rect.x, rect.y + row, rect.width),
            }
        }
        if is_focused(f, w) {
            f.cursor = None;
        }
    }

    fn process(&self, f: &mut FormState, w: NodeId, _fw: NodeId, key: &KeyInput) -> bool {
        let len = f.tree.children(w).len() as i32;
        let height = f.tree.node(w).rect.height;
        let maxoffset = (len - height).max(0);
        let offset = f.tree.scoped_int(w, "offset", 0).clamp(0, maxoffset);

        let new_offset = if matchbind(&f.tree, w, key, "up", "UP") {
            (offset > 0).then(|| offset - 1)
        } else if matchbind(&f.tree, w, key, "down", "DOWN") {
            (offset < maxoffset).then(|| offset + 1)
        } else if matchbind(&f.tree, w, key, "page_up", "PPAGE b") {
            (offset > 0).then(|| (offset - height + 1).max(0))
        } else if matchbind(&f.tree, w, key, "page_down", "NPAGE SPACE") {
            (offset < maxoffset).then(|| (offset + height - 1).min(maxoffset))
        } else if matchbind(&f.tree, w, key, "home", "HOME") {
            (offset > 0).then_some(0)
        } else if matchbind(&f.tree, w, key, "end", "END") {
            (offset < maxoffset).then_some(maxoffset)
        } else {
            None
        };

        match new_offset {
            Some(o) => {
                f.tree.node_mut(w).set_kv_int("offset", o);
                true
            }
            None => false,
        }
    }
}

// ---------------------------------------------------------------------------
// textedit
// ---------------------------------------------------------------------------

fn line_chars(f: &FormState, line: NodeId) -> Vec<char> {
    f.tree.scoped_or(line, "text", "").chars().collect()
}

fn set_line(f: &mut FormState, line: NodeId, chars: &[char]) {
    let text: String = chars.iter().collect();
    f.tree.node_mut(line).set_kv("text", &text);
}

impl Behavior for TextEditBehavior {
    fn prepare(&self, f: &mut FormState, w: NodeId) {
        prepare_lines(f, w);
    }

    fn draw(&self, f: &mut FormState, w: NodeId, surface: &mut Surface) {
        let rect = f.tree.node(w).rect;
        let children = f.tree.children(w).to_vec();
        let cursor_x = f.tree.scoped_int(w, "cursor_x", 0).max(0);
        let cursor_y = f
            .tree
            .scoped_int(w, "cursor_y", 0)
            .clamp(0, (children.len() as i32 - 1).max(0));
        let mut scroll_x = f.tree.scoped_int(w, "scroll_x", 0).max(0);
        let mut scroll_y = f.tree.scoped_int(w, "scroll_y", 0).max(0);

        if cursor_x < scroll_x {
            scroll_x = cursor_x;
        }
        if rect.width > 0 && cursor_x >= scroll_x + rect.width - 1 {
            scroll_x = cursor_x - rect.width + 1;
        }
        if cursor_y < scroll_y {
            scroll_y = cursor_y;
        }
        if rect.height > 0 && cursor_y >= scroll_y + rect.height {
            scroll_y = cursor_y - rect.height + 1;
        }
        f.tree.node_mut(w).set_kv_int("scroll_x", scroll_x);
        f.tree.node_mut(w).set_kv_int("scroll_y", scroll_y);

        for row in 0..rect.height {
            match children.get((scroll_y + row) as usize) {
                Some(&c) => {
                    select_style(f, w, surface, "style_normal");
                    let visible: String = f
                        .tree
                        .scoped_or(c, "text", "")
                        .chars()
                        .skip(scroll_x as usize)
                        .collect();
                    let used = surface.put_str(rect.x, rect.y + row, &visible, rect.width);
                    surface.fill(rect.x + used, rect.y + row, rect.width - used, ' ');
                }
                None => draw_end_marker(f, w, surface, rect.x, rect.y + row, rect.width),
            }
        }

        if is_focused(f, w) {
            let line_len = children
                .get(cursor_y as usize)
                .map(|&c| line_chars(f, c).len() as i32)
                .unwrap_or(0);
            let clipped_x = cursor_x.min(line_len);
            f.cursor = Some((rect.x + clipped_x - scroll_x, rect.y + cursor_y - scroll_y));
        }
    }

    fn process(&self, f: &mut FormState, w: NodeId, _fw: NodeId, key: &KeyInput) -> bool {
        if f.tree.children(w).is_empty() {
            let mut line = Node::new(WidgetKind::ListItem);
            line.set_kv("text", "");
            f.tree.insert_child(w, line);
        }
        let lines = f.tree.children(w).to_vec();
        let last = lines.len() as i32 - 1;
        let height = f.tree.node(w).rect.height;
        let cursor_y = f.tree.scoped_int(w, "cursor_y", 0).clamp(0, last);
        let line = lines[cursor_y as usize];
        let chars = line_chars(f, line);
        let len = chars.len() as i32;
        let cursor_x = f.tree.scoped_int(w, "cursor_x", 0).max(0);

        let set_cursor = |f: &mut FormState, x: i32, y: i32| {
            let node = f.tree.node_mut(w);
            node.set_kv_int("cursor_x", x);
            node.set_kv_int("cursor_y", y);
        };

        if matchbind(&f.tree, w, key, "up", "UP") {
            if cursor_y <= 0 {
                return false;
            }
            set_cursor(f, cursor_x, cursor_y - 1);
            return true;
        }
        if matchbind(&f.tree, w, key, "down", "DOWN") {
            if cursor_y >= last {
                return false;
            }
            set_cursor(f, cursor_x, cursor_y + 1);
            return true;
        }
        if matchbind(&f.tree, w, key, "left", "LEFT") {
            set_cursor(f, (cursor_x.min(len) - 1).max(0), cursor_y);
            return true;
        }
        if matchbind(&f.tree, w, key, "right", "RIGHT") {
            set_cursor(f, (cursor_x + 1).min(len), cursor_y);
            return true;
        }
        if matchbind(&f.tree, w, key, "page_up", "PPAGE") {
            set_cursor(f, cursor_x, (cursor_y - height + 1).max(0));
            return true;
        }
        if matchbind(&f.tree, w, key, "page_down", "NPAGE") {
            set_cursor(f, cursor_x, (cursor_y + height - 1).min(last));
            return true;
        }
        if matchbind(&f.tree, w, key, "home", "HOME ^A") {
            set_cursor(f, 0, cursor_y);
            return true;
        }
        if matchbind(&f.tree, w, key, "end", "END ^E") {
            set_cursor(f, len, cursor_y);
            return true;
        }
        if matchbind(&f.tree, w, key, "delete", "DC") {
            let x = cursor_x.min(len);
            if x == len {
                let Some(&next) = lines.get(cursor_y as usize + 1) else {
                    return true;
                };
                let mut joined = chars;
                joined.extend(line_chars(f, next));
                set_line(f, line, &joined);
                f.tree.remove(next);
            } else {
                let mut chars = chars;
                chars.remove(x as usize);
                set_line(f, line, &chars);
            }
            set_cursor(f, x, cursor_y);
            return true;
        }
        if matchbind(&f.tree, w, key, "backspace", "BACKSPACE ^H") {
            let x = cursor_x.min(len);
            if x == 0 {
                if cursor_y == 0 {
                    return true;
                }
                let prev = lines[cursor_y as usize - 1];
                let mut joined = line_chars(f, prev);
                let prev_len = joined.len() as i32;
                joined.extend(chars);
                set_line(f, prev, &joined);
                f.tree.remove(line);
                set_cursor(f, prev_len, cursor_y - 1);
            } else {
                let mut chars = chars;
                chars.remove(x as usize - 1);
                set_line(f, line, &chars);
                set_cursor(f, x - 1, cursor_y);
            }
            return true;
        }
        if matchbind(&f.tree, w, key, "enter", "ENTER") {
            let x = cursor_x.min(len) as usize;
            set_line(f, line, &chars[..x]);
            let mut rest = Node::new(WidgetKind::ListItem);
            rest.set_kv("text", chars[x..].iter().collect::<String>());
            let rest = f.tree.insert_detached(rest);
            f.tree.insert_after(line, rest);
            set_cursor(f, 0, cursor_y + 1);
            return true;
        }
        if let Some(c) = key.printable_char() {
            let mut chars = chars;
            let x = cursor_x.min(len) as usize;
            chars.insert(x, c);
            set_line(f, line, &chars);
            set_cursor(f, x as i32 + 1, cursor_y);
            return true;
        }
        false
    }
}

// ===========================================================================
// Tests
// ===========================================================================
