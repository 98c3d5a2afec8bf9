//! Toggle widget.
//!
//! The `value` kv holds the state; `text_0` and `text_1` override the
//! rendered glyphs, `pos` places the cursor inside the glyph when focused.

use unicode_width::UnicodeWidthStr;

use crate::event::{matchbind, KeyInput};
use crate::form::FormState;
use crate::geometry::Size;
use crate::render::Surface;
use crate::tree::{NodeId, Tree};
use crate::widget::Behavior;
use crate::widgets::{is_focused, select_style};

pub struct CheckboxBehavior;

fn current_text(f: &FormState, w: NodeId) -> String {
    if f.tree.scoped_int(w, "value", 0) != 0 {
        f.tree.scoped_or(w, "text_1", "[X]").to_string()
    } else {
        f.tree.scoped_or(w, "text_0", "[ ]").to_string()
    }
}

impl Behavior for CheckboxBehavior {
    fn init(&self, tree: &mut Tree, w: NodeId) {
        tree.node_mut(w).focusable = true;
    }

    fn prepare(&self, f: &mut FormState, w: NodeId) {
        let text = current_text(f, w);
        f.tree.node_mut(w).min = Size::new(text.width() as i32, 1);
    }

    fn draw(&self, f: &mut FormState, w: NodeId, surface: &mut Surface) {
        let rect = f.tree.node(w).rect;
        let text = current_text(f, w);
        select_style(f, w, surface, "style_normal");
        surface.fill(rect.x, rect.y, rect.width, ' ');
        surface.put_str(rect.x, rect.y, &text, rect.width);
        if is_focused(f, w) {
            let pos = f.tree.scoped_int(w, "pos", 1);
            f.cursor = Some((rect.x + pos, rect.y));
        }
    }

    fn process(&self, f: &mut FormState, w: NodeId, _fw: NodeId, key: &KeyInput) -> bool {
        if matchbind(&f.tree, w, key, "toggle", "ENTER SPACE") {
            let value = f.tree.scoped_int(w, "value", 0);
            f.tree
                .node_mut(w)
                .set_kv_int("value", i32::from(value == 0));
            return true;
        }
        false
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Key;
    use crate::geometry::Region;
    use crate::tree::{Node, Tree};
    use crate::widget::{behavior, WidgetKind};

    fn checkbox(kvs: &[(&str, &str)]) -> (FormState, NodeId) {
        let mut tree = Tree::default();
        let mut node = Node::new(WidgetKind::Checkbox);
        for &(k, v) in kvs {
            node.set_kv(k, v);
        }
        let id = tree.insert_detached(node);
        tree.set_root(id);
        behavior(WidgetKind::Checkbox).init(&mut tree, id);
        (FormState::new(tree), id)
    }

    #[test]
    fn init_makes_it_focusable() {
        let (f, w) = checkbox(&[]);
        assert!(f.tree.node(w).focusable);
    }

    #[test]
    fn renders_unchecked_and_checked_glyphs() {
        let (mut f, w) = checkbox(&[]);
        f.tree.node_mut(w).rect = Region::new(0, 0, 3, 1);
        let mut surface = Surface::new(3, 1);
        behavior(WidgetKind::Checkbox).draw(&mut f, w, &mut surface);
        assert_eq!(surface.to_text(), "[ ]");

        f.tree.node_mut(w).set_kv("value", "1");
        behavior(WidgetKind::Checkbox).draw(&mut f, w, &mut surface);
        assert_eq!(surface.to_text(), "[X]");
    }

    #[test]
    fn custom_glyphs_drive_min_size() {
        let (mut f, w) = checkbox(&[("text_0", "( no )")]);
        behavior(WidgetKind::Checkbox).prepare(&mut f, w);
        assert_eq!(f.tree.node(w).min, Size::new(6, 1));
    }

    #[test]
    fn toggle_flips_value_both_ways() {
        let (mut f, w) = checkbox(&[]);
        let b = behavior(WidgetKind::Checkbox);
        assert!(b.process(&mut f, w, w, &KeyInput::ch(' ')));
        assert_eq!(f.tree.scoped_int(w, "value", 0), 1);
        assert!(b.process(&mut f, w, w, &KeyInput::plain(Key::Enter)));
        assert_eq!(f.tree.scoped_int(w, "value", 0), 0);
    }

    #[test]
    fn other_keys_are_not_consumed() {
        let (mut f, w) = checkbox(&[]);
        assert!(!behavior(WidgetKind::Checkbox).process(&mut f, w, w, &KeyInput::ch('x')));
    }

    #[test]
    fn focused_checkbox_parks_the_cursor() {
        let (mut f, w) = checkbox(&[]);
        f.tree.node_mut(w).rect = Region::new(2, 1, 3, 1);
        f.focus = f.tree.node(w).serial;
        let mut surface = Surface::new(6, 2);
        behavior(WidgetKind::Checkbox).draw(&mut f, w, &mut surface);
        assert_eq!(f.cursor, Some((3, 1)));
    }
}
