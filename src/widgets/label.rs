//! Static one-line text.

use unicode_width::UnicodeWidthStr;

use crate::form::FormState;
use crate::geometry::Size;
use crate::render::Surface;
use crate::tree::NodeId;
use crate::widget::Behavior;
use crate::widgets::select_style;

pub struct LabelBehavior;

impl Behavior for LabelBehavior {
    fn prepare(&self, f: &mut FormState, w: NodeId) {
        let text = f.tree.scoped_or(w, "text", "");
        f.tree.node_mut(w).min = Size::new(text.width() as i32, 1);
    }

    fn draw(&self, f: &mut FormState, w: NodeId, surface: &mut Surface) {
        let rect = f.tree.node(w).rect;
        let text = f.tree.scoped_or(w, "text", "");
        select_style(f, w, surface, "style_normal");
        let used = surface.put_str(rect.x, rect.y, &text, rect.width);
        surface.fill(rect.x + used, rect.y, rect.width - used, ' ');
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Node, Tree};
    use crate::widget::{behavior, WidgetKind};

    fn label(text: &str) -> (FormState, NodeId) {
        let mut tree = Tree::default();
        let mut node = Node::new(WidgetKind::Label);
        node.set_kv("text", text);
        let id = tree.insert_detached(node);
        tree.set_root(id);
        (FormState::new(tree), id)
    }

    #[test]
    fn min_size_follows_display_width() {
        let (mut f, w) = label("hello");
        behavior(WidgetKind::Label).prepare(&mut f, w);
        assert_eq!(f.tree.node(w).min, Size::new(5, 1));
    }

    #[test]
    fn wide_characters_count_double() {
        let (mut f, w) = label("漢字");
        behavior(WidgetKind::Label).prepare(&mut f, w);
        assert_eq!(f.tree.node(w).min, Size::new(4, 1));
    }

    #[test]
    fn draw_pads_with_spaces() {
        let (mut f, w) = label("hi");
        f.tree.node_mut(w).rect = crate::geometry::Region::new(1, 0, 5, 1);
        let mut surface = Surface::new(7, 1);
        surface.fill(0, 0, 7, '.');
        behavior(WidgetKind::Label).draw(&mut f, w, &mut surface);
        assert_eq!(surface.to_text(), ".hi   .");
    }

    #[test]
    fn draw_clips_to_rect() {
        let (mut f, w) = label("overflow");
        f.tree.node_mut(w).rect = crate::geometry::Region::new(0, 0, 4, 1);
        let mut surface = Surface::new(8, 1);
        behavior(WidgetKind::Label).draw(&mut f, w, &mut surface);
        assert_eq!(surface.to_text(), "over    ");
    }
}
