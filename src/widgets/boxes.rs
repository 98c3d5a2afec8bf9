//! Vertical and horizontal packing containers.
//!
//! Sizing runs in two passes. `prepare` bubbles minimum sizes up from the
//! leaves: a vbox needs the sum of its children's heights and the widest
//! child's width, an hbox the transpose. `draw` distributes the assigned
//! rect back down: each child gets its requested size plus an equal share
//! of the leftover space if its `.expand` kv covers the box axis, and its
//! `.tie` kv can pin it to an edge of the slot instead of filling it.
//! Layout kvs live exactly on the child and do not inherit.

use crate::event::{matchbind, KeyInput};
use crate::focus::{focus_next, focus_prev};
use crate::form::FormState;
use crate::geometry::{Region, Size};
use crate::render::Surface;
use crate::tree::NodeId;
use crate::widget::{behavior, Behavior};
use crate::widgets::{layout_kv, layout_kv_int, select_style};

pub struct BoxBehavior {
    vertical: bool,
}

pub static VBOX: BoxBehavior = BoxBehavior { vertical: true };
pub static HBOX: BoxBehavior = BoxBehavior { vertical: false };

/// Anchor a minimum-sized box inside a slot according to a `tie` string.
///
/// Each present letter ties the box to that edge. Both edges tied on an
/// axis stretches the box; one edge snaps the box there; neither centers
/// it. The default `lrtb` fills the slot.
pub(crate) fn apply_tie(slot: Region, tie: &str, min: Size) -> Region {
    let l = tie.contains('l');
    let r = tie.contains('r');
    let t = tie.contains('t');
    let b = tie.contains('b');
    let mut out = slot;
    if !l && !r {
        out.x += (slot.width - min.width) / 2;
    }
    if !l && r {
        out.x += slot.width - min.width;
    }
    if !l || !r {
        out.width = min.width;
    }
    if !t && !b {
        out.y += (slot.height - min.height) / 2;
    }
    if !t && b {
        out.y += slot.height - min.height;
    }
    if !t || !b {
        out.height = min.height;
    }
    out
}

/// A child's requested size: its own `.width`/`.height` kvs, never below
/// the minimum it computed in `prepare`.
fn requested(f: &FormState, child: NodeId) -> Size {
    let min = f.tree.node(child).min;
    Size::new(
        layout_kv_int(f, child, ".width", 0).max(min.width),
        layout_kv_int(f, child, ".height", 0).max(min.height),
    )
}

impl Behavior for BoxBehavior {
    fn prepare(&self, f: &mut FormState, w: NodeId) {
        let children = f.tree.children(w).to_vec();
        for &c in &children {
            behavior(f.tree.node(c).kind).prepare(f, c);
        }
        let mut min = Size::ZERO;
        for &c in &children {
            let m = f.tree.node(c).min;
            if self.vertical {
                min.height += m.height;
                min.width = min.width.max(m.width);
            } else {
                min.width += m.width;
                min.height = min.height.max(m.height);
            }
        }
        f.tree.node_mut(w).min = min;
    }

    fn draw(&self, f: &mut FormState, w: NodeId, surface: &mut Surface) {
        let children = f.tree.children(w).to_vec();
        let rect = f.tree.node(w).rect;
        select_style(f, w, surface, "style_normal");
        for row in 0..rect.height {
            surface.fill(rect.x, rect.y + row, rect.width, ' ');
        }

        let axis = if self.vertical { 'v' } else { 'h' };
        let mut req = Vec::with_capacity(children.len());
        let mut expands = Vec::with_capacity(children.len());
        let mut num_dyn = 0i32;
        let mut min = Size::ZERO;
        for &c in &children {
            let r = requested(f, c);
            if self.vertical {
                min.height += r.height;
                min.width = min.width.max(r.width);
            } else {
                min.width += r.width;
                min.height = min.height.max(r.height);
            }
            let e = layout_kv(f, c, ".expand", "vh").contains(axis);
            num_dyn += i32::from(e);
            req.push(r);
            expands.push(e);
        }

        let tie = layout_kv(f, w, "tie", "lrtb");
        let area = apply_tie(rect, tie, min);

        let mut sizes_extra = if self.vertical {
            area.height - min.height
        } else {
            area.width - min.width
        };
        let mut cursor = if self.vertical { area.y } else { area.x };
        for (idx, &c) in children.iter().enumerate() {
            let mut size = if self.vertical { req[idx].height } else { req[idx].width };
            if expands[idx] {
                let extra = sizes_extra / num_dyn;
                num_dyn -= 1;
                sizes_extra -= extra;
                size += extra;
            }
            let slot = if self.vertical {
                Region::new(area.x, cursor, area.width, size)
            } else {
                Region::new(cursor, area.y, size, area.height)
            };
            cursor += size;
            let ctie = layout_kv(f, c, ".tie", "lrtb");
            let placed = apply_tie(slot, ctie, f.tree.node(c).min);
            f.tree.node_mut(c).rect = placed;
            behavior(f.tree.node(c).kind).draw(f, c, surface);
        }
    }

    fn process(&self, f: &mut FormState, w: NodeId, fw: NodeId, key: &KeyInput) -> bool {
        let (prev, prev_keys, next, next_keys) = if self.vertical {
            ("up", "UP", "down", "DOWN")
        } else {
            ("left", "LEFT", "right", "RIGHT")
        };
        if matchbind(&f.tree, w, key, prev, prev_keys) {
            return focus_prev(f, w, fw);
        }
        if matchbind(&f.tree, w, key, next, next_keys) {
            return focus_next(f, w, fw);
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
    use crate::tree::{Node, Tree};
    use crate::widget::WidgetKind;

    fn label(text: &str) -> Node {
        let mut n = Node::new(WidgetKind::Label);
        n.set_kv("text", text);
        n
    }

    fn state(tree: Tree) -> FormState {
        FormState::new(tree)
    }

    // -- tie ----------------------------------------------------------------

    #[test]
    fn default_tie_fills_the_slot() {
        let slot = Region::new(2, 3, 10, 4);
        assert_eq!(apply_tie(slot, "lrtb", Size::new(3, 1)), slot);
    }

    #[test]
    fn single_edge_ties_snap_to_that_edge() {
        let slot = Region::new(0, 0, 10, 4);
        let min = Size::new(4, 2);
        assert_eq!(apply_tie(slot, "lt", min), Region::new(0, 0, 4, 2));
        assert_eq!(apply_tie(slot, "rb", min), Region::new(6, 2, 4, 2));
    }

    #[test]
    fn no_ties_center_the_box() {
        let slot = Region::new(0, 0, 10, 4);
        assert_eq!(apply_tie(slot, "", Size::new(4, 2)), Region::new(3, 1, 4, 2));
    }

    #[test]
    fn one_axis_can_stretch_while_the_other_snaps() {
        let slot = Region::new(0, 0, 10, 4);
        assert_eq!(apply_tie(slot, "lrt", Size::new(4, 2)), Region::new(0, 0, 10, 2));
    }

    // -- packing ------------------------------------------------------------

    #[test]
    fn minimum_sizes_bubble_up() {
        let mut tree = Tree::default();
        let root = tree.insert_detached(Node::new(WidgetKind::Vbox));
        tree.set_root(root);
        tree.insert_child(root, label("A"));
        let hbox = tree.insert_child(root, Node::new(WidgetKind::Hbox));
        tree.insert_child(hbox, label("B"));
        tree.insert_child(hbox, Node::new(WidgetKind::Input));
        let mut f = state(tree);
        behavior(WidgetKind::Vbox).prepare(&mut f, root);
        assert_eq!(f.tree.node(hbox).min, Size::new(6, 1));
        assert_eq!(f.tree.node(root).min, Size::new(6, 2));
    }

    #[test]
    fn extra_space_is_shared_among_expanding_children() {
        let mut tree = Tree::default();
        let root = tree.insert_detached(Node::new(WidgetKind::Vbox));
        tree.set_root(root);
        let a = tree.insert_child(root, label("A"));
        let hbox = tree.insert_child(root, Node::new(WidgetKind::Hbox));
        let b = tree.insert_child(hbox, label("B"));
        let input = tree.insert_child(hbox, Node::new(WidgetKind::Input));
        let mut f = state(tree);
        behavior(WidgetKind::Vbox).prepare(&mut f, root);
        f.tree.node_mut(root).rect = Region::new(0, 0, 10, 3);
        let mut surface = Surface::new(10, 3);
        behavior(WidgetKind::Vbox).draw(&mut f, root, &mut surface);

        assert_eq!(f.tree.node(a).rect, Region::new(0, 0, 10, 1));
        assert_eq!(f.tree.node(hbox).rect, Region::new(0, 1, 10, 2));
        assert_eq!(f.tree.node(b).rect, Region::new(0, 1, 3, 2));
        assert_eq!(f.tree.node(input).rect, Region::new(3, 1, 7, 2));
    }

    #[test]
    fn children_cover_the_box_without_overlap() {
        let mut tree = Tree::default();
        let root = tree.insert_detached(Node::new(WidgetKind::Hbox));
        tree.set_root(root);
        let kids: Vec<NodeId> = (0..3).map(|_| tree.insert_child(root, label("x"))).collect();
        let mut f = state(tree);
        behavior(WidgetKind::Hbox).prepare(&mut f, root);
        f.tree.node_mut(root).rect = Region::new(0, 0, 10, 1);
        let mut surface = Surface::new(10, 1);
        behavior(WidgetKind::Hbox).draw(&mut f, root, &mut surface);

        let widths: Vec<i32> = kids.iter().map(|&k| f.tree.node(k).rect.width).collect();
        assert_eq!(widths.iter().sum::<i32>(), 10);
        let mut x = 0;
        for &k in &kids {
            assert_eq!(f.tree.node(k).rect.x, x);
            x += f.tree.node(k).rect.width;
        }
    }

    #[test]
    fn expand_kv_opts_a_child_out() {
        let mut tree = Tree::default();
        let root = tree.insert_detached(Node::new(WidgetKind::Vbox));
        tree.set_root(root);
        let mut fixed = label("A");
        fixed.set_kv(".expand", "0");
        let fixed = tree.insert_child(root, fixed);
        let grow = tree.insert_child(root, label("B"));
        let mut f = state(tree);
        behavior(WidgetKind::Vbox).prepare(&mut f, root);
        f.tree.node_mut(root).rect = Region::new(0, 0, 5, 6);
        let mut surface = Surface::new(5, 6);
        behavior(WidgetKind::Vbox).draw(&mut f, root, &mut surface);

        assert_eq!(f.tree.node(fixed).rect.height, 1);
        assert_eq!(f.tree.node(grow).rect.height, 5);
    }

    #[test]
    fn container_kvs_do_not_leak_into_child_layout() {
        let mut tree = Tree::default();
        let mut root_node = Node::new(WidgetKind::Vbox);
        root_node.set_kv("height", "3");
        root_node.set_kv("expand", "0");
        let root = tree.insert_detached(root_node);
        tree.set_root(root);
        let mut fixed = label("A");
        fixed.set_kv(".expand", "0");
        let fixed = tree.insert_child(root, fixed);
        let grow = tree.insert_child(root, label("B"));
        let mut f = state(tree);
        behavior(WidgetKind::Vbox).prepare(&mut f, root);
        f.tree.node_mut(root).rect = Region::new(0, 0, 5, 6);
        let mut surface = Surface::new(5, 6);
        behavior(WidgetKind::Vbox).draw(&mut f, root, &mut surface);

        assert_eq!(f.tree.node(fixed).rect, Region::new(0, 0, 5, 1));
        assert_eq!(f.tree.node(grow).rect, Region::new(0, 1, 5, 5));
    }

    #[test]
    fn tied_child_shrinks_to_its_minimum() {
        let mut tree = Tree::default();
        let root = tree.insert_detached(Node::new(WidgetKind::Hbox));
        tree.set_root(root);
        let mut tied = label("A");
        tied.set_kv(".width", "4");
        tied.set_kv(".tie", "l");
        tied.set_kv(".expand", "0");
        let tied = tree.insert_child(root, tied);
        let fill = tree.insert_child(root, label("B"));
        let mut f = state(tree);
        behavior(WidgetKind::Hbox).prepare(&mut f, root);
        f.tree.node_mut(root).rect = Region::new(0, 0, 10, 1);
        let mut surface = Surface::new(10, 1);
        behavior(WidgetKind::Hbox).draw(&mut f, root, &mut surface);

        // The slot is 4 wide as requested but the label only takes its
        // minimum; the sibling gets the rest of the row.
        assert_eq!(f.tree.node(tied).rect, Region::new(0, 0, 1, 1));
        assert_eq!(f.tree.node(fill).rect, Region::new(4, 0, 6, 1));
    }

    #[test]
    fn redraw_is_idempotent() {
        let mut tree = Tree::default();
        let root = tree.insert_detached(Node::new(WidgetKind::Vbox));
        tree.set_root(root);
        let a = tree.insert_child(root, label("A"));
        tree.insert_child(root, label("B"));
        let mut f = state(tree);
        behavior(WidgetKind::Vbox).prepare(&mut f, root);
        f.tree.node_mut(root).rect = Region::new(0, 0, 8, 5);
        let mut surface = Surface::new(8, 5);
        behavior(WidgetKind::Vbox).draw(&mut f, root, &mut surface);
        let first = f.tree.node(a).rect;
        behavior(WidgetKind::Vbox).draw(&mut f, root, &mut surface);
        assert_eq!(f.tree.node(a).rect, first);
    }
}
