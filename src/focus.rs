//! Focus movement.
//!
//! Focus is tracked as the serial number of the focused widget, never as a
//! node handle, so a modification that replaces the widget silently drops
//! focus instead of pointing at a recycled slot. Containers are never
//! focusable themselves; widgets raise their `focusable` flag in `init` or
//! `prepare`.

use crate::form::FormState;
use crate::tree::{NodeId, Tree};
use crate::widget::behavior;

/// First focusable widget of the subtree under `root`, in depth-first order.
pub fn find_first_focusable(tree: &Tree, root: NodeId) -> Option<NodeId> {
    tree.walk_depth_first(root)
        .into_iter()
        .find(|&id| tree.node(id).focusable)
}

fn focusables(tree: &Tree, root: NodeId) -> Vec<NodeId> {
    tree.walk_depth_first(root)
        .into_iter()
        .filter(|&id| tree.node(id).focusable)
        .collect()
}

/// Move focus to the next focusable widget after `fw` inside the subtree
/// under `within`, wrapping around at the end.
///
/// # Panics
///
/// Panics when `fw` is not a focusable widget inside that subtree.
pub fn focus_next(f: &mut FormState, within: NodeId, fw: NodeId) -> bool {
    shift_focus(f, within, fw, 1)
}

/// Like [`focus_next`], moving backwards.
pub fn focus_prev(f: &mut FormState, within: NodeId, fw: NodeId) -> bool {
    shift_focus(f, within, fw, -1)
}

fn shift_focus(f: &mut FormState, within: NodeId, fw: NodeId, step: i64) -> bool {
    let list = focusables(&f.tree, within);
    let idx = list
        .iter()
        .position(|&id| id == fw)
        .expect("focused widget must be inside the container it reports to");
    let next = (idx as i64 + step).rem_euclid(list.len() as i64) as usize;
    switch_focus(f, Some(list[next]));
    true
}

/// Hand focus to `new`, running the old widget's `leave` hook and the new
/// widget's `enter` hook.
pub fn switch_focus(f: &mut FormState, new: Option<NodeId>) {
    if let Some(old) = f.focused_node() {
        let kind = f.tree.node(old).kind;
        behavior(kind).leave(f, old);
    }
    f.focus = match new {
        Some(id) => f.tree.node(id).serial,
        None => 0,
    };
    if let Some(id) = new {
        let kind = f.tree.node(id).kind;
        behavior(kind).enter(f, id);
    }
}

/// Honor a pending `!` focus request anywhere under `root`. The first
/// widget found with the flag set takes focus; the flag is consumed.
pub fn check_setfocus(f: &mut FormState, root: NodeId) -> bool {
    let requested = f
        .tree
        .walk_depth_first(root)
        .into_iter()
        .find(|&id| f.tree.node(id).setfocus);
    match requested {
        Some(id) => {
            f.tree.node_mut(id).setfocus = false;
            switch_focus(f, Some(id));
            true
        }
        None => false,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
