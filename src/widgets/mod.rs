//! The built-in widget set.

pub mod boxes;
pub mod checkbox;
pub mod input;
pub mod label;
pub mod list;
pub mod table;
pub mod text;

use crate::form::FormState;
use crate::render::{parse_style, Surface};
use crate::tree::{parse_int, NodeId};

/// Read a layout kv (`.expand`, `.tie`, `.width`, spans, borders) exactly
/// on the node itself. Unlike the scoped lookup these never inherit, so a
/// container's own layout settings cannot leak into its descendants.
pub(crate) fn layout_kv<'a>(f: &'a FormState, w: NodeId, key: &str, default: &'a str) -> &'a str {
    f.tree.node(w).kv(key).map(|kv| kv.value.as_str()).unwrap_or(default)
}

pub(crate) fn layout_kv_int(f: &FormState, w: NodeId, key: &str, default: i32) -> i32 {
    match f.tree.node(w).kv(key) {
        Some(kv) => parse_int(&kv.value, default),
        None => default,
    }
}

/// True when `w` currently holds the form focus.
pub(crate) fn is_focused(f: &FormState, w: NodeId) -> bool {
    f.focus != 0 && f.tree.node(w).serial == f.focus
}

/// Resolve a style kv through the scoped lookup and make it the surface's
/// current style. A missing kv selects the default style.
pub(crate) fn select_style(f: &FormState, w: NodeId, surface: &mut Surface, key: &str) {
    let spec = f.tree.scoped_or(w, key, "");
    surface.set_style(parse_style(&spec));
}
