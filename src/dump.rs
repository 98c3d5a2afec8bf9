//! Serializing widget trees back to description text.
//!
//! Dumps use the brace form, one block per widget, so they re-parse into an
//! equivalent tree. `prefix` is prepended to every widget and attribute
//! name, which lets a dump be grafted next to the original without name
//! collisions.

use crate::tree::{NodeId, Tree};

/// Quote a value for description text.
///
/// The quote character is chosen to avoid the earliest conflict; a value
/// containing both kinds of quote becomes several adjacent runs with
/// alternating quotes, which the parser concatenates again. The empty
/// value emits nothing.
pub fn quote(text: &str) -> String {
    let first_sq = text.find('\'').unwrap_or(text.len());
    let first_dq = text.find('"').unwrap_or(text.len());
    let mut q = if first_sq > first_dq { '\'' } else { '"' };
    let mut out = String::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(q) {
            Some(0) => {
                q = if q == '"' { '\'' } else { '"' };
            }
            at => {
                let len = at.unwrap_or(rest.len());
                out.push(q);
                out.push_str(&rest[..len]);
                out.push(q);
                rest = &rest[len..];
            }
        }
    }
    out
}

/// Dump the subtree under `w`. The widget whose serial equals
/// `focus_serial` carries the `!` focus marker.
pub fn dump_widget(tree: &Tree, w: NodeId, focus_serial: u64, prefix: &str) -> String {
    let mut out = String::new();
    dump_into(tree, w, focus_serial, prefix, &mut out);
    out
}

fn dump_into(tree: &Tree, w: NodeId, focus_serial: u64, prefix: &str, out: &mut String) {
    let node = tree.node(w);
    out.push('{');
    if focus_serial != 0 && node.serial == focus_serial {
        out.push('!');
    }
    out.push_str(node.kind.name());
    if let Some(class) = &node.class {
        out.push('#');
        out.push_str(class);
    }
    if let Some(name) = &node.name {
        out.push('[');
        out.push_str(prefix);
        out.push_str(name);
        out.push(']');
    }
    for kv in &node.kvs {
        out.push(' ');
        out.push_str(&kv.key);
        if let Some(name) = &kv.name {
            out.push('[');
            out.push_str(prefix);
            out.push_str(name);
            out.push(']');
        }
        out.push(':');
        out.push_str(&quote(&kv.value));
    }
    for &child in tree.children(w) {
        dump_into(tree, child, focus_serial, prefix, out);
    }
    out.push('}');
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_into;
    use crate::tree::{Node, Tree};
    use crate::widget::WidgetKind;

    // -- quoting ------------------------------------------------------------

    #[test]
    fn plain_values_get_double_quotes() {
        assert_eq!(quote("hello"), "\"hello\"");
        assert_eq!(quote(""), "");
    }

    #[test]
    fn quotes_inside_values_flip_the_quote_char() {
        assert_eq!(quote("a\"b"), "'a\"b'");
        assert_eq!(quote("a'b"), "\"a'b\"");
    }

    #[test]
    fn values_with_both_quote_kinds_alternate() {
        let quoted = quote("a'b\"c");
        assert_eq!(quoted, "\"a'b\"'\"c'");
    }

    // -- dumping ------------------------------------------------------------

    #[test]
    fn dump_covers_structure_names_and_kvs() {
        let mut tree = Tree::default();
        let root = parse_into(
            &mut tree,
            "vbox\n  label#head[title] text[t]:\"hi there\"\n  input[q] text:x\n",
        )
        .unwrap();
        tree.set_root(root);
        let text = dump_widget(&tree, root, 0, "");
        assert_eq!(
            text,
            "{vbox{label#head[title] text[t]:\"hi there\"}{input[q] text:\"x\"}}"
        );
    }

    #[test]
    fn focus_marker_follows_the_serial() {
        let mut tree = Tree::default();
        let root = tree.insert_detached(Node::new(WidgetKind::Vbox));
        tree.set_root(root);
        let input = tree.insert_child(root, Node::new(WidgetKind::Input));
        let serial = tree.node(input).serial;
        assert_eq!(dump_widget(&tree, root, serial, ""), "{vbox{!input}}");
    }

    #[test]
    fn prefix_is_applied_to_all_names() {
        let mut tree = Tree::default();
        let root = parse_into(&mut tree, "vbox\n  input[q] text[t]:x\n").unwrap();
        tree.set_root(root);
        let text = dump_widget(&tree, root, 0, "copy_");
        assert_eq!(text, "{vbox{input[copy_q] text[copy_t]:\"x\"}}");
    }

    #[test]
    fn dumps_reparse_to_an_equivalent_tree() {
        let source = "vbox\n  label[l] text:\"a'b\"'\" c'\n  hbox\n    input[i] text:'x y'\n";
        let mut tree = Tree::default();
        let root = parse_into(&mut tree, source).unwrap();
        tree.set_root(root);
        let first = dump_widget(&tree, root, 0, "");

        let mut tree2 = Tree::default();
        let root2 = parse_into(&mut tree2, &first).unwrap();
        tree2.set_root(root2);
        let second = dump_widget(&tree2, root2, 0, "");
        assert_eq!(first, second);
    }
}
