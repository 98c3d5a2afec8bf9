//! Key bindings.
//!
//! Every widget action has a name (`left`, `toggle`, `page_down`, ...) and a
//! built-in default key list. A `bind_<action>` kv, found through the scoped
//! lookup, replaces the default list. The special token `**` in a custom
//! list keeps the default keys on top of the custom ones. Setting
//! `autobind` to `0` disables the defaults entirely for widgets in scope.

use crate::event::input::KeyInput;
use crate::tree::{NodeId, Tree};

/// True when `key` triggers `action` on widget `w`.
///
/// `default_desc` is the action's built-in key list, a space- or
/// comma-separated sequence of key names.
pub fn matchbind(
    tree: &Tree,
    w: NodeId,
    key: &KeyInput,
    action: &str,
    default_desc: &str,
) -> bool {
    let kvname = format!("bind_{action}");
    let auto_desc = if tree.scoped_int(w, "autobind", 1) == 0 {
        ""
    } else {
        default_desc
    };
    let desc = tree.scoped(w, &kvname).unwrap_or(auto_desc).to_string();

    let name = key.name();
    let mut retry = false;
    for token in tokens(&desc) {
        if token == "**" {
            retry = true;
        } else if token == name {
            return true;
        }
    }
    if retry {
        return tokens(auto_desc).any(|token| token == name);
    }
    false
}

fn tokens(desc: &str) -> impl Iterator<Item = &str> {
    desc.split([' ', ',']).filter(|t| !t.is_empty())
}

// ===========================================================================
// Tests
// ===========================================================================
