//! Scoped attribute resolution.
//!
//! Widget code reads its effective configuration through [`Tree::scoped`],
//! which lets a container set a default that all descendants of a given kind
//! or class inherit unless overridden locally. Precedence:
//!
//! 1. exact key on the node itself
//! 2. `@<class>#<key>` on the node (if the node has a class)
//! 3. `@<kind>#<key>` on the node
//! 4. steps 2-3 on each ancestor, nearest first
//! 5. plain `key`, then `@<key>`, on the node and then each ancestor
//!
//! Absence at every level yields the caller's default, never an error.

use super::node::NodeId;
use super::tree::Tree;

impl Tree {
    /// Resolve `key` for `node` through the scoped lookup protocol.
    ///
    /// A leading `@` on the requested key is stripped before resolution, so
    /// `scoped(n, "@style_normal")` and `scoped(n, "style_normal")` are
    /// equivalent.
    pub fn scoped(&self, node: NodeId, key: &str) -> Option<&str> {
        let base = key.strip_prefix('@').unwrap_or(key);
        let n = self.node(node);
        if let Some(kv) = n.kv(base) {
            return Some(&kv.value);
        }

        let class_key = n.class.as_ref().map(|c| format!("@{}#{}", c, base));
        let kind_key = format!("@{}#{}", n.kind.name(), base);

        let mut chain = vec![node];
        chain.extend(self.ancestors(node));

        for &id in &chain {
            let t = self.node(id);
            if let Some(ck) = class_key.as_deref() {
                if let Some(kv) = t.kv(ck) {
                    return Some(&kv.value);
                }
            }
            if let Some(kv) = t.kv(&kind_key) {
                return Some(&kv.value);
            }
        }

        let global_key = format!("@{}", base);
        for &id in &chain {
            let t = self.node(id);
            if let Some(kv) = t.kv(base) {
                return Some(&kv.value);
            }
            if let Some(kv) = t.kv(&global_key) {
                return Some(&kv.value);
            }
        }

        None
    }

    /// Scoped lookup with a default.
    pub fn scoped_or<'a>(&'a self, node: NodeId, key: &str, default: &'a str) -> &'a str {
        self.scoped(node, key).unwrap_or(default)
    }

    /// Scoped lookup parsed as an integer, fail-soft to `default`.
    pub fn scoped_int(&self, node: NodeId, key: &str, default: i32) -> i32 {
        match self.scoped(node, key) {
            Some(value) => parse_int(value, default),
            None => default,
        }
    }
}

/// Fail-soft radix-10 parse: empty values or any non-numeric residue yield
/// the caller's default.
pub fn parse_int(value: &str, default: i32) -> i32 {
    let s = value.trim();
    if s.is_empty() {
        return default;
    }
    s.parse::<i32>().unwrap_or(default)
}

// ===========================================================================
// Tests
// ===========================================================================
