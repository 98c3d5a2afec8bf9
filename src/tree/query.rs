//! Lookup of widgets and kv entries by name or serial id.
//!
//! All searches are pre-order depth-first from a given start node, matching
//! the order the description text declared things in.

use super::node::NodeId;
use super::tree::Tree;

impl Tree {
    /// Find the first widget with the given name in the subtree at `start`.
    pub fn find_by_name(&self, start: NodeId, name: &str) -> Option<NodeId> {
        self.walk_depth_first(start)
            .into_iter()
            .find(|&id| self.node(id).name.as_deref() == Some(name))
    }

    /// Find the widget with the given serial id in the subtree at `start`.
    pub fn find_by_serial(&self, start: NodeId, serial: u64) -> Option<NodeId> {
        if serial == 0 {
            return None;
        }
        self.walk_depth_first(start)
            .into_iter()
            .find(|&id| self.node(id).serial == serial)
    }

    /// Find a kv entry by its external name.
    ///
    /// Entries without an external name never match. Returns the owning node
    /// and the entry's index in that node's kv list.
    pub fn find_kv_by_name(&self, start: NodeId, name: &str) -> Option<(NodeId, usize)> {
        for id in self.walk_depth_first(start) {
            if let Some(idx) = self
                .node(id)
                .kvs
                .iter()
                .position(|kv| kv.name.as_deref() == Some(name))
            {
                return Some((id, idx));
            }
        }
        None
    }

    /// Find a kv entry by its serial id.
    pub fn find_kv_by_serial(&self, start: NodeId, serial: u64) -> Option<(NodeId, usize)> {
        for id in self.walk_depth_first(start) {
            if let Some(idx) = self.node(id).kvs.iter().position(|kv| kv.serial == serial) {
                return Some((id, idx));
            }
        }
        None
    }
}

// ===========================================================================
// Tests
// ===========================================================================
