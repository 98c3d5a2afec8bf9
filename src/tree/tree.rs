//! The widget tree: a slotmap arena with ordered child lists and the
//! structural splice operations used by the mutation API.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::node::{Node, NodeId};

const EMPTY_CHILDREN: &[NodeId] = &[];

/// The widget tree, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`; parent/child relationships are kept
/// in secondary maps so removal is O(subtree size) and lookup is O(1). Child
/// lists are ordered, which is what document order means everywhere else in
/// the crate.
pub struct Tree {
    nodes: SlotMap<NodeId, Node>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
}

impl Tree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
        }
    }

    /// Insert a detached node (no parent, not the root).
    ///
    /// The parser builds subtrees this way and grafts them afterwards.
    pub fn insert_detached(&mut self, node: Node) -> NodeId {
        let id = self.nodes.insert(node);
        self.children.insert(id, Vec::new());
        id
    }

    /// Insert a node as the last child of `parent`.
    pub fn insert_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let id = self.insert_detached(node);
        self.append_child(parent, id);
        id
    }

    // -----------------------------------------------------------------------
    // Splice operations
    // -----------------------------------------------------------------------

    /// Detach `node` from its parent, keeping its subtree in the arena.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(old_parent) = self.parent.remove(node) {
            if let Some(siblings) = self.children.get_mut(old_parent) {
                siblings.retain(|&child| child != node);
            }
        }
        if self.root == Some(node) {
            self.root = None;
        }
    }

    /// Attach `node` as the last child of `parent`, detaching it first.
    pub fn append_child(&mut self, parent: NodeId, node: NodeId) {
        debug_assert!(self.nodes.contains_key(parent), "parent node does not exist");
        self.detach(node);
        self.parent.insert(node, parent);
        self.children
            .get_mut(parent)
            .expect("parent must have children vec")
            .push(node);
    }

    /// Attach `node` as the first child of `parent`, detaching it first.
    pub fn prepend_child(&mut self, parent: NodeId, node: NodeId) {
        debug_assert!(self.nodes.contains_key(parent), "parent node does not exist");
        self.detach(node);
        self.parent.insert(node, parent);
        self.children
            .get_mut(parent)
            .expect("parent must have children vec")
            .insert(0, node);
    }

    /// Attach `node` as the sibling directly before `anchor`.
    ///
    /// # Panics
    ///
    /// Panics if `anchor` has no parent.
    pub fn insert_before(&mut self, anchor: NodeId, node: NodeId) {
        let parent = self.parent(anchor).expect("anchor must have a parent");
        self.detach(node);
        self.parent.insert(node, parent);
        let siblings = self.children.get_mut(parent).expect("parent must have children vec");
        let idx = siblings.iter().position(|&c| c == anchor).expect("anchor must be a child");
        siblings.insert(idx, node);
    }

    /// Attach `node` as the sibling directly after `anchor`.
    ///
    /// # Panics
    ///
    /// Panics if `anchor` has no parent.
    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) {
        let parent = self.parent(anchor).expect("anchor must have a parent");
        self.detach(node);
        self.parent.insert(node, parent);
        let siblings = self.children.get_mut(parent).expect("parent must have children vec");
        let idx = siblings.iter().position(|&c| c == anchor).expect("anchor must be a child");
        siblings.insert(idx + 1, node);
    }

    /// Remove a node and all its descendants from the arena.
    ///
    /// Returns the removed root's data, or `None` if it didn't exist.
    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        if !self.nodes.contains_key(id) {
            return None;
        }
        self.detach(id);

        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        let mut removed_root = None;

        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                for &child in &kids {
                    to_remove.push_back(child);
                }
            }
            self.parent.remove(current);
            let data = self.nodes.remove(current);
            if current == id {
                removed_root = data;
            }
        }

        removed_root
    }

    // -----------------------------------------------------------------------
    // Access
    // -----------------------------------------------------------------------

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Get the ordered children of a node. Empty for leaves and stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(EMPTY_CHILDREN)
    }

    /// Ancestors of `id`, nearest first, not including `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Immutable access to a node.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Mutable access to a node.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Immutable access that treats absence as an internal error.
    ///
    /// Used by layout and focus code that holds ids it just obtained from the
    /// tree.
    pub fn node(&self, id: NodeId) -> &Node {
        self.nodes.get(id).expect("node id must be live")
    }

    /// Mutable counterpart of [`Tree::node`].
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.nodes.get_mut(id).expect("node id must be live")
    }

    /// The current root node, if set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Explicitly set the root node.
    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Number of nodes in the arena (attached or not).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the arena contains a node with the given id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Whether `node` lies inside the subtree rooted at `subtree_root`.
    pub fn is_in_subtree(&self, subtree_root: NodeId, node: NodeId) -> bool {
        node == subtree_root || self.ancestors(node).contains(&subtree_root)
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
