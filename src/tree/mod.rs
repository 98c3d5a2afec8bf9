//! Widget tree: arena, node data, queries, and scoped attribute lookup.

pub mod attrs;
pub mod node;
pub mod query;
#[allow(clippy::module_inception)]
pub mod tree;

pub use attrs::parse_int;
pub use node::{next_serial, Kv, Node, NodeId, WidgetState};
pub use tree::Tree;
