//! Point-to-node hit testing.
//!
//! Children are scanned in reverse order (last inserted = on top). A node
//! with a rect that does not contain the point clips its whole subtree; a
//! node without a rect is transparent but its children are still probed.

use slotmap::SlotMap;

use crate::node::Node;
use crate::tree::{NodeId, NodeTree};

/// Find the deepest visible node under the point, searching from `root`.
pub fn node_at_point(tree: &NodeTree, root: NodeId, x: u16, y: u16) -> Option<NodeId> {
    tree.with_inner(|inner| hit_node(&inner.nodes, root, x, y))
        .flatten()
}

/// Find the nearest row-like node (`row`/`option`/`treeitem`) under the
/// point: the deepest hit, then the closest ancestor in the row-role set.
/// This is the adjusted-scrolling snap target lookup.
pub fn row_like_at_point(tree: &NodeTree, root: NodeId, x: u16, y: u16) -> Option<NodeId> {
    tree.with_inner(|inner| {
        let mut cursor = hit_node(&inner.nodes, root, x, y);
        while let Some(id) = cursor {
            let node = inner.nodes.get(id)?;
            if node.role.is_row_like() {
                return Some(id);
            }
            cursor = node.parent;
        }
        None
    })
    .flatten()
}

fn hit_node(nodes: &SlotMap<NodeId, Node>, id: NodeId, x: u16, y: u16) -> Option<NodeId> {
    let node = nodes.get(id)?;
    if node.hidden {
        return None;
    }
    if let Some(rect) = node.rect {
        if !rect.contains(x, y) {
            return None;
        }
    }
    for &child in node.children.iter().rev() {
        if let Some(hit) = hit_node(nodes, child, x, y) {
            return Some(hit);
        }
    }
    match node.rect {
        Some(rect) if rect.contains(x, y) => Some(id),
        _ => None,
    }
}
