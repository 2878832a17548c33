//! Flat node arena with tree links, attribute setters, and member collection.
//!
//! `NodeTree` is the shared handle every widget binds to. Attribute setters
//! bump `revision`; rect changes bump `layout_revision` separately so
//! scrollbars can detect content-size changes without a resize signal.
//! Operations on vacant or foreign ids are silent no-ops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use slotmap::{new_key_type, SlotMap};

use crate::node::{Node, RangeValue, SortOrder};
use crate::rect::Rect;
use crate::role::Role;

new_key_type! {
    /// Stable handle to a node in the arena. Becomes vacant when the node
    /// is removed; all tree operations treat vacant ids as no-ops.
    pub struct NodeId;
}

#[derive(Debug, Default)]
pub(crate) struct TreeInner {
    pub(crate) nodes: SlotMap<NodeId, Node>,
    pub(crate) roots: Vec<NodeId>,
    focused: Option<NodeId>,
    revision: u64,
    layout_revision: u64,
}

/// Cheap-`Clone` handle over the node arena.
#[derive(Debug)]
pub struct NodeTree {
    inner: Arc<RwLock<TreeInner>>,
    /// Dirty flag for re-render.
    dirty: Arc<AtomicBool>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(TreeInner::default())),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    pub(crate) fn with_inner<T>(&self, f: impl FnOnce(&TreeInner) -> T) -> Option<T> {
        self.inner.read().ok().map(|inner| f(&inner))
    }

    fn with_node<T>(&self, id: NodeId, f: impl FnOnce(&Node) -> T) -> Option<T> {
        self.inner
            .read()
            .ok()
            .and_then(|inner| inner.nodes.get(id).map(f))
    }

    /// Apply a mutation to a node; the closure returns whether anything
    /// changed. Bumps `revision` and the dirty flag only on change.
    fn with_node_mut(&self, id: NodeId, f: impl FnOnce(&mut Node) -> bool) -> bool {
        if let Ok(mut inner) = self.inner.write() {
            let changed = inner.nodes.get_mut(id).map(f).unwrap_or(false);
            if changed {
                inner.revision += 1;
                self.dirty.store(true, Ordering::SeqCst);
            }
            changed
        } else {
            false
        }
    }

    // -------------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------------

    /// Insert a node as the last child of `parent`, or as a root when
    /// `parent` is `None` or vacant.
    pub fn insert(&self, node: Node, parent: Option<NodeId>) -> NodeId {
        if let Ok(mut inner) = self.inner.write() {
            let id = inner.nodes.insert(node);
            match parent {
                Some(p) if inner.nodes.contains_key(p) => {
                    inner.nodes[id].parent = Some(p);
                    inner.nodes[p].children.push(id);
                }
                _ => inner.roots.push(id),
            }
            inner.revision += 1;
            self.dirty.store(true, Ordering::SeqCst);
            id
        } else {
            NodeId::default()
        }
    }

    /// Insert a node as a child of `parent`, directly before `before`.
    /// Returns `None` if `parent` is vacant or `before` is not its child.
    pub fn insert_before(&self, node: Node, parent: NodeId, before: NodeId) -> Option<NodeId> {
        if let Ok(mut inner) = self.inner.write() {
            if !inner.nodes.contains_key(parent) {
                return None;
            }
            let pos = inner.nodes[parent].children.iter().position(|&c| c == before)?;
            let id = inner.nodes.insert(node);
            inner.nodes[id].parent = Some(parent);
            inner.nodes[parent].children.insert(pos, id);
            inner.revision += 1;
            self.dirty.store(true, Ordering::SeqCst);
            Some(id)
        } else {
            None
        }
    }

    /// Remove a node and its entire subtree. Clears tree focus if it was
    /// inside the removed subtree.
    pub fn remove(&self, id: NodeId) -> bool {
        if let Ok(mut inner) = self.inner.write() {
            if !inner.nodes.contains_key(id) {
                return false;
            }
            let mut doomed = vec![id];
            let mut stack = vec![id];
            while let Some(next) = stack.pop() {
                if let Some(node) = inner.nodes.get(next) {
                    for &child in &node.children {
                        doomed.push(child);
                        stack.push(child);
                    }
                }
            }
            match inner.nodes[id].parent {
                Some(p) => {
                    if let Some(parent) = inner.nodes.get_mut(p) {
                        parent.children.retain(|&c| c != id);
                    }
                }
                None => inner.roots.retain(|&r| r != id),
            }
            if let Some(focused) = inner.focused {
                if doomed.contains(&focused) {
                    inner.focused = None;
                }
            }
            for dead in doomed {
                inner.nodes.remove(dead);
            }
            inner.revision += 1;
            self.dirty.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    /// Move a child of `parent` from one position to another.
    pub fn move_child(&self, parent: NodeId, from_idx: usize, to_idx: usize) -> bool {
        if let Ok(mut inner) = self.inner.write() {
            let moved = match inner.nodes.get_mut(parent) {
                Some(node) if from_idx < node.children.len() && to_idx < node.children.len() => {
                    let child = node.children.remove(from_idx);
                    node.children.insert(to_idx, child);
                    true
                }
                _ => false,
            };
            if moved {
                inner.revision += 1;
                self.dirty.store(true, Ordering::SeqCst);
            }
            moved
        } else {
            false
        }
    }

    /// Replace the child order of `parent`. `order` must be a permutation of
    /// the current children; anything else is a no-op.
    pub fn set_children(&self, parent: NodeId, order: &[NodeId]) -> bool {
        if let Ok(mut inner) = self.inner.write() {
            let accepted = match inner.nodes.get_mut(parent) {
                Some(node) if node.children.len() == order.len() => {
                    let mut current = node.children.clone();
                    let mut proposed = order.to_vec();
                    current.sort();
                    proposed.sort();
                    if current == proposed {
                        node.children = order.to_vec();
                        true
                    } else {
                        false
                    }
                }
                _ => false,
            };
            if accepted {
                inner.revision += 1;
                self.dirty.store(true, Ordering::SeqCst);
            }
            accepted
        } else {
            false
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.with_inner(|inner| inner.nodes.contains_key(id))
            .unwrap_or(false)
    }

    pub fn roots(&self) -> Vec<NodeId> {
        self.with_inner(|inner| inner.roots.clone()).unwrap_or_default()
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.with_node(id, |n| n.children.clone()).unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.with_node(id, |n| n.parent).flatten()
    }

    /// Ancestors from the immediate parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        self.with_inner(|inner| {
            let mut result = Vec::new();
            let mut cursor = inner.nodes.get(id).and_then(|n| n.parent);
            while let Some(a) = cursor {
                result.push(a);
                cursor = inner.nodes.get(a).and_then(|n| n.parent);
            }
            result
        })
        .unwrap_or_default()
    }

    /// Preorder snapshot of the subtree below `id` (excluding `id` itself).
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.with_inner(|inner| {
            let mut result = Vec::new();
            let mut stack: Vec<NodeId> = inner
                .nodes
                .get(id)
                .map(|n| n.children.iter().rev().copied().collect())
                .unwrap_or_default();
            while let Some(next) = stack.pop() {
                result.push(next);
                if let Some(node) = inner.nodes.get(next) {
                    for &child in node.children.iter().rev() {
                        stack.push(child);
                    }
                }
            }
            result
        })
        .unwrap_or_default()
    }

    /// Snapshot a node (clone). Mostly useful in tests.
    pub fn get(&self, id: NodeId) -> Option<Node> {
        self.with_node(id, |n| n.clone())
    }

    // -------------------------------------------------------------------------
    // Attributes
    // -------------------------------------------------------------------------

    pub fn role(&self, id: NodeId) -> Option<Role> {
        self.with_node(id, |n| n.role)
    }

    pub fn id(&self, id: NodeId) -> Option<String> {
        self.with_node(id, |n| n.id.clone()).flatten()
    }

    pub fn label(&self, id: NodeId) -> Option<String> {
        self.with_node(id, |n| n.label.clone()).flatten()
    }

    pub fn set_label(&self, id: NodeId, label: impl Into<String>) {
        let label = label.into();
        self.with_node_mut(id, |n| {
            if n.label.as_deref() == Some(label.as_str()) {
                false
            } else {
                n.label = Some(label);
                true
            }
        });
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.with_node(id, |n| n.selected).unwrap_or(false)
    }

    pub fn set_selected(&self, id: NodeId, selected: bool) {
        self.with_node_mut(id, |n| {
            if n.selected == selected {
                false
            } else {
                n.selected = selected;
                true
            }
        });
    }

    pub fn is_checked(&self, id: NodeId) -> bool {
        self.with_node(id, |n| n.checked).unwrap_or(false)
    }

    pub fn set_checked(&self, id: NodeId, checked: bool) {
        self.with_node_mut(id, |n| {
            if n.checked == checked {
                false
            } else {
                n.checked = checked;
                true
            }
        });
    }

    pub fn is_disabled(&self, id: NodeId) -> bool {
        self.with_node(id, |n| n.disabled).unwrap_or(false)
    }

    pub fn set_disabled(&self, id: NodeId, disabled: bool) {
        self.with_node_mut(id, |n| {
            if n.disabled == disabled {
                false
            } else {
                n.disabled = disabled;
                true
            }
        });
    }

    /// Whether the node itself carries the hidden attribute. Does not look
    /// at ancestors; member collection handles subtree pruning.
    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.with_node(id, |n| n.hidden).unwrap_or(false)
    }

    pub fn set_hidden(&self, id: NodeId, hidden: bool) {
        self.with_node_mut(id, |n| {
            if n.hidden == hidden {
                false
            } else {
                n.hidden = hidden;
                true
            }
        });
    }

    pub fn expanded(&self, id: NodeId) -> Option<bool> {
        self.with_node(id, |n| n.expanded).flatten()
    }

    pub fn set_expanded(&self, id: NodeId, expanded: bool) {
        self.with_node_mut(id, |n| {
            if n.expanded == Some(expanded) {
                false
            } else {
                n.expanded = Some(expanded);
                true
            }
        });
    }

    pub fn sort(&self, id: NodeId) -> Option<SortOrder> {
        self.with_node(id, |n| n.sort).flatten()
    }

    pub fn set_sort(&self, id: NodeId, sort: Option<SortOrder>) {
        self.with_node_mut(id, |n| {
            if n.sort == sort {
                false
            } else {
                n.sort = sort;
                true
            }
        });
    }

    pub fn grabbed(&self, id: NodeId) -> Option<bool> {
        self.with_node(id, |n| n.grabbed).flatten()
    }

    pub fn set_grabbed(&self, id: NodeId, grabbed: bool) {
        self.with_node_mut(id, |n| {
            if n.grabbed == Some(grabbed) {
                false
            } else {
                n.grabbed = Some(grabbed);
                true
            }
        });
    }

    pub fn tab_index(&self, id: NodeId) -> Option<i8> {
        self.with_node(id, |n| n.tab_index).flatten()
    }

    pub fn set_tab_index(&self, id: NodeId, tab_index: Option<i8>) {
        self.with_node_mut(id, |n| {
            if n.tab_index == tab_index {
                false
            } else {
                n.tab_index = tab_index;
                true
            }
        });
    }

    pub fn range(&self, id: NodeId) -> Option<RangeValue> {
        self.with_node(id, |n| n.range).flatten()
    }

    pub fn set_range(&self, id: NodeId, range: Option<RangeValue>) {
        self.with_node_mut(id, |n| {
            if n.range == range {
                false
            } else {
                n.range = range;
                true
            }
        });
    }

    pub fn controls(&self, id: NodeId) -> Option<NodeId> {
        self.with_node(id, |n| n.controls).flatten()
    }

    pub fn set_controls(&self, id: NodeId, controls: Option<NodeId>) {
        self.with_node_mut(id, |n| {
            if n.controls == controls {
                false
            } else {
                n.controls = controls;
                true
            }
        });
    }

    pub fn active_descendant(&self, id: NodeId) -> Option<NodeId> {
        self.with_node(id, |n| n.active_descendant).flatten()
    }

    pub fn set_active_descendant(&self, id: NodeId, descendant: Option<NodeId>) {
        self.with_node_mut(id, |n| {
            if n.active_descendant == descendant {
                false
            } else {
                n.active_descendant = descendant;
                true
            }
        });
    }

    // -------------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------------

    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.with_node(id, |n| n.rect).flatten()
    }

    /// Assign a layout rectangle. Bumps `layout_revision` (not `revision`),
    /// which is the content-size probe scrollbars watch.
    pub fn set_rect(&self, id: NodeId, rect: Rect) {
        if let Ok(mut inner) = self.inner.write() {
            let changed = match inner.nodes.get_mut(id) {
                Some(node) if node.rect != Some(rect) => {
                    node.rect = Some(rect);
                    true
                }
                _ => false,
            };
            if changed {
                inner.layout_revision += 1;
                self.dirty.store(true, Ordering::SeqCst);
            }
        }
    }

    pub fn scroll(&self, id: NodeId) -> (u16, u16) {
        self.with_node(id, |n| n.scroll).unwrap_or((0, 0))
    }

    pub fn set_scroll(&self, id: NodeId, x: u16, y: u16) {
        self.with_node_mut(id, |n| {
            if n.scroll == (x, y) {
                false
            } else {
                n.scroll = (x, y);
                true
            }
        });
    }

    /// Attribute revision counter; bumped by every effective attribute or
    /// structure change.
    pub fn revision(&self) -> u64 {
        self.with_inner(|inner| inner.revision).unwrap_or(0)
    }

    /// Layout revision counter; bumped by every effective rect change.
    pub fn layout_revision(&self) -> u64 {
        self.with_inner(|inner| inner.layout_revision).unwrap_or(0)
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    /// The single tree-wide focused node.
    pub fn focus(&self) -> Option<NodeId> {
        self.with_inner(|inner| inner.focused).flatten()
    }

    /// Move tree focus. Setting focus to a vacant id is a no-op; `None`
    /// always clears. Returns true if focus changed.
    pub fn set_focus(&self, id: Option<NodeId>) -> bool {
        if let Ok(mut inner) = self.inner.write() {
            if let Some(target) = id {
                if !inner.nodes.contains_key(target) {
                    return false;
                }
            }
            if inner.focused == id {
                return false;
            }
            log::trace!("[tree] focus {:?} -> {:?}", inner.focused, id);
            inner.focused = id;
            self.dirty.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    // -------------------------------------------------------------------------
    // Member collection
    // -------------------------------------------------------------------------

    /// Collect the member items of a composite widget: a preorder walk from
    /// `container` that prunes hidden subtrees, skips disabled nodes, stops
    /// at nested composite containers, and keeps nodes whose role is in
    /// `roles`.
    pub fn collect_members(&self, container: NodeId, roles: &[Role]) -> Vec<NodeId> {
        self.with_inner(|inner| {
            let mut result = Vec::new();
            if inner.nodes.contains_key(container) {
                collect_into(&inner.nodes, container, roles, true, &mut result);
            }
            result
        })
        .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

fn collect_into(
    nodes: &SlotMap<NodeId, Node>,
    id: NodeId,
    roles: &[Role],
    is_scope_root: bool,
    out: &mut Vec<NodeId>,
) {
    let node = match nodes.get(id) {
        Some(n) => n,
        None => return,
    };
    if !is_scope_root {
        if node.hidden {
            return;
        }
        if roles.contains(&node.role) && !node.disabled {
            out.push(id);
        }
        // Nested widgets own their own members.
        if node.role.is_composite() {
            return;
        }
    }
    for &child in &node.children {
        collect_into(nodes, child, roles, false, out);
    }
}

impl Clone for NodeTree {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl Default for NodeTree {
    fn default() -> Self {
        Self::new()
    }
}
