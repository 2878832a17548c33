//! Composite selection state.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use ariadom::{NodeId, NodeTree};

use super::options::{CompositeOptions, SelectedAttr};
use super::search::SearchBuffer;
use crate::error::WidgetError;
use crate::event::{EventQueue, WidgetEvent};

/// Unique identifier for a composite widget instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompositeId(usize);

impl CompositeId {
    pub(crate) fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for CompositeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "__composite_{}", self.0)
    }
}

/// Internal state for a composite widget
#[derive(Debug, Default)]
pub(super) struct CompositeInner {
    /// Member nodes in document order
    pub(super) members: Vec<NodeId>,
    /// Selected members in selection order
    pub(super) selected: Vec<NodeId>,
    /// Member holding the roving focus
    pub(super) focused: Option<NodeId>,
    /// Type-ahead search buffer
    pub(super) search: SearchBuffer,
}

/// Selection engine bound to one container node.
///
/// One `Composite` backs each mounted widget. It owns the member list,
/// the selection, and the roving focus, and keeps the node tree's
/// attributes (`selected`/`checked`, `tab_index`, `active_descendant`)
/// in step with them. Handles are cheap to clone and share state.
#[derive(Debug)]
pub struct Composite {
    /// Unique identifier for this composite instance
    id: CompositeId,
    /// Tree holding the container and its members
    tree: NodeTree,
    /// Container node events are attributed to
    container: NodeId,
    /// Node members are collected under (usually the container itself)
    scope: NodeId,
    options: Arc<CompositeOptions>,
    queue: EventQueue,
    /// Internal state
    inner: Arc<RwLock<CompositeInner>>,
    /// Dirty flag for re-render
    dirty: Arc<AtomicBool>,
}

impl Clone for Composite {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            tree: self.tree.clone(),
            container: self.container,
            scope: self.scope,
            options: Arc::clone(&self.options),
            queue: self.queue.clone(),
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl Composite {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Bind a selection engine to `container`, collecting members from it.
    pub fn bind(
        tree: &NodeTree,
        container: NodeId,
        options: CompositeOptions,
        queue: &EventQueue,
    ) -> Result<Self, WidgetError> {
        Self::bind_scoped(tree, container, container, options, queue)
    }

    /// Bind with a separate member scope.
    ///
    /// The grid uses this: events carry the grid container, but members
    /// are the data rows under the body row group only.
    pub fn bind_scoped(
        tree: &NodeTree,
        container: NodeId,
        scope: NodeId,
        options: CompositeOptions,
        queue: &EventQueue,
    ) -> Result<Self, WidgetError> {
        if !tree.contains(container) || !tree.contains(scope) {
            return Err(WidgetError::MissingContainer);
        }
        let composite = Self {
            id: CompositeId::new(),
            tree: tree.clone(),
            container,
            scope,
            options: Arc::new(options),
            queue: queue.clone(),
            inner: Arc::new(RwLock::new(CompositeInner::default())),
            dirty: Arc::new(AtomicBool::new(false)),
        };
        composite.refresh_members();
        Ok(composite)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn id(&self) -> CompositeId {
        self.id
    }

    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    pub fn options(&self) -> &CompositeOptions {
        &self.options
    }

    /// Current members, in document order
    pub fn members(&self) -> Vec<NodeId> {
        self.inner
            .read()
            .map(|inner| inner.members.clone())
            .unwrap_or_default()
    }

    /// Selected members, in selection order
    pub fn selected(&self) -> Vec<NodeId> {
        self.inner
            .read()
            .map(|inner| inner.selected.clone())
            .unwrap_or_default()
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.inner.read().ok().and_then(|inner| inner.focused)
    }

    pub fn is_selected(&self, member: NodeId) -> bool {
        self.inner
            .read()
            .map(|inner| inner.selected.contains(&member))
            .unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Membership
    // -------------------------------------------------------------------------

    /// Re-collect members from the tree after structural edits.
    ///
    /// Selection is rebuilt from the members' selected attributes, so
    /// state written through the engine survives a refresh. Focus is
    /// cleared and the roving tab index is reseeded.
    pub fn refresh_members(&self) {
        let members = self.tree.collect_members(self.scope, &self.options.item_roles);
        let selected: Vec<NodeId> = members
            .iter()
            .copied()
            .filter(|&member| self.attr_selected(member))
            .collect();
        if let Ok(mut inner) = self.inner.write() {
            inner.members = members;
            inner.selected = selected;
            inner.focused = None;
            inner.search.clear();
        }
        self.seed_tab_indices();
        self.tree.set_active_descendant(self.container, None);
        self.mark_dirty();
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Replace the selection wholesale.
    ///
    /// Non-members and duplicates are dropped; single-select engines keep
    /// only the first entry. Emits `Selected` when the result differs from
    /// the current selection.
    pub fn set_selected(&self, members: &[NodeId]) {
        let (previous, next) = {
            let Ok(mut inner) = self.inner.write() else {
                return;
            };
            let mut next: Vec<NodeId> = Vec::with_capacity(members.len());
            for &member in members {
                if inner.members.contains(&member) && !next.contains(&member) {
                    next.push(member);
                }
            }
            if !self.options.multiselectable {
                next.truncate(1);
            }
            if next == inner.selected {
                return;
            }
            let previous = std::mem::replace(&mut inner.selected, next.clone());
            (previous, next)
        };
        for member in &previous {
            if !next.contains(member) {
                self.write_attr_selected(*member, false);
            }
        }
        for member in &next {
            self.write_attr_selected(*member, true);
        }
        self.mark_dirty();
        self.emit_selected(&next);
    }

    /// Select every member; no-op on single-select engines.
    pub fn select_all(&self) {
        if !self.options.multiselectable {
            return;
        }
        let members = self.members();
        self.set_selected(&members);
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    /// Move the roving focus.
    ///
    /// Writes `tab_index` 0 on the focused member and -1 on every other,
    /// mirrors the container's `active_descendant`, and moves the
    /// tree-wide focus. `None` parks focus on the container.
    pub fn set_focused(&self, member: Option<NodeId>) {
        let members = self.members();
        let member = member.filter(|m| members.contains(m));
        let changed = {
            let Ok(mut inner) = self.inner.write() else {
                return;
            };
            if inner.focused == member {
                false
            } else {
                inner.focused = member;
                true
            }
        };
        if !changed {
            return;
        }
        match member {
            Some(target) => {
                for m in &members {
                    self.tree
                        .set_tab_index(*m, Some(if *m == target { 0 } else { -1 }));
                }
                self.tree.set_active_descendant(self.container, Some(target));
                self.tree.set_focus(Some(target));
            }
            None => {
                self.seed_tab_indices();
                self.tree.set_active_descendant(self.container, None);
                self.tree.set_focus(Some(self.container));
            }
        }
        self.mark_dirty();
    }

    // -------------------------------------------------------------------------
    // Dirty flag
    // -------------------------------------------------------------------------

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }

    pub(crate) fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    pub(super) fn attr_selected(&self, member: NodeId) -> bool {
        match self.options.selected_attr {
            SelectedAttr::Selected => self.tree.is_selected(member),
            SelectedAttr::Checked => self.tree.is_checked(member),
        }
    }

    fn write_attr_selected(&self, member: NodeId, value: bool) {
        match self.options.selected_attr {
            SelectedAttr::Selected => self.tree.set_selected(member, value),
            SelectedAttr::Checked => self.tree.set_checked(member, value),
        }
    }

    /// Make the first selected member (else the first member) the tab
    /// stop so the widget stays reachable while nothing is focused.
    fn seed_tab_indices(&self) {
        let (members, selected) = {
            let Ok(inner) = self.inner.read() else {
                return;
            };
            (inner.members.clone(), inner.selected.clone())
        };
        let Some(anchor) = selected.first().or(members.first()).copied() else {
            return;
        };
        for member in &members {
            self.tree
                .set_tab_index(*member, Some(if *member == anchor { 0 } else { -1 }));
        }
    }

    fn emit_selected(&self, selected: &[NodeId]) {
        let ids = selected
            .iter()
            .filter_map(|&member| self.tree.id(member))
            .collect();
        let labels = selected
            .iter()
            .filter_map(|&member| self.tree.label(member))
            .collect();
        log::debug!("[composite] {} selected {} item(s)", self.id, selected.len());
        self.queue.push(WidgetEvent::Selected {
            source: self.id,
            items: selected.to_vec(),
            ids,
            labels,
        });
    }

    pub(super) fn with_search<R>(&self, f: impl FnOnce(&mut SearchBuffer) -> R) -> Option<R> {
        self.inner.write().ok().map(|mut inner| f(&mut inner.search))
    }
}
