//! Widget event plumbing.
//!
//! Input handlers return an [`EventResult`] so hosts know whether to keep
//! routing a native event. Semantic outcomes (selection changed, column
//! sorted, menu opened) are queued as [`WidgetEvent`]s on a shared
//! [`EventQueue`] and consumed by the application one per tick; widget
//! callbacks never call back into application code directly.

use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

use ariadom::NodeId;

use crate::composite::CompositeId;
use crate::grid::{GridColumn, SortCondition};

/// Result of handling an input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was not handled, propagate to the next target
    Ignored,
    /// Event was handled, stop propagation
    Consumed,
    /// Event was handled and opened a drag session; route subsequent
    /// drag/release events to the same widget
    StartDrag,
}

impl EventResult {
    pub fn is_handled(&self) -> bool {
        !matches!(self, EventResult::Ignored)
    }
}

/// Semantic events emitted by widgets
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// Selection changed
    Selected {
        source: CompositeId,
        /// Selected member nodes, in selection order
        items: Vec<NodeId>,
        /// `id` attributes of selected members that carry one
        ids: Vec<String>,
        /// Labels of selected members that carry one
        labels: Vec<String>,
    },
    /// Grid rows were reordered by a sort
    Sorted {
        source: CompositeId,
        condition: SortCondition,
    },
    /// Grid columns were reordered or had visibility toggled
    ColumnModified {
        source: CompositeId,
        columns: Vec<GridColumn>,
    },
    /// Grid row visibility changed through a filter
    Filtered { source: CompositeId },
    /// A menu or submenu became visible
    MenuOpened { menu: CompositeId },
    /// A menu or submenu was hidden
    MenuClosed { menu: CompositeId },
    /// A splitter moved
    Resized {
        source: CompositeId,
        /// New separator position in cells from the leading edge
        position: u16,
    },
    /// Membership was rebuilt; cached member lists are stale
    Rebuilt { source: CompositeId },
}

/// Shared FIFO queue of widget events.
///
/// Clones share the same queue. Widgets push during input handling; the
/// host drains between ticks.
#[derive(Debug, Default)]
pub struct EventQueue {
    inner: Arc<RwLock<VecDeque<WidgetEvent>>>,
}

impl Clone for EventQueue {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: WidgetEvent) {
        if let Ok(mut queue) = self.inner.write() {
            queue.push_back(event);
        }
    }

    /// Pop the oldest event, if any
    pub fn next(&self) -> Option<WidgetEvent> {
        self.inner.write().ok().and_then(|mut queue| queue.pop_front())
    }

    /// Take every queued event at once
    pub fn drain(&self) -> Vec<WidgetEvent> {
        self.inner
            .write()
            .map(|mut queue| queue.drain(..).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|queue| queue.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
