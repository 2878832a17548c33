//! Splitter widget.
//!
//! Binds a `separator` node sitting between two panes. The widget owns the
//! separator's position as a single number on the movement axis, clamped to
//! the configured range and mirrored to `aria-valuenow`/`min`/`max`. Layout
//! of the panes themselves is the host's job; it listens for
//! [`WidgetEvent::Resized`] and reflows.

use std::sync::{Arc, RwLock};

use ariadom::{NodeId, NodeTree, RangeValue, Role};

use crate::composite::{CompositeId, Orientation};
use crate::error::WidgetError;
use crate::event::{EventQueue, EventResult, WidgetEvent};
use crate::input::{Key, KeyCombo, Modifiers, PointerButton};
use crate::traits::WidgetEvents;

/// Orientation here is the separator bar's own: a vertical bar splits panes
/// side by side and moves horizontally.
#[derive(Debug, Clone)]
pub struct SplitterOptions {
    pub orientation: Orientation,
    /// Smallest allowed position
    pub min: u16,
    /// Largest allowed position
    pub max: u16,
}

impl Default for SplitterOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            min: 0,
            max: u16::MAX,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SplitterDrag {
    grab_offset: u16,
}

#[derive(Debug)]
struct SplitterInner {
    position: u16,
    drag: Option<SplitterDrag>,
}

#[derive(Debug)]
pub struct Splitter {
    id: CompositeId,
    tree: NodeTree,
    separator: NodeId,
    options: SplitterOptions,
    queue: EventQueue,
    inner: Arc<RwLock<SplitterInner>>,
}

impl Clone for Splitter {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            tree: self.tree.clone(),
            separator: self.separator,
            options: self.options.clone(),
            queue: self.queue.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Splitter {
    /// Bind to an existing `separator` node.
    ///
    /// The initial position is taken from the node's range value when one is
    /// present, otherwise it starts at `min`.
    pub fn bind(
        tree: &NodeTree,
        separator: NodeId,
        options: SplitterOptions,
        queue: &EventQueue,
    ) -> Result<Self, WidgetError> {
        let role = tree.role(separator).ok_or(WidgetError::MissingContainer)?;
        if role != Role::Separator {
            return Err(WidgetError::RoleMismatch {
                expected: Role::Separator,
                found: role,
            });
        }
        if options.min > options.max {
            return Err(WidgetError::Unsupported("empty splitter range"));
        }
        let position = tree
            .range(separator)
            .map(|range| range.now)
            .unwrap_or(options.min)
            .clamp(options.min, options.max);
        let splitter = Self {
            id: CompositeId::new(),
            tree: tree.clone(),
            separator,
            options,
            queue: queue.clone(),
            inner: Arc::new(RwLock::new(SplitterInner {
                position,
                drag: None,
            })),
        };
        splitter.write_range(position);
        Ok(splitter)
    }

    pub fn separator(&self) -> NodeId {
        self.separator
    }

    pub fn options(&self) -> &SplitterOptions {
        &self.options
    }

    pub fn position(&self) -> u16 {
        self.inner
            .read()
            .map(|inner| inner.position)
            .unwrap_or_default()
    }

    /// Move the separator, clamping to `[min, max]`. Emits
    /// [`WidgetEvent::Resized`] when the position actually changes.
    pub fn set_position(&self, position: u16) {
        let clamped = position.clamp(self.options.min, self.options.max);
        let changed = {
            let Ok(mut inner) = self.inner.write() else {
                return;
            };
            if inner.position == clamped {
                false
            } else {
                inner.position = clamped;
                true
            }
        };
        if !changed {
            return;
        }
        self.write_range(clamped);
        log::debug!("[splitter] {} moved to {}", self.id, clamped);
        self.queue.push(WidgetEvent::Resized {
            source: self.id,
            position: clamped,
        });
    }

    pub fn move_by(&self, delta: i32) {
        let next = (i32::from(self.position()) + delta).max(0) as u16;
        self.set_position(next);
    }

    fn write_range(&self, position: u16) {
        self.tree.set_range(
            self.separator,
            Some(RangeValue::new(position, self.options.min, self.options.max)),
        );
    }

    /// Pointer coordinate along the movement axis, relative to the pane
    /// container so it is comparable with the position.
    fn along(&self, x: u16, y: u16) -> u16 {
        let pointer = match self.options.orientation {
            Orientation::Vertical => x,
            Orientation::Horizontal => y,
        };
        let origin = self
            .tree
            .parent(self.separator)
            .and_then(|parent| self.tree.rect(parent))
            .map(|rect| match self.options.orientation {
                Orientation::Vertical => rect.x,
                Orientation::Horizontal => rect.y,
            })
            .unwrap_or(0);
        pointer.saturating_sub(origin)
    }

    fn drag(&self) -> Option<SplitterDrag> {
        self.inner.read().ok().and_then(|inner| inner.drag)
    }

    fn set_drag(&self, drag: Option<SplitterDrag>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.drag = drag;
        }
    }
}

impl WidgetEvents for Splitter {
    fn on_key(&self, combo: KeyCombo) -> EventResult {
        if !combo.modifiers.none() {
            return EventResult::Ignored;
        }
        match combo.key {
            Key::Home => self.set_position(self.options.min),
            Key::End => self.set_position(self.options.max),
            Key::Up | Key::Left => self.move_by(-1),
            Key::Down | Key::Right => self.move_by(1),
            _ => return EventResult::Ignored,
        }
        EventResult::Consumed
    }

    fn on_press(
        &self,
        x: u16,
        y: u16,
        button: PointerButton,
        _modifiers: Modifiers,
    ) -> EventResult {
        if button != PointerButton::Left || self.drag().is_some() {
            return EventResult::Ignored;
        }
        let along = self.along(x, y);
        let grab_offset = along.saturating_sub(self.position());
        self.tree.set_grabbed(self.separator, true);
        self.set_drag(Some(SplitterDrag { grab_offset }));
        EventResult::StartDrag
    }

    fn on_drag(&self, x: u16, y: u16) -> EventResult {
        let Some(drag) = self.drag() else {
            return EventResult::Ignored;
        };
        let along = self.along(x, y);
        self.set_position(along.saturating_sub(drag.grab_offset));
        EventResult::Consumed
    }

    fn on_release(&self) -> EventResult {
        if self.drag().is_none() {
            return EventResult::Ignored;
        }
        self.set_drag(None);
        self.tree.set_grabbed(self.separator, false);
        EventResult::Consumed
    }
}
