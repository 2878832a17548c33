//! Scrollbar state and geometry.

use std::sync::{Arc, RwLock};

use ariadom::{NodeId, NodeTree, RangeValue, Rect, Role};

use crate::composite::Orientation;
use crate::error::WidgetError;

/// Behavior switches for a [`ScrollBar`]
#[derive(Debug, Clone, Copy)]
pub struct ScrollBarOptions {
    pub orientation: Orientation,
    /// Snap the offset to row boundaries after every change
    pub adjusted: bool,
    /// Let arrow keys nudge the offset one cell at a time
    pub arrow_keys_enabled: bool,
    /// Smallest thumb length in cells
    pub min_thumb: u16,
}

impl Default for ScrollBarOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Vertical,
            adjusted: false,
            arrow_keys_enabled: false,
            min_thumb: 1,
        }
    }
}

/// Computed scrollbar geometry, in cells along the track axis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrollBarGeometry {
    /// Track length; equals the host viewport extent
    pub track: u16,
    /// Thumb length
    pub thumb_size: u16,
    /// Thumb start, measured from the track start
    pub thumb_offset: u16,
    /// Largest valid host scroll offset
    pub max_scroll: u16,
}

impl ScrollBarGeometry {
    fn compute(viewport: u16, content: u16, offset: u16, min_thumb: u16) -> Self {
        let track = viewport;
        if content <= viewport || track == 0 {
            return Self {
                track,
                thumb_size: track,
                thumb_offset: 0,
                max_scroll: 0,
            };
        }
        let max_scroll = content - viewport;
        // Thumb length is proportional to the visible share of the content
        let raw = (viewport as f32 * viewport as f32) / content as f32;
        let thumb_size = (raw as u16).clamp(min_thumb.max(1), track);
        let span = track - thumb_size;
        let thumb_offset = (offset as f32 * span as f32 / max_scroll as f32) as u16;
        Self {
            track,
            thumb_size,
            thumb_offset,
            max_scroll,
        }
    }

    /// Host offset that places the thumb start at `position` on the track
    pub(super) fn offset_at_thumb(&self, position: u16) -> u16 {
        let span = self.track.saturating_sub(self.thumb_size);
        if span == 0 {
            return 0;
        }
        let position = position.min(span);
        let offset = (position as f32 * self.max_scroll as f32 / span as f32).round() as u16;
        offset.min(self.max_scroll)
    }

    pub(super) fn thumb_contains(&self, position: u16) -> bool {
        position >= self.thumb_offset && position < self.thumb_offset + self.thumb_size
    }
}

/// Active thumb drag session
#[derive(Debug, Clone, Copy)]
pub(super) struct ScrollDrag {
    /// Pointer offset within the thumb at grab time
    pub(super) grab_offset: u16,
}

#[derive(Debug, Default)]
struct ScrollBarInner {
    geometry: ScrollBarGeometry,
    drag: Option<ScrollDrag>,
    /// Last observed (layout revision, content rect) pair
    probe: Option<(u64, Rect)>,
}

/// Keeps a scrollbar node and its scrollable host in step.
///
/// The bar node's `controls` attribute names the host; the host's first
/// non-scrollbar child is the content whose rect gives the scrollable
/// extent. `sync` mirrors the host offset into the bar's range value and
/// geometry; input handlers translate pointer, wheel and key events back
/// into host offset changes.
#[derive(Debug)]
pub struct ScrollBar {
    tree: NodeTree,
    /// The `Role::ScrollBar` node
    bar: NodeId,
    /// The scrollable host named by the bar's `controls` link
    host: NodeId,
    options: ScrollBarOptions,
    inner: Arc<RwLock<ScrollBarInner>>,
}

impl Clone for ScrollBar {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            bar: self.bar,
            host: self.host,
            options: self.options,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl ScrollBar {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Bind to `bar`, resolving the host through its `controls` link.
    pub fn bind(
        tree: &NodeTree,
        bar: NodeId,
        options: ScrollBarOptions,
    ) -> Result<Self, WidgetError> {
        let role = tree.role(bar).ok_or(WidgetError::MissingContainer)?;
        if role != Role::ScrollBar {
            return Err(WidgetError::RoleMismatch {
                expected: Role::ScrollBar,
                found: role,
            });
        }
        let host = tree.controls(bar).ok_or(WidgetError::MissingContainer)?;
        if !tree.contains(host) {
            return Err(WidgetError::MissingContainer);
        }
        let scrollbar = Self {
            tree: tree.clone(),
            bar,
            host,
            options,
            inner: Arc::new(RwLock::new(ScrollBarInner::default())),
        };
        scrollbar.sync();
        Ok(scrollbar)
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn bar(&self) -> NodeId {
        self.bar
    }

    pub fn host(&self) -> NodeId {
        self.host
    }

    pub fn options(&self) -> &ScrollBarOptions {
        &self.options
    }

    pub fn geometry(&self) -> ScrollBarGeometry {
        self.inner
            .read()
            .map(|inner| inner.geometry)
            .unwrap_or_default()
    }

    /// Current host scroll offset along the bar's axis
    pub fn offset(&self) -> u16 {
        let (x, y) = self.tree.scroll(self.host);
        match self.options.orientation {
            Orientation::Vertical => y,
            Orientation::Horizontal => x,
        }
    }

    pub fn max_scroll(&self) -> u16 {
        self.geometry().max_scroll
    }

    pub(super) fn drag(&self) -> Option<ScrollDrag> {
        self.inner.read().ok().and_then(|inner| inner.drag)
    }

    pub(super) fn set_drag(&self, drag: Option<ScrollDrag>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.drag = drag;
        }
    }

    // -------------------------------------------------------------------------
    // Synchronization
    // -------------------------------------------------------------------------

    /// Recompute geometry from the host and content rects and mirror it
    /// into the bar node.
    ///
    /// Writes the bar's range value (`now` = offset, `max` = content −
    /// viewport), toggles its `disabled` attribute when the content fits,
    /// and parks the bar rect on the host's trailing edge.
    pub fn sync(&self) {
        let Some((viewport, content, offset)) = self.metrics() else {
            return;
        };
        let geometry =
            ScrollBarGeometry::compute(viewport, content, offset, self.options.min_thumb);
        self.tree.set_range(
            self.bar,
            Some(RangeValue {
                now: offset,
                min: 0,
                max: geometry.max_scroll,
            }),
        );
        self.tree.set_disabled(self.bar, geometry.max_scroll == 0);
        if let Some(host_rect) = self.tree.rect(self.host) {
            let bar_rect = match self.options.orientation {
                Orientation::Vertical => Rect::new(
                    host_rect.right().saturating_sub(1),
                    host_rect.y,
                    1,
                    host_rect.height,
                ),
                Orientation::Horizontal => Rect::new(
                    host_rect.x,
                    host_rect.bottom().saturating_sub(1),
                    host_rect.width,
                    1,
                ),
            };
            self.tree.set_rect(self.bar, bar_rect);
        }
        // Cache the probe pair after our own rect write so the next poll
        // sees a quiet layout
        let revision = self.tree.layout_revision();
        let content_rect = self.content().and_then(|node| self.tree.rect(node));
        if let Ok(mut inner) = self.inner.write() {
            inner.geometry = geometry;
            inner.probe = content_rect.map(|rect| (revision, rect));
        }
    }

    /// Re-sync when the layout or the content extent changed since the
    /// last sync. Returns whether a re-sync happened.
    pub fn poll(&self) -> bool {
        let revision = self.tree.layout_revision();
        let content_rect = self.content().and_then(|node| self.tree.rect(node));
        let probe = content_rect.map(|rect| (revision, rect));
        let stale = self
            .inner
            .read()
            .map(|inner| inner.probe != probe)
            .unwrap_or(false);
        if stale {
            self.sync();
        }
        stale
    }

    // -------------------------------------------------------------------------
    // Offset changes
    // -------------------------------------------------------------------------

    /// Clamp and apply a new offset, snapping to a row boundary in
    /// adjusted mode, then re-sync the bar.
    pub fn set_offset(&self, offset: u16) {
        let Some((viewport, content, _)) = self.metrics() else {
            return;
        };
        let max_scroll = content.saturating_sub(viewport);
        let mut offset = offset.min(max_scroll);
        if self.options.adjusted {
            offset = self.snap_to_item(offset).min(max_scroll);
        }
        let (x, y) = self.tree.scroll(self.host);
        match self.options.orientation {
            Orientation::Vertical => self.tree.set_scroll(self.host, x, offset),
            Orientation::Horizontal => self.tree.set_scroll(self.host, offset, y),
        }
        self.sync();
    }

    pub fn scroll_by(&self, delta: i32) {
        let next = (self.offset() as i32 + delta).max(0) as u16;
        self.set_offset(next);
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Pointer position projected onto the track axis, from the track start
    pub(super) fn track_position(&self, x: u16, y: u16) -> Option<u16> {
        let rect = self.tree.rect(self.bar)?;
        Some(match self.options.orientation {
            Orientation::Vertical => y.saturating_sub(rect.y),
            Orientation::Horizontal => x.saturating_sub(rect.x),
        })
    }

    /// (viewport extent, content extent, current offset) along the axis
    fn metrics(&self) -> Option<(u16, u16, u16)> {
        let host_rect = self.tree.rect(self.host)?;
        let content_rect = self.tree.rect(self.content()?)?;
        Some(match self.options.orientation {
            Orientation::Vertical => (
                host_rect.height,
                content_rect.height,
                self.tree.scroll(self.host).1,
            ),
            Orientation::Horizontal => (
                host_rect.width,
                content_rect.width,
                self.tree.scroll(self.host).0,
            ),
        })
    }

    /// First child of the host that is not a scrollbar; its rect is the
    /// scrollable extent
    pub fn content(&self) -> Option<NodeId> {
        self.tree
            .children(self.host)
            .into_iter()
            .find(|&child| self.tree.role(child) != Some(Role::ScrollBar))
    }

    /// Snap `offset` to the boundary of the row-like item under the
    /// viewport's leading edge, rounding to the next item once more than
    /// half scrolled past the current one.
    fn snap_to_item(&self, offset: u16) -> u16 {
        let Some(content) = self.content() else {
            return offset;
        };
        let Some(content_rect) = self.tree.rect(content) else {
            return offset;
        };
        let vertical = self.options.orientation == Orientation::Vertical;
        let content_start = if vertical { content_rect.y } else { content_rect.x };
        let target = content_start.saturating_add(offset);
        for item in self.tree.descendants(content) {
            if self.tree.is_hidden(item) {
                continue;
            }
            if !self.tree.role(item).map(Role::is_row_like).unwrap_or(false) {
                continue;
            }
            let Some(rect) = self.tree.rect(item) else {
                continue;
            };
            let (start, extent) = if vertical {
                (rect.y, rect.height)
            } else {
                (rect.x, rect.width)
            };
            if extent == 0 || target < start || target >= start + extent {
                continue;
            }
            let item_offset = start.saturating_sub(content_start);
            let into = target - start;
            return if into > extent / 2 {
                item_offset + extent
            } else {
                item_offset
            };
        }
        offset
    }
}
