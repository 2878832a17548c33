//! Grid input: row selection, header sort clicks, column reorder drags.

use ariadom::row_like_at_point;

use crate::event::EventResult;
use crate::input::{KeyCombo, Modifiers, PointerButton};
use crate::traits::{AsComposite, Focusable, WidgetEvents};

use super::state::Grid;

/// Pointer travel in cells before a header press becomes a reorder drag
const DRAG_THRESHOLD: u16 = 2;

/// One header's place during a reorder session
#[derive(Debug, Clone, Copy)]
pub(super) struct HeaderSlot {
    pub(super) left: u16,
    pub(super) width: u16,
}

/// Active column reorder session.
///
/// Tracks every column's slot geometry and where the grabbed column
/// currently sits. The node tree is untouched until release.
#[derive(Debug, Clone)]
pub(super) struct ReorderDrag {
    /// Column index at press time
    pub(super) start_index: usize,
    /// Column index the grabbed header currently occupies
    pub(super) grabbed: usize,
    /// Pointer x at press
    pub(super) origin_x: u16,
    /// Pointer offset within the grabbed header at press
    pub(super) grab_offset: u16,
    /// Column slots in session order; hidden columns have zero width
    pub(super) slots: Vec<HeaderSlot>,
    /// Crossed the click-vs-drag threshold
    pub(super) moved: bool,
}

impl ReorderDrag {
    /// Apply pointer movement. At most one adjacent midpoint-crossing
    /// swap happens per call; repeated events walk further.
    fn drag_to(&mut self, x: u16) {
        if !self.moved {
            if x.abs_diff(self.origin_x) < DRAG_THRESHOLD {
                return;
            }
            self.moved = true;
        }
        let pointer_left = x.saturating_sub(self.grab_offset);
        let grabbed = self.slots[self.grabbed];
        if self.grabbed > 0 {
            let neighbor = self.slots[self.grabbed - 1];
            let midpoint = neighbor.left.saturating_add(neighbor.width / 2);
            if pointer_left < midpoint {
                // The left neighbor shifts right past the grabbed column
                self.slots[self.grabbed - 1] = HeaderSlot {
                    left: neighbor.left,
                    width: grabbed.width,
                };
                self.slots[self.grabbed] = HeaderSlot {
                    left: neighbor.left.saturating_add(grabbed.width),
                    width: neighbor.width,
                };
                self.grabbed -= 1;
                return;
            }
        }
        if self.grabbed + 1 < self.slots.len() {
            let neighbor = self.slots[self.grabbed + 1];
            let midpoint = neighbor.left.saturating_add(neighbor.width / 2);
            let pointer_right = pointer_left.saturating_add(grabbed.width);
            if pointer_right > midpoint {
                self.slots[self.grabbed] = HeaderSlot {
                    left: grabbed.left,
                    width: neighbor.width,
                };
                self.slots[self.grabbed + 1] = HeaderSlot {
                    left: grabbed.left.saturating_add(neighbor.width),
                    width: grabbed.width,
                };
                self.grabbed += 1;
            }
        }
    }
}

impl WidgetEvents for Grid {
    fn on_key(&self, combo: KeyCombo) -> EventResult {
        self.composite().select_with_keyboard(combo)
    }

    fn on_press(&self, x: u16, y: u16, button: PointerButton, modifiers: Modifiers) -> EventResult {
        if button != PointerButton::Left {
            return EventResult::Ignored;
        }
        if self.reorder().is_some() {
            // A press while a session is live stays unhandled
            return EventResult::Ignored;
        }
        if let Some(index) = self.header_hit(x, y) {
            if self.options().reorderable {
                let slots: Vec<HeaderSlot> = self
                    .column_layout()
                    .into_iter()
                    .map(|(left, width)| HeaderSlot { left, width })
                    .collect();
                let grab_offset = x.saturating_sub(slots[index].left);
                if let Some(cell) = self.header_cell(index) {
                    self.composite().tree().set_grabbed(cell, true);
                }
                self.set_reorder(Some(ReorderDrag {
                    start_index: index,
                    grabbed: index,
                    origin_x: x,
                    grab_offset,
                    slots,
                    moved: false,
                }));
                return EventResult::StartDrag;
            }
            if self.options().sortable {
                if let Some(column_id) = self.column_id(index) {
                    self.sort_column(&column_id, None);
                }
            }
            return EventResult::Consumed;
        }
        let Some(row) = row_like_at_point(self.composite().tree(), self.container(), x, y) else {
            return EventResult::Ignored;
        };
        if !self.members().contains(&row) {
            return EventResult::Ignored;
        }
        self.composite().select_with_pointer(row, modifiers);
        EventResult::Consumed
    }

    fn on_drag(&self, x: u16, _y: u16) -> EventResult {
        let Some(mut drag) = self.reorder() else {
            return EventResult::Ignored;
        };
        drag.drag_to(x);
        self.set_reorder(Some(drag));
        EventResult::Consumed
    }

    fn on_release(&self) -> EventResult {
        let Some(drag) = self.reorder() else {
            return EventResult::Ignored;
        };
        self.set_reorder(None);
        if let Some(cell) = self.header_cell(drag.start_index) {
            self.composite().tree().set_grabbed(cell, false);
        }
        if !drag.moved {
            // Never crossed the threshold: a plain header click sorts
            if self.options().sortable {
                if let Some(column_id) = self.column_id(drag.start_index) {
                    self.sort_column(&column_id, None);
                }
            }
            return EventResult::Consumed;
        }
        if drag.grabbed != drag.start_index {
            self.move_column(drag.start_index, drag.grabbed);
        }
        EventResult::Consumed
    }

    fn on_wheel(&self, delta_x: i16, delta_y: i16) -> EventResult {
        match self.scrollbar() {
            Some(scrollbar) => scrollbar.on_wheel(delta_x, delta_y),
            None => EventResult::Ignored,
        }
    }
}
