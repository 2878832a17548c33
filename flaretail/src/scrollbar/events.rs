//! Scrollbar input handling.

use crate::composite::Orientation;
use crate::event::EventResult;
use crate::input::{Key, KeyCombo, Modifiers, PointerButton};
use crate::traits::WidgetEvents;

use super::state::{ScrollBar, ScrollDrag};

impl WidgetEvents for ScrollBar {
    fn on_key(&self, combo: KeyCombo) -> EventResult {
        if !combo.modifiers.none() {
            return EventResult::Ignored;
        }
        self.poll();
        let geometry = self.geometry();
        if geometry.max_scroll == 0 {
            return EventResult::Ignored;
        }
        let page = geometry.track as i32;
        match combo.key {
            Key::Home => self.set_offset(0),
            Key::End => self.set_offset(geometry.max_scroll),
            Key::PageUp => self.scroll_by(-page),
            Key::PageDown => self.scroll_by(page),
            Key::Up | Key::Left if self.options().arrow_keys_enabled => self.scroll_by(-1),
            Key::Down | Key::Right if self.options().arrow_keys_enabled => self.scroll_by(1),
            _ => return EventResult::Ignored,
        }
        EventResult::Consumed
    }

    fn on_press(&self, x: u16, y: u16, button: PointerButton, _modifiers: Modifiers) -> EventResult {
        if button != PointerButton::Left {
            return EventResult::Ignored;
        }
        if self.drag().is_some() {
            // A press while a session is live stays unhandled
            return EventResult::Ignored;
        }
        self.poll();
        let geometry = self.geometry();
        if geometry.max_scroll == 0 {
            return EventResult::Ignored;
        }
        let Some(position) = self.track_position(x, y) else {
            return EventResult::Ignored;
        };
        let grab_offset = if geometry.thumb_contains(position) {
            // Grabbed the thumb: remember the offset within it
            position - geometry.thumb_offset
        } else {
            // Track press: jump so the thumb lands under the pointer at
            // the same relative spot, then keep dragging from there
            let track = geometry.track.max(1);
            let grab = ((position as f32 / track as f32) * geometry.thumb_size as f32) as u16;
            self.set_offset(geometry.offset_at_thumb(position.saturating_sub(grab)));
            grab
        };
        self.set_drag(Some(ScrollDrag { grab_offset }));
        EventResult::StartDrag
    }

    fn on_drag(&self, x: u16, y: u16) -> EventResult {
        let Some(drag) = self.drag() else {
            return EventResult::Ignored;
        };
        let Some(position) = self.track_position(x, y) else {
            return EventResult::Ignored;
        };
        let geometry = self.geometry();
        let offset = geometry.offset_at_thumb(position.saturating_sub(drag.grab_offset));
        self.set_offset(offset);
        EventResult::Consumed
    }

    fn on_release(&self) -> EventResult {
        if self.drag().is_some() {
            self.set_drag(None);
            EventResult::Consumed
        } else {
            EventResult::Ignored
        }
    }

    fn on_wheel(&self, delta_x: i16, delta_y: i16) -> EventResult {
        let delta = match self.options().orientation {
            Orientation::Vertical => delta_y,
            Orientation::Horizontal => delta_x,
        };
        if delta == 0 || self.max_scroll() == 0 {
            return EventResult::Ignored;
        }
        self.scroll_by(delta as i32);
        EventResult::Consumed
    }
}
