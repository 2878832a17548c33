//! Pointer and keyboard selection semantics.

use std::time::Instant;

use ariadom::{node_at_point, NodeId};

use crate::event::EventResult;
use crate::input::{Key, KeyCombo, Modifiers};

use super::state::Composite;

impl Composite {
    // -------------------------------------------------------------------------
    // Pointer
    // -------------------------------------------------------------------------

    /// Apply a pointer press on `target`.
    ///
    /// Plain press replaces the selection; shift extends a range from the
    /// selection anchor; ctrl (or meta) toggles. Focus follows the last
    /// selected member.
    pub fn select_with_pointer(&self, target: NodeId, modifiers: Modifiers) {
        let members = self.members();
        if !members.contains(&target) {
            return;
        }
        let multiselectable = self.options().multiselectable;
        let selection = self.selected();
        let next: Vec<NodeId> = if modifiers.shift && multiselectable {
            let anchor = selection
                .first()
                .copied()
                .or_else(|| self.focused())
                .unwrap_or(target);
            range_between(&members, anchor, target)
        } else if modifiers.ctrl_or_meta() {
            if multiselectable {
                let mut next = selection.clone();
                match next.iter().position(|&m| m == target) {
                    Some(position) => {
                        next.remove(position);
                    }
                    None => next.push(target),
                }
                next
            } else if selection.is_empty() {
                vec![target]
            } else if selection == [target] {
                Vec::new()
            } else {
                // Single-select with a different member selected: ignore
                return;
            }
        } else {
            vec![target]
        };
        self.set_selected(&next);
        let focus = self.selected().last().copied().or(Some(target));
        self.set_focused(focus);
    }

    /// Resolve the member under a point, climbing out of member internals.
    ///
    /// Hit testing returns the deepest node; a press usually lands on a cell
    /// or label inside the member, so walk ancestors until one of them is a
    /// member of this widget.
    pub fn member_at_point(&self, x: u16, y: u16) -> Option<NodeId> {
        let tree = self.tree();
        let mut node = node_at_point(tree, self.container(), x, y)?;
        let members = self.members();
        loop {
            if members.contains(&node) {
                return Some(node);
            }
            node = tree.parent(node)?;
        }
    }

    // -------------------------------------------------------------------------
    // Keyboard
    // -------------------------------------------------------------------------

    /// Apply a key combo against the member list.
    pub fn select_with_keyboard(&self, combo: KeyCombo) -> EventResult {
        self.select_with_keyboard_at(combo, Instant::now())
    }

    /// Same as [`select_with_keyboard`](Self::select_with_keyboard) with an
    /// injected clock, so type-ahead expiry is testable.
    pub fn select_with_keyboard_at(&self, combo: KeyCombo, now: Instant) -> EventResult {
        let modifiers = combo.modifiers;
        match combo.key {
            Key::Home | Key::PageUp => self.jump_edge(false, modifiers),
            Key::End | Key::PageDown => self.jump_edge(true, modifiers),
            Key::Up | Key::Left => self.step(false, modifiers),
            Key::Down | Key::Right => self.step(true, modifiers),
            Key::Space => {
                if !modifiers.ctrl_or_meta() {
                    self.toggle_focused();
                }
                EventResult::Consumed
            }
            Key::Char('a') | Key::Char('A') if modifiers.ctrl_or_meta() && !modifiers.alt => {
                self.select_all();
                EventResult::Consumed
            }
            Key::Char(ch) if self.options().search_enabled && !ch.is_control() && !modifiers.alt => {
                self.search(ch, modifiers, now)
            }
            _ => EventResult::Ignored,
        }
    }

    /// Move focus one member forward or back.
    fn step(&self, forward: bool, modifiers: Modifiers) -> EventResult {
        let members = self.members();
        if members.is_empty() {
            return EventResult::Ignored;
        }
        let focused = self.focused();
        let current = focused.and_then(|f| members.iter().position(|&m| m == f));
        let target_index = match current {
            // Entering the widget: forward lands on the first member,
            // backward on the last
            None => {
                if forward {
                    0
                } else {
                    members.len() - 1
                }
            }
            Some(index) => {
                if forward {
                    if index + 1 < members.len() {
                        index + 1
                    } else if self.options().focus_cycling {
                        0
                    } else {
                        index
                    }
                } else if index > 0 {
                    index - 1
                } else if self.options().focus_cycling {
                    members.len() - 1
                } else {
                    index
                }
            }
        };
        let target = members[target_index];
        if Some(target) == focused {
            // Pinned at an edge without cycling
            return EventResult::Consumed;
        }
        if modifiers.ctrl_or_meta() {
            self.set_focused(Some(target));
        } else if modifiers.shift && self.options().multiselectable {
            let selection = self.selected();
            let next = if selection.is_empty() {
                match focused {
                    Some(anchor) if anchor != target => vec![anchor, target],
                    _ => vec![target],
                }
            } else if selection.contains(&target) {
                // Walking back into the selection drops the member focus
                // is leaving
                selection
                    .iter()
                    .copied()
                    .filter(|&m| Some(m) != focused)
                    .collect()
            } else {
                let mut next = selection;
                next.push(target);
                next
            };
            self.set_selected(&next);
            self.set_focused(Some(target));
        } else {
            self.set_selected(&[target]);
            self.set_focused(Some(target));
        }
        EventResult::Consumed
    }

    /// Jump focus to the first or last member.
    fn jump_edge(&self, last: bool, modifiers: Modifiers) -> EventResult {
        let members = self.members();
        let target = if last { members.last() } else { members.first() };
        let Some(&target) = target else {
            return EventResult::Ignored;
        };
        if modifiers.ctrl_or_meta() {
            self.set_focused(Some(target));
        } else if modifiers.shift && self.options().multiselectable {
            let anchor = self
                .focused()
                .or_else(|| self.selected().first().copied())
                .unwrap_or(target);
            let next = range_between(&members, anchor, target);
            self.set_selected(&next);
            self.set_focused(Some(target));
        } else {
            self.set_selected(&[target]);
            self.set_focused(Some(target));
        }
        EventResult::Consumed
    }

    fn toggle_focused(&self) {
        let Some(focused) = self.focused() else {
            return;
        };
        let selection = self.selected();
        let next: Vec<NodeId> = if selection.contains(&focused) {
            selection.iter().copied().filter(|&m| m != focused).collect()
        } else if self.options().multiselectable {
            let mut next = selection;
            next.push(focused);
            next
        } else {
            vec![focused]
        };
        self.set_selected(&next);
    }

    // -------------------------------------------------------------------------
    // Type-ahead
    // -------------------------------------------------------------------------

    fn search(&self, ch: char, modifiers: Modifiers, now: Instant) -> EventResult {
        let Some(needle) = self.with_search(|buffer| buffer.push(ch, now).to_string()) else {
            return EventResult::Ignored;
        };
        let members = self.members();
        let Some(target) = self.find_label_match(&members, &needle) else {
            return EventResult::Consumed;
        };
        if modifiers.ctrl_or_meta() {
            self.set_focused(Some(target));
        } else if modifiers.shift && self.options().multiselectable {
            let anchor = self
                .focused()
                .or_else(|| self.selected().first().copied())
                .unwrap_or(target);
            let next = range_between(&members, anchor, target);
            self.set_selected(&next);
            self.set_focused(Some(target));
        } else {
            self.set_selected(&[target]);
            self.set_focused(Some(target));
        }
        EventResult::Consumed
    }

    /// Next member after the focused one (wrapping, excluding it) whose
    /// label starts with `needle`, case-insensitive.
    fn find_label_match(&self, members: &[NodeId], needle: &str) -> Option<NodeId> {
        if members.is_empty() || needle.is_empty() {
            return None;
        }
        let current = self
            .focused()
            .and_then(|f| members.iter().position(|&m| m == f));
        let begin = current.map(|index| index + 1).unwrap_or(0);
        for offset in 0..members.len() {
            let index = (begin + offset) % members.len();
            if Some(index) == current {
                continue;
            }
            let member = members[index];
            let Some(label) = self.tree().label(member) else {
                continue;
            };
            if label.to_lowercase().starts_with(needle) {
                return Some(member);
            }
        }
        None
    }
}

/// Inclusive run of members from `anchor` to `target`, anchor end first.
fn range_between(members: &[NodeId], anchor: NodeId, target: NodeId) -> Vec<NodeId> {
    let Some(anchor_index) = members.iter().position(|&m| m == anchor) else {
        return vec![target];
    };
    let Some(target_index) = members.iter().position(|&m| m == target) else {
        return Vec::new();
    };
    if anchor_index <= target_index {
        members[anchor_index..=target_index].to_vec()
    } else {
        let mut range = members[target_index..=anchor_index].to_vec();
        range.reverse();
        range
    }
}
