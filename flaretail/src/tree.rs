//! Tree view widget.
//!
//! A [`Composite`] over `treeitem` nodes. Child items live in a `group` node
//! under their parent item; collapsing an item hides the group, which removes
//! its items from the member list. Keyboard handling adds the structural
//! arrows on top of the engine: Left collapses (or climbs to the parent item)
//! and Right expands (or descends to the first child item).

use ariadom::{NodeId, NodeTree, Role};

use crate::composite::{Composite, CompositeOptions};
use crate::error::WidgetError;
use crate::event::{EventQueue, EventResult};
use crate::input::{Key, KeyCombo, Modifiers, PointerButton};
use crate::traits::{AsComposite, Nestable, WidgetEvents};

#[derive(Debug, Clone)]
pub struct Tree {
    composite: Composite,
}

impl Tree {
    /// Bind to an existing `tree` container.
    pub fn bind(
        tree: &NodeTree,
        container: NodeId,
        multiselectable: bool,
        queue: &EventQueue,
    ) -> Result<Self, WidgetError> {
        let role = tree.role(container).ok_or(WidgetError::MissingContainer)?;
        if role != Role::Tree {
            return Err(WidgetError::RoleMismatch {
                expected: Role::Tree,
                found: role,
            });
        }
        let options = CompositeOptions::new(vec![Role::TreeItem])
            .multiselectable(multiselectable)
            .search_enabled(true);
        let composite = Composite::bind(tree, container, options, queue)?;
        let widget = Self { composite };
        widget.seed_groups();
        Ok(widget)
    }

    pub fn container(&self) -> NodeId {
        self.composite.container()
    }

    /// The `group` node holding `item`'s children, if it has one.
    pub fn child_group(&self, item: NodeId) -> Option<NodeId> {
        let tree = self.composite.tree();
        tree.children(item)
            .into_iter()
            .find(|&child| tree.role(child) == Some(Role::Group))
    }

    /// The nearest ancestor item of `item`, if it is not a top-level item.
    pub fn parent_item(&self, item: NodeId) -> Option<NodeId> {
        let tree = self.composite.tree();
        tree.ancestors(item)
            .into_iter()
            .find(|&ancestor| tree.role(ancestor) == Some(Role::TreeItem))
    }

    // -------------------------------------------------------------------------
    // Expansion
    // -------------------------------------------------------------------------

    fn apply_expanded(&self, item: NodeId, expanded: bool) {
        let tree = self.composite.tree();
        let Some(group) = self.child_group(item) else {
            return;
        };
        if tree.expanded(item) == Some(expanded) {
            return;
        }
        if expanded {
            tree.set_expanded(item, true);
            tree.set_hidden(group, false);
            let focused = self.composite.focused();
            self.composite.refresh_members();
            if let Some(node) = focused {
                if self.composite.members().contains(&node) {
                    self.composite.set_focused(Some(node));
                }
            }
        } else {
            self.collapse(item, group);
        }
    }

    /// Collapse `item`, transferring any selection and focus that would be
    /// hidden with its subtree onto the item itself.
    fn collapse(&self, item: NodeId, group: NodeId) {
        let tree = self.composite.tree();
        let descendants = tree.descendants(item);
        let selected = self.composite.selected();
        let focused = self.composite.focused();
        let pruned = selected
            .iter()
            .any(|node| descendants.contains(node));

        // Rewrite the selection while the subtree is still visible so the
        // change is diffed against the pre-collapse state.
        if pruned {
            let mut next: Vec<NodeId> = selected
                .into_iter()
                .filter(|node| !descendants.contains(node))
                .collect();
            if !next.contains(&item) {
                next.push(item);
            }
            self.composite.set_selected(&next);
        }
        let next_focus = match focused {
            Some(node) if descendants.contains(&node) => Some(item),
            other => other,
        };

        tree.set_expanded(item, false);
        tree.set_hidden(group, true);
        self.composite.refresh_members();
        if let Some(node) = next_focus {
            if self.composite.members().contains(&node) {
                self.composite.set_focused(Some(node));
            }
        }
    }

    /// Write the initial expansion state: items with a child group but no
    /// `aria-expanded` are treated as expanded, and hidden flags on the
    /// groups are brought in line with the attribute.
    fn seed_groups(&self) {
        let tree = self.composite.tree();
        for item in tree.descendants(self.composite.container()) {
            if tree.role(item) != Some(Role::TreeItem) {
                continue;
            }
            let Some(group) = self.child_group(item) else {
                continue;
            };
            let expanded = tree.expanded(item).unwrap_or(true);
            tree.set_expanded(item, expanded);
            tree.set_hidden(group, !expanded);
        }
        self.composite.refresh_members();
    }

    // -------------------------------------------------------------------------
    // Keyboard
    // -------------------------------------------------------------------------

    /// Left/Right structural moves. Returns `None` when the combo is not a
    /// structural one and should fall through to the selection engine.
    fn structural_key(&self, combo: KeyCombo) -> Option<EventResult> {
        if !combo.modifiers.none() {
            return None;
        }
        let focused = self.composite.focused()?;
        match combo.key {
            Key::Right => {
                if let Some(group) = self.child_group(focused) {
                    if self.is_expanded(focused) {
                        let tree = self.composite.tree();
                        let first_child = tree
                            .children(group)
                            .into_iter()
                            .find(|&child| tree.role(child) == Some(Role::TreeItem));
                        if let Some(child) = first_child {
                            self.jump_to(child);
                        }
                    } else {
                        self.apply_expanded(focused, true);
                    }
                }
                Some(EventResult::Consumed)
            }
            Key::Left => {
                if self.child_group(focused).is_some() && self.is_expanded(focused) {
                    self.apply_expanded(focused, false);
                } else if let Some(parent) = self.parent_item(focused) {
                    self.jump_to(parent);
                }
                Some(EventResult::Consumed)
            }
            _ => None,
        }
    }

    fn jump_to(&self, item: NodeId) {
        self.composite.set_selected(&[item]);
        self.composite.set_focused(Some(item));
    }
}

impl AsComposite for Tree {
    fn composite(&self) -> &Composite {
        &self.composite
    }
}

impl Nestable for Tree {
    fn set_expanded(&self, member: NodeId, expanded: bool) {
        self.apply_expanded(member, expanded);
    }

    fn is_expanded(&self, member: NodeId) -> bool {
        self.composite.tree().expanded(member).unwrap_or(false)
    }
}

impl WidgetEvents for Tree {
    fn on_key(&self, combo: KeyCombo) -> EventResult {
        if let Some(result) = self.structural_key(combo) {
            return result;
        }
        self.composite.select_with_keyboard(combo)
    }

    fn on_press(
        &self,
        x: u16,
        y: u16,
        button: PointerButton,
        modifiers: Modifiers,
    ) -> EventResult {
        if button != PointerButton::Left {
            return EventResult::Ignored;
        }
        let Some(item) = self.composite.member_at_point(x, y) else {
            return EventResult::Ignored;
        };
        self.composite.select_with_pointer(item, modifiers);
        EventResult::Consumed
    }
}
