//! Tab list widget.
//!
//! Single-select [`Composite`] over the `tab` children of a `tablist`
//! container. Each tab points at its `tabpanel` through `aria-controls`;
//! after every selection change the panels are synced so only the selected
//! tab's panel is visible. Tabs can be appended and closed at runtime.

use ariadom::{Node, NodeId, NodeTree, Role};

use crate::composite::{Composite, CompositeOptions, Orientation};
use crate::error::WidgetError;
use crate::event::{EventQueue, EventResult, WidgetEvent};
use crate::input::{KeyCombo, Modifiers, PointerButton};
use crate::traits::{AsComposite, WidgetEvents};

#[derive(Debug, Clone)]
pub struct TabList {
    composite: Composite,
}

impl TabList {
    /// Bind to an existing `tablist` container.
    pub fn bind(
        tree: &NodeTree,
        container: NodeId,
        queue: &EventQueue,
    ) -> Result<Self, WidgetError> {
        let role = tree.role(container).ok_or(WidgetError::MissingContainer)?;
        if role != Role::TabList {
            return Err(WidgetError::RoleMismatch {
                expected: Role::TabList,
                found: role,
            });
        }
        let options = CompositeOptions::new(vec![Role::Tab])
            .orientation(Orientation::Horizontal)
            .focus_cycling(true);
        let composite = Composite::bind(tree, container, options, queue)?;
        let widget = Self { composite };
        widget.sync_panels();
        Ok(widget)
    }

    pub fn container(&self) -> NodeId {
        self.composite.container()
    }

    /// The selected tab, if any.
    pub fn selected_tab(&self) -> Option<NodeId> {
        self.composite.selected().first().copied()
    }

    /// The panel a tab controls.
    pub fn panel_for(&self, tab: NodeId) -> Option<NodeId> {
        self.composite.tree().controls(tab)
    }

    /// Select `tab` and bring its panel forward.
    pub fn select_tab(&self, tab: NodeId) {
        self.composite.set_selected(&[tab]);
        self.composite.set_focused(Some(tab));
        self.sync_panels();
    }

    /// Hide every panel except the selected tab's.
    pub fn sync_panels(&self) {
        let tree = self.composite.tree();
        let selected = self.composite.selected();
        for tab in self.composite.members() {
            let Some(panel) = tree.controls(tab) else {
                continue;
            };
            tree.set_hidden(panel, !selected.contains(&tab));
        }
    }

    /// Append a tab controlling `panel`. The new tab is not selected.
    pub fn add_tab(&self, label: impl Into<String>, panel: NodeId) -> NodeId {
        let tree = self.composite.tree();
        let tab = tree.insert(
            Node::new(Role::Tab).label(label),
            Some(self.composite.container()),
        );
        tree.set_controls(tab, Some(panel));
        self.composite.refresh_members();
        self.sync_panels();
        self.composite
            .queue()
            .push(WidgetEvent::Rebuilt { source: self.composite.id() });
        tab
    }

    /// Remove `tab` and its panel. When the closed tab was selected, the
    /// previous tab is selected instead, or the next one for the first tab.
    pub fn close_tab(&self, tab: NodeId) -> bool {
        let members = self.composite.members();
        let Some(index) = members.iter().position(|&m| m == tab) else {
            return false;
        };
        let was_selected = self.composite.is_selected(tab);
        let fallback = if was_selected {
            if index > 0 {
                members.get(index - 1).copied()
            } else {
                members.get(1).copied()
            }
        } else {
            None
        };
        let tree = self.composite.tree();
        if let Some(panel) = tree.controls(tab) {
            tree.remove(panel);
        }
        tree.remove(tab);
        self.composite.refresh_members();
        if let Some(next) = fallback {
            self.composite.set_selected(&[next]);
            self.composite.set_focused(Some(next));
        }
        self.sync_panels();
        self.composite
            .queue()
            .push(WidgetEvent::Rebuilt { source: self.composite.id() });
        true
    }
}

impl AsComposite for TabList {
    fn composite(&self) -> &Composite {
        &self.composite
    }
}

impl WidgetEvents for TabList {
    fn on_key(&self, combo: KeyCombo) -> EventResult {
        let result = self.composite.select_with_keyboard(combo);
        if result.is_handled() {
            self.sync_panels();
        }
        result
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
        let Some(tab) = self.composite.member_at_point(x, y) else {
            return EventResult::Ignored;
        };
        self.composite.select_with_pointer(tab, modifiers);
        self.sync_panels();
        EventResult::Consumed
    }
}
