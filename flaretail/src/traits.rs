//! Capability traits shared across widgets.
//!
//! Every widget owns a [`Composite`] handle and exposes it through
//! [`AsComposite`]; blanket impls then provide the focus and selection
//! surface without per-widget boilerplate. Widget-specific capabilities
//! ([`Sortable`], [`Nestable`]) are implemented directly where they apply.

use ariadom::NodeId;

use crate::composite::Composite;
use crate::event::EventResult;
use crate::grid::SortCondition;
use crate::input::{KeyCombo, Modifiers, PointerButton};

/// Access to the selection engine backing a widget
pub trait AsComposite {
    fn composite(&self) -> &Composite;
}

impl AsComposite for Composite {
    fn composite(&self) -> &Composite {
        self
    }
}

/// Focus management over a composite's members
pub trait Focusable {
    /// Current members, in document order
    fn members(&self) -> Vec<NodeId>;
    /// Member holding the roving focus, if any
    fn focused(&self) -> Option<NodeId>;
    /// Move the roving focus; `None` parks it on the container
    fn set_focused(&self, member: Option<NodeId>);
    /// Re-collect members after structural edits to the node tree
    fn refresh_members(&self);
}

impl<T: AsComposite> Focusable for T {
    fn members(&self) -> Vec<NodeId> {
        self.composite().members()
    }

    fn focused(&self) -> Option<NodeId> {
        self.composite().focused()
    }

    fn set_focused(&self, member: Option<NodeId>) {
        self.composite().set_focused(member);
    }

    fn refresh_members(&self) {
        self.composite().refresh_members();
    }
}

/// Selection state over a composite's members
pub trait Selectable: Focusable {
    /// Selected members, in selection order
    fn selected(&self) -> Vec<NodeId>;
    /// Replace the selection wholesale
    fn set_selected(&self, members: &[NodeId]);
    /// Select every member; no-op on single-select widgets
    fn select_all(&self);
    fn clear_selection(&self);
    fn is_selected(&self, member: NodeId) -> bool;
}

impl<T: AsComposite> Selectable for T {
    fn selected(&self) -> Vec<NodeId> {
        self.composite().selected()
    }

    fn set_selected(&self, members: &[NodeId]) {
        self.composite().set_selected(members);
    }

    fn select_all(&self) {
        self.composite().select_all();
    }

    fn clear_selection(&self) {
        self.composite().set_selected(&[]);
    }

    fn is_selected(&self, member: NodeId) -> bool {
        self.composite().is_selected(member)
    }
}

/// Widgets whose rows can be reordered by a sort condition
pub trait Sortable {
    /// Apply a sort condition; returns false if the column refuses sorting
    fn sort(&self, condition: SortCondition) -> bool;
    /// Condition currently applied, if any
    fn sort_condition(&self) -> Option<SortCondition>;
}

/// Widgets with expandable members (tree items, submenu anchors)
pub trait Nestable {
    fn set_expanded(&self, member: NodeId, expanded: bool);
    fn is_expanded(&self, member: NodeId) -> bool;
}

/// Uniform input dispatch surface.
///
/// Hosts hit-test native input and call these on the widget under the
/// pointer (or the focused widget for keys). A handler returning
/// [`EventResult::StartDrag`] claims subsequent `on_drag`/`on_release`
/// calls until release.
pub trait WidgetEvents {
    fn on_key(&self, _combo: KeyCombo) -> EventResult {
        EventResult::Ignored
    }

    fn on_press(&self, _x: u16, _y: u16, _button: PointerButton, _modifiers: Modifiers) -> EventResult {
        EventResult::Ignored
    }

    fn on_drag(&self, _x: u16, _y: u16) -> EventResult {
        EventResult::Ignored
    }

    fn on_release(&self) -> EventResult {
        EventResult::Ignored
    }

    fn on_wheel(&self, _delta_x: i16, _delta_y: i16) -> EventResult {
        EventResult::Ignored
    }
}
