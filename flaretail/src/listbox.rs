//! List box widget.
//!
//! A thin shell over [`Composite`]: members are the `option` children of a
//! `listbox` container, selection lives in `aria-selected`, and type-ahead
//! search is on by default. Multi-selection is the host's call.

use ariadom::{NodeId, NodeTree, Role};

use crate::composite::{Composite, CompositeOptions};
use crate::error::WidgetError;
use crate::event::{EventQueue, EventResult};
use crate::input::{KeyCombo, Modifiers, PointerButton};
use crate::traits::{AsComposite, WidgetEvents};

#[derive(Debug, Clone)]
pub struct ListBox {
    composite: Composite,
}

impl ListBox {
    /// Bind to an existing `listbox` container.
    pub fn bind(
        tree: &NodeTree,
        container: NodeId,
        multiselectable: bool,
        queue: &EventQueue,
    ) -> Result<Self, WidgetError> {
        let role = tree.role(container).ok_or(WidgetError::MissingContainer)?;
        if role != Role::ListBox {
            return Err(WidgetError::RoleMismatch {
                expected: Role::ListBox,
                found: role,
            });
        }
        let options = CompositeOptions::new(vec![Role::Option])
            .multiselectable(multiselectable)
            .search_enabled(true);
        let composite = Composite::bind(tree, container, options, queue)?;
        Ok(Self { composite })
    }

    pub fn container(&self) -> NodeId {
        self.composite.container()
    }
}

impl AsComposite for ListBox {
    fn composite(&self) -> &Composite {
        &self.composite
    }
}

impl WidgetEvents for ListBox {
    fn on_key(&self, combo: KeyCombo) -> EventResult {
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
        let Some(option) = self.composite.member_at_point(x, y) else {
            return EventResult::Ignored;
        };
        self.composite.select_with_pointer(option, modifiers);
        EventResult::Consumed
    }
}
