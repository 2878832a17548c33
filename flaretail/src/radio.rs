//! Radio group widget.
//!
//! Single-select [`Composite`] over the `radio` children of a `radiogroup`
//! container. The checked state is mirrored to `aria-checked` rather than
//! `aria-selected`, and focus wraps at the edges so arrow keys cycle.

use ariadom::{NodeId, NodeTree, Role};

use crate::composite::{Composite, CompositeOptions, SelectedAttr};
use crate::error::WidgetError;
use crate::event::{EventQueue, EventResult};
use crate::input::{KeyCombo, Modifiers, PointerButton};
use crate::traits::{AsComposite, WidgetEvents};

#[derive(Debug, Clone)]
pub struct RadioGroup {
    composite: Composite,
}

impl RadioGroup {
    /// Bind to an existing `radiogroup` container.
    pub fn bind(
        tree: &NodeTree,
        container: NodeId,
        queue: &EventQueue,
    ) -> Result<Self, WidgetError> {
        let role = tree.role(container).ok_or(WidgetError::MissingContainer)?;
        if role != Role::RadioGroup {
            return Err(WidgetError::RoleMismatch {
                expected: Role::RadioGroup,
                found: role,
            });
        }
        let options = CompositeOptions::new(vec![Role::Radio])
            .selected_attr(SelectedAttr::Checked)
            .focus_cycling(true);
        let composite = Composite::bind(tree, container, options, queue)?;
        Ok(Self { composite })
    }

    pub fn container(&self) -> NodeId {
        self.composite.container()
    }

    /// The checked radio, if any.
    pub fn checked(&self) -> Option<NodeId> {
        self.composite.selected().first().copied()
    }

    /// The DOM id of the checked radio.
    pub fn value(&self) -> Option<String> {
        self.checked()
            .and_then(|radio| self.composite.tree().id(radio))
    }
}

impl AsComposite for RadioGroup {
    fn composite(&self) -> &Composite {
        &self.composite
    }
}

impl WidgetEvents for RadioGroup {
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
        let Some(radio) = self.composite.member_at_point(x, y) else {
            return EventResult::Ignored;
        };
        self.composite.select_with_pointer(radio, modifiers);
        EventResult::Consumed
    }
}
