//! Selection engine configuration.

use ariadom::Role;

/// Which attribute records membership in the selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectedAttr {
    /// `aria-selected` (listbox options, rows, tabs, tree items)
    #[default]
    Selected,
    /// `aria-checked` (radios, checkable menu items)
    Checked,
}

/// Main navigation axis of the widget
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Behavior switches for a [`Composite`](super::Composite).
///
/// Immutable once the composite is bound; widgets pick their defaults and
/// expose the knobs that make sense for them.
#[derive(Debug, Clone)]
pub struct CompositeOptions {
    /// Allow more than one selected member
    pub multiselectable: bool,
    /// Roles counted as members when scanning the container
    pub item_roles: Vec<Role>,
    /// Attribute that records selection state
    pub selected_attr: SelectedAttr,
    /// Wrap focus from last to first member and back
    pub focus_cycling: bool,
    /// Enable type-ahead search over member labels
    pub search_enabled: bool,
    pub orientation: Orientation,
}

impl Default for CompositeOptions {
    fn default() -> Self {
        Self {
            multiselectable: false,
            item_roles: Vec::new(),
            selected_attr: SelectedAttr::Selected,
            focus_cycling: false,
            search_enabled: false,
            orientation: Orientation::Vertical,
        }
    }
}

impl CompositeOptions {
    pub fn new(item_roles: Vec<Role>) -> Self {
        Self {
            item_roles,
            ..Default::default()
        }
    }

    pub fn multiselectable(mut self, multiselectable: bool) -> Self {
        self.multiselectable = multiselectable;
        self
    }

    pub fn selected_attr(mut self, attr: SelectedAttr) -> Self {
        self.selected_attr = attr;
        self
    }

    pub fn focus_cycling(mut self, cycling: bool) -> Self {
        self.focus_cycling = cycling;
        self
    }

    pub fn search_enabled(mut self, search: bool) -> Self {
        self.search_enabled = search;
        self
    }

    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }
}
