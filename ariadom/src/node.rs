use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

use crate::rect::Rect;
use crate::role::Role;
use crate::tree::NodeId;

/// Sort direction written to `aria-sort` on column headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

/// The `aria-valuenow`/`aria-valuemin`/`aria-valuemax` triple carried by
/// scrollbars and separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeValue {
    pub now: u16,
    pub min: u16,
    pub max: u16,
}

impl RangeValue {
    pub const fn new(now: u16, min: u16, max: u16) -> Self {
        Self { now, min, max }
    }
}

/// A node in the accessibility tree.
///
/// Role and state attributes are plain typed fields; mutation goes through
/// [`NodeTree`](crate::tree::NodeTree) setters so revision counters stay
/// accurate. Tree links (`parent`/`children`) are maintained by the tree
/// only.
#[derive(Debug, Clone)]
pub struct Node {
    /// Application-assigned identifier (DOM id analog).
    pub id: Option<String>,
    /// Visible label; the type-ahead haystack.
    pub label: Option<String>,
    pub role: Role,
    /// `aria-selected`.
    pub selected: bool,
    /// `aria-checked` (the radio variant of the selected attribute).
    pub checked: bool,
    /// `aria-disabled`; excludes the node from widget members.
    pub disabled: bool,
    /// `aria-hidden`; excludes the node and its subtree from members.
    pub hidden: bool,
    /// `aria-grabbed`; `None` means not draggable at all.
    pub grabbed: Option<bool>,
    /// `aria-expanded`; `None` means not expandable.
    pub expanded: Option<bool>,
    /// `aria-sort` on column headers.
    pub sort: Option<SortOrder>,
    /// Roving tabindex (0 on the focused member, -1 elsewhere).
    pub tab_index: Option<i8>,
    /// `aria-valuenow/min/max`.
    pub range: Option<RangeValue>,
    /// `aria-controls` link (tab to panel, scrollbar to host).
    pub controls: Option<NodeId>,
    /// `aria-activedescendant` mirror on containers.
    pub active_descendant: Option<NodeId>,
    /// Host-assigned layout rectangle.
    pub rect: Option<Rect>,
    /// Native scroll offset of a scrollable host, `(x, y)`.
    pub scroll: (u16, u16),
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub fn new(role: Role) -> Self {
        Self {
            id: None,
            label: None,
            role,
            selected: false,
            checked: false,
            disabled: false,
            hidden: false,
            grabbed: None,
            expanded: None,
            sort: None,
            tab_index: None,
            range: None,
            controls: None,
            active_descendant: None,
            rect: None,
            scroll: (0, 0),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = Some(expanded);
        self
    }

    pub fn rect(mut self, rect: Rect) -> Self {
        self.rect = Some(rect);
        self
    }

    /// Display-cell width of the label.
    pub fn label_width(&self) -> u16 {
        self.label
            .as_deref()
            .map(|l| UnicodeWidthStr::width(l) as u16)
            .unwrap_or(0)
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
