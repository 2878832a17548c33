/// ARIA roles understood by the widget engine.
///
/// Composite roles own a collection of selectable members; item roles mark
/// the members themselves. `Presentation` and `Generic` carry no widget
/// semantics and exist only as structure (colgroups, wrappers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    // Composite containers
    ListBox,
    Menu,
    MenuBar,
    RadioGroup,
    Tree,
    TabList,
    Grid,
    // Member items
    Option,
    MenuItem,
    Radio,
    TreeItem,
    Tab,
    Row,
    // Grid structure
    GridCell,
    ColumnHeader,
    RowGroup,
    // Misc structure
    Group,
    TabPanel,
    ScrollBar,
    Separator,
    Presentation,
    Generic,
}

impl Role {
    /// Roles eligible for row-snapped ("adjusted") scrolling.
    pub fn is_row_like(self) -> bool {
        matches!(self, Role::Row | Role::Option | Role::TreeItem)
    }

    /// Container roles that own selectable members.
    pub fn is_composite(self) -> bool {
        matches!(
            self,
            Role::ListBox
                | Role::Menu
                | Role::MenuBar
                | Role::RadioGroup
                | Role::Tree
                | Role::TabList
                | Role::Grid
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::ListBox => "listbox",
            Role::Menu => "menu",
            Role::MenuBar => "menubar",
            Role::RadioGroup => "radiogroup",
            Role::Tree => "tree",
            Role::TabList => "tablist",
            Role::Grid => "grid",
            Role::Option => "option",
            Role::MenuItem => "menuitem",
            Role::Radio => "radio",
            Role::TreeItem => "treeitem",
            Role::Tab => "tab",
            Role::Row => "row",
            Role::GridCell => "gridcell",
            Role::ColumnHeader => "columnheader",
            Role::RowGroup => "rowgroup",
            Role::Group => "group",
            Role::TabPanel => "tabpanel",
            Role::ScrollBar => "scrollbar",
            Role::Separator => "separator",
            Role::Presentation => "presentation",
            Role::Generic => "generic",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
