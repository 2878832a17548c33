//! FlareTail widget engine: the selection/focus/keyboard state machine shared
//! by list-like accessible widgets, plus the grid and scrollbar built on it.
//!
//! Widgets bind to an [`ariadom::NodeTree`] and read/write role and state
//! attributes on its nodes; hosts own layout (rects) and raw input, and feed
//! input through the [`WidgetEvents`] entry points. Semantic notifications
//! come back through an [`EventQueue`] drained one event per UI tick.

pub mod composite;
pub mod error;
pub mod event;
pub mod grid;
pub mod input;
pub mod listbox;
pub mod menu;
pub mod radio;
pub mod scrollbar;
pub mod splitter;
pub mod tablist;
pub mod traits;
pub mod tree;

pub use composite::{Composite, CompositeId, CompositeOptions, Orientation, SelectedAttr};
pub use error::WidgetError;
pub use event::{EventQueue, EventResult, WidgetEvent};
pub use grid::{CellValue, ColumnKind, Grid, GridColumn, GridOptions, GridRow, SortCondition};
pub use input::{Key, KeyCombo, Modifiers, PointerButton};
pub use listbox::ListBox;
pub use menu::{Menu, MenuBar};
pub use radio::RadioGroup;
pub use scrollbar::{ScrollBar, ScrollBarGeometry, ScrollBarOptions};
pub use splitter::{Splitter, SplitterOptions};
pub use tablist::TabList;
pub use traits::{AsComposite, Focusable, Nestable, Selectable, Sortable, WidgetEvents};
pub use tree::Tree;
