//! Grid structure and data operations.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use ariadom::{Node, NodeId, NodeTree, Rect, Role};

use crate::composite::{Composite, CompositeOptions};
use crate::error::WidgetError;
use crate::event::{EventQueue, WidgetEvent};
use crate::scrollbar::ScrollBar;
use crate::traits::{AsComposite, Sortable};

use super::column::{CellValue, ColumnKind, GridColumn, GridOptions, GridRow, SortCondition, SortOrder};
use super::events::ReorderDrag;
use super::sort;

/// One mounted data row
#[derive(Debug)]
pub(super) struct RowEntry {
    pub(super) node: NodeId,
    /// Cell nodes, aligned with the column list
    pub(super) cells: Vec<NodeId>,
    /// Cell values, aligned with the column list
    pub(super) values: Vec<Option<CellValue>>,
    /// Key-column value identifying the row
    pub(super) key: Option<String>,
}

#[derive(Debug)]
pub(super) struct GridInner {
    pub(super) columns: Vec<GridColumn>,
    /// Col sizing nodes under the colgroup, aligned with `columns`
    pub(super) col_nodes: Vec<NodeId>,
    /// Header cell nodes, aligned with `columns`
    pub(super) header_cells: Vec<NodeId>,
    /// Data rows in document order
    pub(super) rows: Vec<RowEntry>,
    pub(super) sort_condition: Option<SortCondition>,
    /// Normalized string cache for the string comparator
    pub(super) normalized: HashMap<String, String>,
    /// Active column reorder session
    pub(super) reorder: Option<ReorderDrag>,
    pub(super) scrollbar: Option<ScrollBar>,
}

/// Data grid: a selection engine over data rows plus column structure.
///
/// `build` mounts the whole subtree: grid container, a presentation
/// colgroup with one col node per column, a header row group, and a body
/// row group holding the data rows. Rows are the selectable members;
/// columns sort, hide and reorder.
#[derive(Debug)]
pub struct Grid {
    composite: Composite,
    header_row: NodeId,
    colgroup: NodeId,
    body: NodeId,
    options: GridOptions,
    inner: Arc<RwLock<GridInner>>,
}

impl Clone for Grid {
    fn clone(&self) -> Self {
        Self {
            composite: self.composite.clone(),
            header_row: self.header_row,
            colgroup: self.colgroup,
            body: self.body,
            options: self.options,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl AsComposite for Grid {
    fn composite(&self) -> &Composite {
        &self.composite
    }
}

impl Grid {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Mount a grid under `parent` (or as a root) and bind its engine.
    pub fn build(
        tree: &NodeTree,
        parent: Option<NodeId>,
        columns: Vec<GridColumn>,
        rows: Vec<GridRow>,
        options: GridOptions,
        queue: &EventQueue,
    ) -> Result<Self, WidgetError> {
        if options.cell_selection {
            return Err(WidgetError::Unsupported("cell selection"));
        }
        let container = tree.insert(Node::new(Role::Grid), parent);

        let colgroup = tree.insert(Node::new(Role::Presentation), Some(container));
        let col_nodes: Vec<NodeId> = columns
            .iter()
            .map(|column| {
                tree.insert(
                    Node::new(Role::Presentation).hidden(column.hidden),
                    Some(colgroup),
                )
            })
            .collect();

        let header_group = tree.insert(Node::new(Role::RowGroup), Some(container));
        let header_row = tree.insert(Node::new(Role::Row), Some(header_group));
        let header_cells: Vec<NodeId> = columns
            .iter()
            .map(|column| {
                tree.insert(
                    Node::new(Role::ColumnHeader)
                        .id(column.id.clone())
                        .label(column.label.clone())
                        .hidden(column.hidden),
                    Some(header_row),
                )
            })
            .collect();

        let body = tree.insert(Node::new(Role::RowGroup), Some(container));
        let key_index = columns.iter().position(|column| column.key);
        let row_entries: Vec<RowEntry> = rows
            .iter()
            .map(|record| build_row(tree, body, &columns, key_index, record))
            .collect();

        seed_header_rects(tree, &columns, &header_cells);

        let composite_options =
            CompositeOptions::new(vec![Role::Row]).multiselectable(options.multiselectable);
        let composite = Composite::bind_scoped(tree, container, body, composite_options, queue)?;

        Ok(Self {
            composite,
            header_row,
            colgroup,
            body,
            options,
            inner: Arc::new(RwLock::new(GridInner {
                columns,
                col_nodes,
                header_cells,
                rows: row_entries,
                sort_condition: None,
                normalized: HashMap::new(),
                reorder: None,
                scrollbar: None,
            })),
        })
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn container(&self) -> NodeId {
        self.composite.container()
    }

    pub fn header_row(&self) -> NodeId {
        self.header_row
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn columns(&self) -> Vec<GridColumn> {
        self.inner
            .read()
            .map(|inner| inner.columns.clone())
            .unwrap_or_default()
    }

    /// Row keys in current document order
    pub fn row_ids(&self) -> Vec<String> {
        self.inner
            .read()
            .map(|inner| inner.rows.iter().filter_map(|row| row.key.clone()).collect())
            .unwrap_or_default()
    }

    pub fn row_node(&self, row_id: &str) -> Option<NodeId> {
        self.inner.read().ok().and_then(|inner| {
            inner
                .rows
                .iter()
                .find(|row| row.key.as_deref() == Some(row_id))
                .map(|row| row.node)
        })
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Sort rows by a column.
    ///
    /// Re-sorting the current column without an explicit order flips it;
    /// a new column starts ascending. Rewrites the body child order and
    /// the headers' sort attributes, then emits `Sorted`.
    pub fn sort_column(&self, key: &str, explicit: Option<SortOrder>) -> bool {
        if !self.options.sortable {
            return false;
        }
        let sorted = {
            let Ok(mut inner) = self.inner.write() else {
                return false;
            };
            let Some(column_index) = inner.columns.iter().position(|c| c.id == key) else {
                return false;
            };
            let kind = inner.columns[column_index].kind;
            let order = match (&inner.sort_condition, explicit) {
                (_, Some(order)) => order,
                (Some(current), None) if current.key == key => current.order.flipped(),
                _ => SortOrder::Ascending,
            };
            {
                let GridInner {
                    rows, normalized, ..
                } = &mut *inner;
                if kind == ColumnKind::String {
                    sort::prime_cache(
                        rows.iter()
                            .filter_map(|row| row.values[column_index].as_ref()),
                        normalized,
                    );
                }
                let cache = &*normalized;
                // Deliberately unstable: equal keys may trade places, as
                // the reference behavior does
                rows.sort_unstable_by(|a, b| {
                    let ordering = sort::compare_cells(
                        kind,
                        a.values[column_index].as_ref(),
                        b.values[column_index].as_ref(),
                        cache,
                    );
                    match order {
                        SortOrder::Ascending => ordering,
                        SortOrder::Descending => ordering.reverse(),
                    }
                });
            }
            let condition = SortCondition {
                key: key.to_string(),
                order,
            };
            inner.sort_condition = Some(condition.clone());
            let ordered: Vec<NodeId> = inner.rows.iter().map(|row| row.node).collect();
            (condition, ordered, inner.header_cells.clone(), column_index)
        };
        let (condition, ordered, header_cells, column_index) = sorted;
        let tree = self.composite.tree();
        tree.set_children(self.body, &ordered);
        for (index, cell) in header_cells.iter().enumerate() {
            let sort = (index == column_index).then_some(condition.order);
            tree.set_sort(*cell, sort);
        }
        self.composite.refresh_members();
        log::debug!("[grid] sorted by {} {:?}", condition.key, condition.order);
        self.emit(WidgetEvent::Sorted {
            source: self.composite.id(),
            condition,
        });
        true
    }

    // -------------------------------------------------------------------------
    // Columns
    // -------------------------------------------------------------------------

    /// Toggle a column's visibility across header, body cells and the col
    /// node. Emits `ColumnModified`.
    pub fn set_column_hidden(&self, column_id: &str, hidden: bool) -> bool {
        let toggled = {
            let Ok(mut inner) = self.inner.write() else {
                return false;
            };
            let Some(index) = inner.columns.iter().position(|c| c.id == column_id) else {
                return false;
            };
            if inner.columns[index].hidden == hidden {
                return true;
            }
            inner.columns[index].hidden = hidden;
            let cells: Vec<NodeId> = inner.rows.iter().map(|row| row.cells[index]).collect();
            (
                inner.header_cells[index],
                inner.col_nodes[index],
                cells,
                inner.columns.clone(),
            )
        };
        let (header_cell, col_node, cells, columns) = toggled;
        let tree = self.composite.tree();
        tree.set_hidden(header_cell, hidden);
        tree.set_hidden(col_node, hidden);
        for cell in cells {
            tree.set_hidden(cell, hidden);
        }
        self.emit(WidgetEvent::ColumnModified {
            source: self.composite.id(),
            columns,
        });
        true
    }

    /// Physically relocate a column across the header row, the colgroup
    /// and every data row. Emits `ColumnModified`.
    pub(super) fn move_column(&self, from: usize, to: usize) {
        if from == to {
            return;
        }
        let moved = {
            let Ok(mut inner) = self.inner.write() else {
                return;
            };
            if from >= inner.columns.len() || to >= inner.columns.len() {
                return;
            }
            let column = inner.columns.remove(from);
            inner.columns.insert(to, column);
            let col_node = inner.col_nodes.remove(from);
            inner.col_nodes.insert(to, col_node);
            let header_cell = inner.header_cells.remove(from);
            inner.header_cells.insert(to, header_cell);
            for row in &mut inner.rows {
                let cell = row.cells.remove(from);
                row.cells.insert(to, cell);
                let value = row.values.remove(from);
                row.values.insert(to, value);
            }
            let nodes: Vec<NodeId> = inner.rows.iter().map(|row| row.node).collect();
            (nodes, inner.columns.clone())
        };
        let (row_nodes, columns) = moved;
        let tree = self.composite.tree();
        tree.move_child(self.header_row, from, to);
        tree.move_child(self.colgroup, from, to);
        for node in row_nodes {
            tree.move_child(node, from, to);
        }
        log::debug!("[grid] column moved {from} -> {to}");
        self.emit(WidgetEvent::ColumnModified {
            source: self.composite.id(),
            columns,
        });
    }

    // -------------------------------------------------------------------------
    // Rows
    // -------------------------------------------------------------------------

    /// Hide every row whose key is not in `allowed_ids`, dropping hidden
    /// rows from the selection. Emits `Filtered`.
    pub fn filter_rows(&self, allowed_ids: &[&str]) {
        let rows: Vec<(NodeId, bool)> = {
            let Ok(inner) = self.inner.read() else {
                return;
            };
            inner
                .rows
                .iter()
                .map(|row| {
                    let keep = row
                        .key
                        .as_deref()
                        .map(|key| allowed_ids.contains(&key))
                        .unwrap_or(false);
                    (row.node, !keep)
                })
                .collect()
        };
        let tree = self.composite.tree();
        for (node, hide) in rows {
            tree.set_hidden(node, hide);
            if hide {
                tree.set_selected(node, false);
            }
        }
        self.composite.refresh_members();
        self.emit(WidgetEvent::Filtered {
            source: self.composite.id(),
        });
    }

    /// Append a data row. The row keeps its insertion position even when
    /// a sort condition is applied; re-sort explicitly to file it.
    pub fn insert_row(&self, record: GridRow) {
        let columns = self.columns();
        let key_index = columns.iter().position(|column| column.key);
        let entry = build_row(self.composite.tree(), self.body, &columns, key_index, &record);
        if let Ok(mut inner) = self.inner.write() {
            inner.rows.push(entry);
        }
        self.composite.refresh_members();
        self.emit(WidgetEvent::Rebuilt {
            source: self.composite.id(),
        });
    }

    /// Remove the row keyed `row_id` from the tree and the member list.
    pub fn remove_row(&self, row_id: &str) -> bool {
        let node = {
            let Ok(mut inner) = self.inner.write() else {
                return false;
            };
            let Some(index) = inner
                .rows
                .iter()
                .position(|row| row.key.as_deref() == Some(row_id))
            else {
                return false;
            };
            inner.rows.remove(index).node
        };
        self.composite.tree().remove(node);
        self.composite.refresh_members();
        self.emit(WidgetEvent::Rebuilt {
            source: self.composite.id(),
        });
        true
    }

    /// Scroll the bound host so the row is inside the viewport. Without a
    /// scrollbar or laid-out rects this quietly does nothing.
    pub fn ensure_row_visibility(&self, row_id: &str) {
        let Some(scrollbar) = self.scrollbar() else {
            return;
        };
        let Some(row) = self.row_node(row_id) else {
            return;
        };
        let tree = self.composite.tree();
        let Some(row_rect) = tree.rect(row) else {
            return;
        };
        let Some(host_rect) = tree.rect(scrollbar.host()) else {
            return;
        };
        let Some(content) = scrollbar.content() else {
            return;
        };
        let Some(content_rect) = tree.rect(content) else {
            return;
        };
        let offset = scrollbar.offset();
        let viewport = host_rect.height;
        let row_top = row_rect.y.saturating_sub(content_rect.y);
        let row_bottom = row_top.saturating_add(row_rect.height);
        if row_top < offset {
            scrollbar.set_offset(row_top);
        } else if row_bottom > offset.saturating_add(viewport) {
            scrollbar.set_offset(row_bottom.saturating_sub(viewport));
        }
    }

    // -------------------------------------------------------------------------
    // Scrollbar
    // -------------------------------------------------------------------------

    pub fn bind_scrollbar(&self, scrollbar: ScrollBar) {
        if let Ok(mut inner) = self.inner.write() {
            inner.scrollbar = Some(scrollbar);
        }
    }

    pub fn scrollbar(&self) -> Option<ScrollBar> {
        self.inner
            .read()
            .ok()
            .and_then(|inner| inner.scrollbar.clone())
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    pub(super) fn emit(&self, event: WidgetEvent) {
        self.composite.queue().push(event);
    }

    /// Visible header cell index containing the point, if any
    pub(super) fn header_hit(&self, x: u16, y: u16) -> Option<usize> {
        let Ok(inner) = self.inner.read() else {
            return None;
        };
        let tree = self.composite.tree();
        for (index, &cell) in inner.header_cells.iter().enumerate() {
            if inner.columns[index].hidden {
                continue;
            }
            if tree.rect(cell).map(|rect| rect.contains(x, y)).unwrap_or(false) {
                return Some(index);
            }
        }
        None
    }

    /// (left, width) per column in current order; hidden columns take
    /// zero width at the running cursor
    pub(super) fn column_layout(&self) -> Vec<(u16, u16)> {
        let Ok(inner) = self.inner.read() else {
            return Vec::new();
        };
        let tree = self.composite.tree();
        let mut layout = Vec::with_capacity(inner.header_cells.len());
        let mut cursor = 0u16;
        for (index, &cell) in inner.header_cells.iter().enumerate() {
            match tree.rect(cell).filter(|_| !inner.columns[index].hidden) {
                Some(rect) => {
                    layout.push((rect.x, rect.width));
                    cursor = rect.right();
                }
                None => layout.push((cursor, 0)),
            }
        }
        layout
    }

    pub(super) fn header_cell(&self, index: usize) -> Option<NodeId> {
        self.inner
            .read()
            .ok()
            .and_then(|inner| inner.header_cells.get(index).copied())
    }

    pub(super) fn column_id(&self, index: usize) -> Option<String> {
        self.inner
            .read()
            .ok()
            .and_then(|inner| inner.columns.get(index).map(|column| column.id.clone()))
    }

    pub(super) fn reorder(&self) -> Option<ReorderDrag> {
        self.inner.read().ok().and_then(|inner| inner.reorder.clone())
    }

    pub(super) fn set_reorder(&self, reorder: Option<ReorderDrag>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.reorder = reorder;
        }
    }
}

impl Sortable for Grid {
    fn sort(&self, condition: SortCondition) -> bool {
        self.sort_column(&condition.key, Some(condition.order))
    }

    fn sort_condition(&self) -> Option<SortCondition> {
        self.inner
            .read()
            .ok()
            .and_then(|inner| inner.sort_condition.clone())
    }
}

fn build_row(
    tree: &NodeTree,
    body: NodeId,
    columns: &[GridColumn],
    key_index: Option<usize>,
    record: &GridRow,
) -> RowEntry {
    let key = key_index
        .and_then(|index| record.get(&columns[index].id))
        .map(|value| value.to_string());
    let mut row = Node::new(Role::Row);
    if let Some(key) = &key {
        row = row.id(key.clone());
    }
    let node = tree.insert(row, Some(body));
    let mut cells = Vec::with_capacity(columns.len());
    let mut values = Vec::with_capacity(columns.len());
    for column in columns {
        let value = record.get(&column.id).cloned();
        let label = value
            .as_ref()
            .map(|value| value.to_string())
            .unwrap_or_default();
        let cell = tree.insert(
            Node::new(Role::GridCell).label(label).hidden(column.hidden),
            Some(node),
        );
        cells.push(cell);
        values.push(value);
    }
    RowEntry {
        node,
        cells,
        values,
        key,
    }
}

/// Give header cells plausible rects from label widths when the host has
/// not laid them out, so reorder geometry works before a layout pass.
fn seed_header_rects(tree: &NodeTree, columns: &[GridColumn], header_cells: &[NodeId]) {
    if header_cells.iter().any(|&cell| tree.rect(cell).is_some()) {
        return;
    }
    let mut x = 0u16;
    for (column, &cell) in columns.iter().zip(header_cells) {
        if column.hidden {
            continue;
        }
        let width = tree
            .get(cell)
            .map(|node| node.label_width())
            .unwrap_or(0)
            .saturating_add(2);
        tree.set_rect(cell, Rect::new(x, 0, width, 1));
        x = x.saturating_add(width);
    }
}
