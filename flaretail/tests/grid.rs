use ariadom::{Node, NodeTree, Rect, Role, SortOrder};
use flaretail::{
    CellValue, ColumnKind, EventQueue, EventResult, Focusable, Grid, GridColumn, GridOptions,
    GridRow, Key, KeyCombo, Modifiers, PointerButton, ScrollBar, ScrollBarOptions, Selectable,
    SortCondition, Sortable, WidgetError, WidgetEvent, WidgetEvents,
};

fn sample_columns() -> Vec<GridColumn> {
    vec![
        GridColumn::new("id", "ID").kind(ColumnKind::Integer).key(true),
        GridColumn::new("summary", "Summary"),
        GridColumn::new("votes", "Votes").kind(ColumnKind::Integer),
    ]
}

fn sample_rows() -> Vec<GridRow> {
    vec![
        GridRow::new()
            .cell("id", 1_i64)
            .cell("summary", "Crash on startup")
            .cell("votes", 9_i64),
        GridRow::new()
            .cell("id", 2_i64)
            .cell("summary", "[meta] Tracking")
            .cell("votes", 2_i64),
        GridRow::new()
            .cell("id", 3_i64)
            .cell("summary", "Button misaligned")
            .cell("votes", 5_i64),
    ]
}

fn sample_grid(options: GridOptions) -> (NodeTree, EventQueue, Grid) {
    let tree = NodeTree::new();
    let queue = EventQueue::new();
    let grid = Grid::build(&tree, None, sample_columns(), sample_rows(), options, &queue).unwrap();
    (tree, queue, grid)
}

fn lay_out_rows(tree: &NodeTree, grid: &Grid) {
    for (index, id) in grid.row_ids().iter().enumerate() {
        let row = grid.row_node(id).unwrap();
        tree.set_rect(row, Rect::new(0, 1 + index as u16, 20, 1));
    }
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_build_mounts_structure() {
    let (tree, _queue, grid) = sample_grid(GridOptions::default());
    assert_eq!(tree.role(grid.container()), Some(Role::Grid));

    let sections = tree.children(grid.container());
    assert_eq!(sections.len(), 3);
    let colgroup = sections[0];
    assert_eq!(tree.role(colgroup), Some(Role::Presentation));
    assert_eq!(tree.children(colgroup).len(), 3);
    assert_eq!(tree.role(sections[1]), Some(Role::RowGroup));
    assert_eq!(sections[2], grid.body());

    let headers = tree.children(grid.header_row());
    assert_eq!(headers.len(), 3);
    assert_eq!(tree.role(headers[0]), Some(Role::ColumnHeader));
    assert_eq!(tree.id(headers[0]).as_deref(), Some("id"));
    assert_eq!(tree.label(headers[1]).as_deref(), Some("Summary"));

    let rows = tree.children(grid.body());
    assert_eq!(rows.len(), 3);
    assert_eq!(tree.id(rows[0]).as_deref(), Some("1"));
    let cells = tree.children(rows[0]);
    assert_eq!(cells.len(), 3);
    assert_eq!(tree.role(cells[0]), Some(Role::GridCell));
    assert_eq!(tree.label(cells[1]).as_deref(), Some("Crash on startup"));

    assert_eq!(grid.row_ids(), vec!["1", "2", "3"]);
    assert_eq!(grid.members(), rows);
}

#[test]
fn test_build_rejects_cell_selection() {
    let tree = NodeTree::new();
    let queue = EventQueue::new();
    let options = GridOptions {
        cell_selection: true,
        ..GridOptions::default()
    };
    let result = Grid::build(&tree, None, sample_columns(), vec![], options, &queue);
    assert!(matches!(result, Err(WidgetError::Unsupported(_))));
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn test_sort_toggles_between_orders() {
    let (tree, queue, grid) = sample_grid(GridOptions::default());
    assert!(grid.sort_column("votes", None));
    assert_eq!(grid.row_ids(), vec!["2", "3", "1"]);
    assert_eq!(
        grid.sort_condition(),
        Some(SortCondition {
            key: "votes".into(),
            order: SortOrder::Ascending,
        })
    );

    // Same column again flips the order
    assert!(grid.sort_column("votes", None));
    assert_eq!(grid.row_ids(), vec!["1", "3", "2"]);

    // The body child order follows the model
    let body_ids: Vec<_> = tree
        .children(grid.body())
        .into_iter()
        .filter_map(|row| tree.id(row))
        .collect();
    assert_eq!(body_ids, vec!["1", "3", "2"]);

    let sorted = queue
        .drain()
        .into_iter()
        .filter(|event| matches!(event, WidgetEvent::Sorted { .. }))
        .count();
    assert_eq!(sorted, 2);
}

#[test]
fn test_sort_marks_the_header() {
    let (tree, _queue, grid) = sample_grid(GridOptions::default());
    grid.sort_column("votes", None);
    let headers = tree.children(grid.header_row());
    assert_eq!(tree.sort(headers[2]), Some(SortOrder::Ascending));
    assert_eq!(tree.sort(headers[0]), None);

    // Sorting another column clears the old marker
    grid.sort_column("id", None);
    assert_eq!(tree.sort(headers[2]), None);
    assert_eq!(tree.sort(headers[0]), Some(SortOrder::Ascending));
}

#[test]
fn test_sort_string_column_ignores_bracket_punctuation() {
    let (_tree, _queue, grid) = sample_grid(GridOptions::default());
    grid.sort_column("summary", None);
    // "[meta] Tracking" normalizes to "meta tracking", filing after
    // "crash on startup"
    assert_eq!(grid.row_ids(), vec!["3", "1", "2"]);
}

#[test]
fn test_sortable_trait_applies_explicit_order() {
    let (_tree, _queue, grid) = sample_grid(GridOptions::default());
    assert!(grid.sort(SortCondition {
        key: "id".into(),
        order: SortOrder::Descending,
    }));
    assert_eq!(grid.row_ids(), vec!["3", "2", "1"]);
}

#[test]
fn test_sort_survives_selection() {
    let (_tree, queue, grid) = sample_grid(GridOptions::default());
    let row = grid.row_node("2").unwrap();
    grid.set_selected(&[row]);
    queue.drain();

    grid.sort_column("votes", None);
    assert!(grid.is_selected(row));
    // Only the sort itself was announced
    assert!(queue
        .drain()
        .iter()
        .all(|event| matches!(event, WidgetEvent::Sorted { .. })));
}

#[test]
fn test_unsortable_grid_refuses() {
    let options = GridOptions {
        sortable: false,
        ..GridOptions::default()
    };
    let (_tree, queue, grid) = sample_grid(options);
    assert!(!grid.sort_column("votes", None));
    assert_eq!(grid.row_ids(), vec!["1", "2", "3"]);
    assert!(queue.is_empty());
}

// ============================================================================
// Column operations
// ============================================================================

#[test]
fn test_header_drag_reorders_adjacent_columns() {
    let (tree, queue, grid) = sample_grid(GridOptions::default());
    // Seeded header rects: ID 0..4, Summary 4..13, Votes 13..20
    assert_eq!(grid.on_press(1, 0, PointerButton::Left, Modifiers::NONE), EventResult::StartDrag);
    let headers_before = tree.children(grid.header_row());
    assert_eq!(tree.grabbed(headers_before[0]), Some(true));

    // Carry the ID header right past Summary's midpoint
    assert_eq!(grid.on_drag(7, 0), EventResult::Consumed);
    assert_eq!(grid.on_release(), EventResult::Consumed);
    assert_eq!(tree.grabbed(headers_before[0]), Some(false));

    let column_ids: Vec<_> = grid.columns().into_iter().map(|c| c.id).collect();
    assert_eq!(column_ids, vec!["summary", "id", "votes"]);

    // Header row, colgroup and every data row moved the same way
    let headers = tree.children(grid.header_row());
    assert_eq!(tree.id(headers[0]).as_deref(), Some("summary"));
    assert_eq!(tree.id(headers[1]).as_deref(), Some("id"));
    let colgroup = tree.children(grid.container())[0];
    assert_eq!(tree.children(colgroup).len(), 3);
    for id in grid.row_ids() {
        let row = grid.row_node(&id).unwrap();
        let cells = tree.children(row);
        assert_eq!(cells.len(), 3);
        assert_eq!(tree.label(cells[1]).as_deref(), Some(id.as_str()));
    }

    let modified = queue
        .drain()
        .into_iter()
        .filter(|event| matches!(event, WidgetEvent::ColumnModified { .. }))
        .count();
    assert_eq!(modified, 1);
}

#[test]
fn test_header_click_below_threshold_sorts() {
    let (_tree, queue, grid) = sample_grid(GridOptions::default());
    assert_eq!(grid.on_press(1, 0, PointerButton::Left, Modifiers::NONE), EventResult::StartDrag);
    // One cell of travel stays a click
    grid.on_drag(2, 0);
    grid.on_release();
    assert_eq!(grid.row_ids(), vec!["1", "2", "3"]);
    assert!(matches!(queue.next(), Some(WidgetEvent::Sorted { .. })));

    grid.on_press(1, 0, PointerButton::Left, Modifiers::NONE);
    grid.on_release();
    assert_eq!(grid.row_ids(), vec!["3", "2", "1"]);
}

#[test]
fn test_header_click_sorts_directly_when_not_reorderable() {
    let options = GridOptions {
        reorderable: false,
        ..GridOptions::default()
    };
    let (_tree, _queue, grid) = sample_grid(options);
    assert_eq!(
        grid.on_press(15, 0, PointerButton::Left, Modifiers::NONE),
        EventResult::Consumed
    );
    assert_eq!(grid.row_ids(), vec!["2", "3", "1"]);
}

#[test]
fn test_hide_column_everywhere() {
    let (tree, queue, grid) = sample_grid(GridOptions::default());
    assert!(grid.set_column_hidden("summary", true));

    let headers = tree.children(grid.header_row());
    assert!(tree.is_hidden(headers[1]));
    let colgroup = tree.children(grid.container())[0];
    assert!(tree.is_hidden(tree.children(colgroup)[1]));
    for id in grid.row_ids() {
        let row = grid.row_node(&id).unwrap();
        assert!(tree.is_hidden(tree.children(row)[1]));
    }

    // Repeating the same state is accepted without another event
    assert!(grid.set_column_hidden("summary", true));
    let modified = queue
        .drain()
        .into_iter()
        .filter(|event| matches!(event, WidgetEvent::ColumnModified { .. }))
        .count();
    assert_eq!(modified, 1);

    assert!(!grid.set_column_hidden("missing", true));
}

// ============================================================================
// Row operations
// ============================================================================

#[test]
fn test_filter_rows_prunes_selection_and_membership() {
    let (tree, queue, grid) = sample_grid(GridOptions::default());
    let row2 = grid.row_node("2").unwrap();
    grid.set_selected(&[row2]);
    queue.drain();

    grid.filter_rows(&["1", "3"]);
    assert!(tree.is_hidden(row2));
    assert!(!tree.is_selected(row2));
    assert_eq!(grid.members().len(), 2);
    assert!(grid.selected().is_empty());
    assert!(matches!(queue.next(), Some(WidgetEvent::Filtered { .. })));

    // Widening the filter brings rows back, but not their selection
    grid.filter_rows(&["1", "2", "3"]);
    assert!(!tree.is_hidden(row2));
    assert_eq!(grid.members().len(), 3);
    assert!(grid.selected().is_empty());
}

#[test]
fn test_insert_and_remove_rows() {
    let (_tree, queue, grid) = sample_grid(GridOptions::default());
    grid.insert_row(
        GridRow::new()
            .cell("id", 4_i64)
            .cell("summary", "New report")
            .cell("votes", 1_i64),
    );
    assert_eq!(grid.row_ids(), vec!["1", "2", "3", "4"]);
    assert_eq!(grid.members().len(), 4);
    assert!(matches!(queue.next(), Some(WidgetEvent::Rebuilt { .. })));

    assert!(grid.remove_row("2"));
    assert_eq!(grid.row_ids(), vec!["1", "3", "4"]);
    assert!(grid.row_node("2").is_none());
    assert!(!grid.remove_row("2"));
}

#[test]
fn test_insert_keeps_position_under_active_sort() {
    let (_tree, _queue, grid) = sample_grid(GridOptions::default());
    grid.sort_column("votes", None);
    assert_eq!(grid.row_ids(), vec!["2", "3", "1"]);
    grid.insert_row(GridRow::new().cell("id", 4_i64).cell("votes", 3_i64));
    // Appended, not filed; an explicit re-sort files it
    assert_eq!(grid.row_ids(), vec!["2", "3", "1", "4"]);
    grid.sort_column("votes", Some(SortOrder::Ascending));
    assert_eq!(grid.row_ids(), vec!["2", "4", "3", "1"]);
}

// ============================================================================
// Input
// ============================================================================

#[test]
fn test_keyboard_steps_row_selection() {
    let (_tree, _queue, grid) = sample_grid(GridOptions::default());
    grid.on_key(KeyCombo::key(Key::Down));
    let first = grid.row_node("1").unwrap();
    assert_eq!(grid.selected(), vec![first]);
    assert_eq!(grid.focused(), Some(first));
}

#[test]
fn test_row_press_selects() {
    let (tree, _queue, grid) = sample_grid(GridOptions::default());
    lay_out_rows(&tree, &grid);
    let row2 = grid.row_node("2").unwrap();
    assert_eq!(
        grid.on_press(5, 2, PointerButton::Left, Modifiers::NONE),
        EventResult::Consumed
    );
    assert_eq!(grid.selected(), vec![row2]);

    // A press outside any row falls through
    assert_eq!(
        grid.on_press(5, 9, PointerButton::Left, Modifiers::NONE),
        EventResult::Ignored
    );
}

#[test]
fn test_wheel_without_scrollbar_is_ignored() {
    let (_tree, _queue, grid) = sample_grid(GridOptions::default());
    assert_eq!(grid.on_wheel(0, 3), EventResult::Ignored);
}

// ============================================================================
// Scroll integration
// ============================================================================

#[test]
fn test_ensure_row_visibility_scrolls_the_host() {
    let tree = NodeTree::new();
    let queue = EventQueue::new();
    let host = tree.insert(Node::new(Role::Presentation), None);
    let columns = vec![GridColumn::new("id", "ID").kind(ColumnKind::Integer).key(true)];
    let rows = (1..=6)
        .map(|n| GridRow::new().cell("id", n as i64))
        .collect();
    let grid = Grid::build(&tree, Some(host), columns, rows, GridOptions::default(), &queue).unwrap();

    tree.set_rect(host, Rect::new(0, 0, 30, 3));
    tree.set_rect(grid.container(), Rect::new(0, 0, 30, 9));
    for (index, id) in grid.row_ids().iter().enumerate() {
        let row = grid.row_node(id).unwrap();
        tree.set_rect(row, Rect::new(0, 1 + index as u16, 30, 1));
    }
    let bar = tree.insert(Node::new(Role::ScrollBar), Some(host));
    tree.set_controls(bar, Some(host));
    let scrollbar = ScrollBar::bind(&tree, bar, ScrollBarOptions::default()).unwrap();
    grid.bind_scrollbar(scrollbar);

    // Row 6 sits at y 6; a 3-cell viewport must scroll to 4 to show it
    grid.ensure_row_visibility("6");
    assert_eq!(tree.scroll(host).1, 4);

    // Scrolling back up to a row above the viewport
    grid.ensure_row_visibility("1");
    assert_eq!(tree.scroll(host).1, 1);

    // Already visible rows leave the offset alone
    grid.ensure_row_visibility("2");
    assert_eq!(tree.scroll(host).1, 1);
}

// ============================================================================
// Persistence
// ============================================================================

#[test]
fn test_column_layout_survives_json() {
    let column = GridColumn::new("votes", "Votes")
        .kind(ColumnKind::Integer)
        .hidden(true);
    let json = serde_json::to_string(&column).unwrap();
    let restored: GridColumn = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, column);

    let condition = SortCondition {
        key: "votes".into(),
        order: SortOrder::Descending,
    };
    assert_eq!(
        serde_json::to_string(&condition).unwrap(),
        r#"{"key":"votes","order":"descending"}"#
    );
}

#[test]
fn test_cell_value_timestamps_not_swallowed_as_text() {
    // Untagged representation: a bare RFC 3339 string must come back as a
    // timestamp, and only genuinely plain text as a string
    let time: CellValue = serde_json::from_str(r#""2024-03-01T12:00:00Z""#).unwrap();
    assert!(matches!(time, CellValue::Time(_)));

    let text: CellValue = serde_json::from_str(r#""Crash on startup""#).unwrap();
    assert_eq!(text, CellValue::from("Crash on startup"));

    let count: CellValue = serde_json::from_str("7").unwrap();
    assert_eq!(count, CellValue::from(7_i64));
}
