use std::fs::File;
use std::io::{self, Write};
use std::time::Duration;

use ariadom::{Node, NodeId, NodeTree, Rect, Role, SortOrder};
use crossterm::event::{Event as CtEvent, KeyEventKind, MouseButton, MouseEventKind};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::{cursor, event, execute, queue, terminal};
use flaretail::{
    ColumnKind, EventQueue, EventResult, Grid, GridColumn, GridOptions, GridRow, Key, KeyCombo,
    Modifiers, PointerButton, ScrollBar, ScrollBarOptions, Selectable, WidgetEvent, WidgetEvents,
};
use simplelog::{Config, LevelFilter, WriteLogger};

const REPORTS: &[(i64, &str, &str, i64)] = &[
    (101, "Crash when opening an empty attachment", "critical", 24),
    (102, "Search box drops the last character typed", "major", 7),
    (103, "[meta] Tracking bug for the 2.0 release", "normal", 3),
    (104, "Dark theme renders the toolbar unreadable", "major", 19),
    (105, "Timeline never finishes loading on slow links", "critical", 31),
    (106, "Typo in the onboarding tour", "trivial", 1),
    (107, "Duplicate notifications after reconnect", "major", 12),
    (108, "Export ignores the active column layout", "normal", 8),
    (109, "Profile avatars cached forever", "minor", 4),
    (110, "Keyboard focus lost after closing a dialog", "major", 16),
    (111, "Date columns sort as text in some locales", "normal", 11),
    (112, "[meta] Accessibility audit follow-ups", "normal", 2),
    (113, "Vote button mislabeled for screen readers", "minor", 6),
    (114, "Session expires while composing a comment", "critical", 27),
    (115, "Column widths reset on every launch", "normal", 9),
];

/// Who claimed the pointer on press and gets the drag/release that follow
#[derive(Clone, Copy)]
enum DragTarget {
    None,
    Grid,
    Bar,
}

/// Restores the terminal even when the demo panics
struct TermGuard;

impl TermGuard {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            event::EnableMouseCapture
        )?;
        Ok(Self)
    }
}

impl Drop for TermGuard {
    fn drop(&mut self) {
        let _ = execute!(
            io::stdout(),
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

fn main() -> io::Result<()> {
    // Set up file logging
    let log_file = File::create("bug_grid.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let tree = NodeTree::new();
    let queue = EventQueue::new();

    let host = tree.insert(Node::new(Role::Presentation), None);
    let columns = vec![
        GridColumn::new("id", "ID").kind(ColumnKind::Integer).key(true),
        GridColumn::new("summary", "Summary"),
        GridColumn::new("severity", "Severity"),
        GridColumn::new("votes", "Votes").kind(ColumnKind::Integer),
    ];
    let rows = REPORTS
        .iter()
        .map(|&(id, summary, severity, votes)| {
            GridRow::new()
                .cell("id", id)
                .cell("summary", summary)
                .cell("severity", severity)
                .cell("votes", votes)
        })
        .collect();
    let grid = Grid::build(&tree, Some(host), columns, rows, GridOptions::default(), &queue)
        .expect("grid construction");

    let bar = tree.insert(Node::new(Role::ScrollBar), Some(host));
    tree.set_controls(bar, Some(host));
    let scrollbar =
        ScrollBar::bind(&tree, bar, ScrollBarOptions::default()).expect("scrollbar binding");
    grid.bind_scrollbar(scrollbar.clone());

    let _guard = TermGuard::enter()?;
    let mut drag = DragTarget::None;
    let mut votes_hidden = false;
    let mut filtered = false;
    let mut status = String::from("ready");

    lay_out(&tree, &grid, host)?;
    scrollbar.poll();
    draw(&tree, &grid, &scrollbar, host, &status)?;

    loop {
        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        match event::read()? {
            CtEvent::Key(key_event) => {
                if key_event.kind != KeyEventKind::Press {
                    continue;
                }
                let combo = KeyCombo::from(key_event);
                match combo.key {
                    Key::Char('q') | Key::Escape => return Ok(()),
                    Key::Char('h') => {
                        votes_hidden = !votes_hidden;
                        grid.set_column_hidden("votes", votes_hidden);
                    }
                    Key::Char('f') => {
                        filtered = !filtered;
                        let keep: Vec<String> = REPORTS
                            .iter()
                            .filter(|&&(_, _, _, votes)| !filtered || votes >= 10)
                            .map(|&(id, ..)| id.to_string())
                            .collect();
                        let keep: Vec<&str> = keep.iter().map(String::as_str).collect();
                        grid.filter_rows(&keep);
                    }
                    _ => {
                        if grid.on_key(combo).is_handled() {
                            // Keep the freshly selected row in the viewport
                            if let Some(row_id) =
                                grid.selected().last().and_then(|&row| tree.id(row))
                            {
                                grid.ensure_row_visibility(&row_id);
                            }
                        }
                    }
                }
            }
            CtEvent::Mouse(mouse) => {
                let x = mouse.column;
                let y = mouse.row;
                match mouse.kind {
                    MouseEventKind::Down(button) => {
                        let button: PointerButton = button.into();
                        let modifiers = Modifiers::from(mouse.modifiers);
                        // The bar is pinned to the right edge; everything else
                        // belongs to the grid, with presses shifted into
                        // content space
                        if tree.rect(bar).is_some_and(|rect| rect.contains(x, y)) {
                            if scrollbar.on_press(x, y, button, modifiers)
                                == EventResult::StartDrag
                            {
                                drag = DragTarget::Bar;
                            }
                        } else if grid.on_press(x, content_space(&tree, host, y), button, modifiers)
                            == EventResult::StartDrag
                        {
                            drag = DragTarget::Grid;
                        }
                    }
                    MouseEventKind::Drag(MouseButton::Left) => match drag {
                        DragTarget::Grid => {
                            grid.on_drag(x, content_space(&tree, host, y));
                        }
                        DragTarget::Bar => {
                            scrollbar.on_drag(x, y);
                        }
                        DragTarget::None => {}
                    },
                    MouseEventKind::Up(MouseButton::Left) => {
                        match drag {
                            DragTarget::Grid => {
                                grid.on_release();
                            }
                            DragTarget::Bar => {
                                scrollbar.on_release();
                            }
                            DragTarget::None => {}
                        }
                        drag = DragTarget::None;
                    }
                    MouseEventKind::ScrollDown => {
                        grid.on_wheel(0, 1);
                    }
                    MouseEventKind::ScrollUp => {
                        grid.on_wheel(0, -1);
                    }
                    _ => {}
                }
            }
            CtEvent::Resize(..) => {
                lay_out(&tree, &grid, host)?;
            }
            _ => continue,
        }

        for widget_event in queue.drain() {
            log::info!("widget event: {widget_event:?}");
            status = describe(&widget_event);
            if matches!(
                widget_event,
                WidgetEvent::Sorted { .. }
                    | WidgetEvent::ColumnModified { .. }
                    | WidgetEvent::Filtered { .. }
                    | WidgetEvent::Rebuilt { .. }
            ) {
                lay_out(&tree, &grid, host)?;
            }
        }
        scrollbar.poll();
        draw(&tree, &grid, &scrollbar, host, &status)?;
    }
}

/// Translate a screen row into the grid's unscrolled content space
fn content_space(tree: &NodeTree, host: NodeId, y: u16) -> u16 {
    y + tree.scroll(host).1
}

/// Column cell width; the summary column soaks up whatever is left
fn column_width(column: &GridColumn, total: u16) -> u16 {
    match column.id.as_str() {
        "id" => 6,
        "severity" => 10,
        "votes" => 7,
        _ => total.saturating_sub(6 + 10 + 7 + 1).max(12),
    }
}

/// Assign rects: the host is the viewport, the grid container spans the full
/// content extent, and visible rows stack below the header row in content
/// coordinates. Hidden rows and columns keep stale rects; they are never
/// painted or hit.
fn lay_out(tree: &NodeTree, grid: &Grid, host: NodeId) -> io::Result<()> {
    let (width, height) = terminal::size()?;
    let viewport = height.saturating_sub(2).max(3);
    tree.set_rect(host, Rect::new(0, 1, width, viewport));

    let columns = grid.columns();
    let mut spans = Vec::with_capacity(columns.len());
    let mut x = 0;
    for column in &columns {
        let cell_width = column_width(column, width);
        spans.push((x, cell_width));
        if !column.hidden {
            x += cell_width;
        }
    }

    let headers = tree.children(grid.header_row());
    for ((&(x, cell_width), column), &header) in spans.iter().zip(&columns).zip(&headers) {
        if !column.hidden {
            tree.set_rect(header, Rect::new(x, 1, cell_width, 1));
        }
    }

    let mut y = 2;
    for id in grid.row_ids() {
        let Some(row) = grid.row_node(&id) else {
            continue;
        };
        if tree.is_hidden(row) {
            continue;
        }
        tree.set_rect(row, Rect::new(0, y, width.saturating_sub(1), 1));
        let cells = tree.children(row);
        for ((&(x, cell_width), column), &cell) in spans.iter().zip(&columns).zip(&cells) {
            if !column.hidden {
                tree.set_rect(cell, Rect::new(x, y, cell_width, 1));
            }
        }
        y += 1;
    }
    tree.set_rect(grid.container(), Rect::new(0, 1, width, y - 1));
    Ok(())
}

fn describe(event: &WidgetEvent) -> String {
    match event {
        WidgetEvent::Selected { ids, .. } => format!("selected {}", ids.join(", ")),
        WidgetEvent::Sorted { condition, .. } => {
            format!("sorted by {} ({:?})", condition.key, condition.order)
        }
        WidgetEvent::ColumnModified { columns, .. } => {
            let order: Vec<&str> = columns
                .iter()
                .filter(|column| !column.hidden)
                .map(|column| column.id.as_str())
                .collect();
            format!("columns: {}", order.join(" "))
        }
        WidgetEvent::Filtered { .. } => "filter changed".into(),
        WidgetEvent::Rebuilt { .. } => "rows rebuilt".into(),
        other => format!("{other:?}"),
    }
}

fn draw(
    tree: &NodeTree,
    grid: &Grid,
    scrollbar: &ScrollBar,
    host: NodeId,
    status: &str,
) -> io::Result<()> {
    let mut stdout = io::stdout();
    let (width, height) = terminal::size()?;
    let host_rect = tree.rect(host).unwrap_or_default();
    let offset = tree.scroll(host).1;

    queue!(
        stdout,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0),
        SetAttribute(Attribute::Bold),
        Print("bug grid: click a header to sort, drag it to reorder, h hides votes, f filters, q quits"),
        SetAttribute(Attribute::Reset),
    )?;

    // Header row scrolls with the content like any other row
    if offset == 0 {
        let columns = grid.columns();
        let headers = tree.children(grid.header_row());
        for (column, &header) in columns.iter().zip(&headers) {
            if column.hidden {
                continue;
            }
            let Some(rect) = tree.rect(header) else {
                continue;
            };
            let marker = match tree.sort(header) {
                Some(SortOrder::Ascending) => " ^",
                Some(SortOrder::Descending) => " v",
                None => "",
            };
            let text = format!("{}{marker}", column.label);
            queue!(
                stdout,
                cursor::MoveTo(rect.x, rect.y),
                SetAttribute(Attribute::Bold),
                SetAttribute(Attribute::Underlined),
                Print(format!("{text:<w$.w$}", w = rect.width as usize)),
                SetAttribute(Attribute::Reset),
            )?;
        }
    }

    // Visible slice of the body
    for id in grid.row_ids() {
        let Some(row) = grid.row_node(&id) else {
            continue;
        };
        if tree.is_hidden(row) {
            continue;
        }
        let Some(row_rect) = tree.rect(row) else {
            continue;
        };
        let screen_y = match row_rect.y.checked_sub(offset) {
            Some(y) if y >= host_rect.y && y < host_rect.bottom() => y,
            _ => continue,
        };
        let selected = tree.is_selected(row);
        if selected {
            queue!(stdout, SetAttribute(Attribute::Reverse))?;
        }
        for cell in tree.children(row) {
            if tree.is_hidden(cell) {
                continue;
            }
            let Some(cell_rect) = tree.rect(cell) else {
                continue;
            };
            let text = tree.label(cell).unwrap_or_default();
            queue!(
                stdout,
                cursor::MoveTo(cell_rect.x, screen_y),
                Print(format!("{text:<w$.w$}", w = cell_rect.width as usize)),
            )?;
        }
        if selected {
            queue!(stdout, SetAttribute(Attribute::Reset))?;
        }
    }

    // Scrollbar track and thumb on the right edge
    let geometry = scrollbar.geometry();
    if geometry.max_scroll > 0 {
        for t in 0..geometry.track {
            let on_thumb =
                t >= geometry.thumb_offset && t < geometry.thumb_offset + geometry.thumb_size;
            queue!(
                stdout,
                cursor::MoveTo(host_rect.right().saturating_sub(1), host_rect.y + t),
                Print(if on_thumb { "#" } else { "|" }),
            )?;
        }
    }

    queue!(
        stdout,
        cursor::MoveTo(0, height.saturating_sub(1)),
        SetAttribute(Attribute::Dim),
        Print(format!("{status:<w$.w$}", w = width as usize)),
        SetAttribute(Attribute::Reset),
    )?;
    stdout.flush()
}
