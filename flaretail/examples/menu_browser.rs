use std::fs::File;
use std::io::{self, Write};
use std::time::Duration;

use ariadom::{Node, NodeId, NodeTree, Rect, Role};
use crossterm::event::{Event as CtEvent, KeyEventKind, MouseEventKind};
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::{cursor, event, execute, queue, terminal};
use flaretail::{
    EventQueue, Focusable, Key, KeyCombo, ListBox, MenuBar, Modifiers, PointerButton, Selectable,
    WidgetEvent, WidgetEvents,
};
use simplelog::{Config, LevelFilter, WriteLogger};

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

fn menu_item(tree: &NodeTree, parent: NodeId, id: &str, label: &str) -> NodeId {
    tree.insert(Node::new(Role::MenuItem).id(id).label(label), Some(parent))
}

fn main() -> io::Result<()> {
    // Set up file logging
    let log_file = File::create("menu_browser.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)
        .expect("Failed to initialize logger");

    let tree = NodeTree::new();
    let queue = EventQueue::new();

    // Menu bar: File and View carry drop-downs, Help is a plain item
    let bar_node = tree.insert(Node::new(Role::MenuBar), None);
    let file_item = menu_item(&tree, bar_node, "file", "File");
    let file_menu = tree.insert(Node::new(Role::Menu), Some(file_item));
    menu_item(&tree, file_menu, "file-add", "Add entry");
    menu_item(&tree, file_menu, "file-remove", "Remove selected");
    menu_item(&tree, file_menu, "file-quit", "Quit");
    let view_item = menu_item(&tree, bar_node, "view", "View");
    let view_menu = tree.insert(Node::new(Role::Menu), Some(view_item));
    menu_item(&tree, view_menu, "view-select-all", "Select all");
    menu_item(&tree, view_menu, "view-clear", "Clear selection");
    menu_item(&tree, bar_node, "help", "Help");

    // List box of entries under the bar
    let list_node = tree.insert(Node::new(Role::ListBox), None);
    for name in ["Inbox", "Drafts", "Archive", "Reports", "Receipts", "Travel"] {
        tree.insert(Node::new(Role::Option).label(name), Some(list_node));
    }

    let bar = MenuBar::bind(&tree, bar_node, &queue).expect("menu bar binding");
    let listbox = ListBox::bind(&tree, list_node, true, &queue).expect("list box binding");

    let _guard = TermGuard::enter()?;
    let mut bar_active = false;
    let mut next_entry = 1;
    let mut status = String::from("F10 opens the menu, arrows move, q quits");

    lay_out(&tree, &bar, &listbox, bar_node, list_node)?;
    draw(&tree, &bar, &listbox, bar_active, &status)?;

    loop {
        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        let mut quit = false;
        match event::read()? {
            CtEvent::Key(key_event) => {
                if key_event.kind != KeyEventKind::Press {
                    continue;
                }
                let combo = KeyCombo::from(key_event);
                match combo.key {
                    Key::Char('q') if !bar_active => return Ok(()),
                    Key::F(10) => {
                        bar_active = true;
                        bar.set_focused(bar.members().first().copied());
                    }
                    _ if bar_active => {
                        if !bar.on_key(combo).is_handled() && combo.key == Key::Escape {
                            bar_active = false;
                            bar.set_focused(None);
                        }
                    }
                    _ => {
                        listbox.on_key(combo);
                    }
                }
            }
            CtEvent::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(button) => {
                    let button: PointerButton = button.into();
                    let modifiers = Modifiers::from(mouse.modifiers);
                    let was_open = bar.open_menu().is_some();
                    if bar.on_press(mouse.column, mouse.row, button, modifiers).is_handled() {
                        bar_active = true;
                    } else {
                        // Light dismiss: an outside press closes the open menu
                        if was_open {
                            bar.on_key(KeyCombo::key(Key::Escape));
                            bar_active = false;
                            bar.set_focused(None);
                        }
                        listbox.on_press(mouse.column, mouse.row, button, modifiers);
                    }
                }
                _ => {}
            },
            CtEvent::Resize(..) => {
                lay_out(&tree, &bar, &listbox, bar_node, list_node)?;
            }
            _ => continue,
        }

        for widget_event in queue.drain() {
            log::info!("widget event: {widget_event:?}");
            match &widget_event {
                WidgetEvent::Selected { ids, labels, .. } => {
                    let action = ids.first().map(String::as_str);
                    match action {
                        Some("file-add") => {
                            let label = format!("Entry {next_entry}");
                            next_entry += 1;
                            tree.insert(Node::new(Role::Option).label(label), Some(list_node));
                            listbox.refresh_members();
                            lay_out(&tree, &bar, &listbox, bar_node, list_node)?;
                            status = "entry added".into();
                            bar_active = false;
                            bar.set_focused(None);
                        }
                        Some("file-remove") => {
                            for option in listbox.selected() {
                                tree.remove(option);
                            }
                            listbox.refresh_members();
                            lay_out(&tree, &bar, &listbox, bar_node, list_node)?;
                            status = "selection removed".into();
                            bar_active = false;
                            bar.set_focused(None);
                        }
                        Some("file-quit") => quit = true,
                        Some("view-select-all") => {
                            listbox.select_all();
                            bar_active = false;
                            bar.set_focused(None);
                        }
                        Some("view-clear") => {
                            listbox.clear_selection();
                            bar_active = false;
                            bar.set_focused(None);
                        }
                        _ => {
                            if !labels.is_empty() {
                                status = format!("selected {}", labels.join(", "));
                            }
                        }
                    }
                }
                WidgetEvent::MenuOpened { .. } => status = "menu opened".into(),
                WidgetEvent::MenuClosed { .. } => status = "menu closed".into(),
                _ => {}
            }
        }
        if quit {
            return Ok(());
        }
        draw(&tree, &bar, &listbox, bar_active, &status)?;
    }
}

/// Assign rects: bar items across the top, each drop-down panel anchored
/// under its item, list entries stacked below the bar.
fn lay_out(
    tree: &NodeTree,
    bar: &MenuBar,
    listbox: &ListBox,
    bar_node: NodeId,
    list_node: NodeId,
) -> io::Result<()> {
    let (width, height) = terminal::size()?;
    tree.set_rect(bar_node, Rect::new(0, 0, width, 1));

    let mut x = 0;
    for item in bar.members() {
        let label = tree.label(item).unwrap_or_default();
        let item_width = label.len() as u16 + 2;
        tree.set_rect(item, Rect::new(x, 0, item_width, 1));

        if let Some(menu) = bar.menu_for(item) {
            let members = menu.members();
            let panel_width = members
                .iter()
                .map(|&m| tree.label(m).map(|l| l.len() as u16).unwrap_or(0))
                .max()
                .unwrap_or(0)
                + 2;
            let panel = menu.container();
            tree.set_rect(panel, Rect::new(x, 1, panel_width, members.len() as u16));
            for (index, &member) in members.iter().enumerate() {
                tree.set_rect(member, Rect::new(x, 1 + index as u16, panel_width, 1));
            }
        }
        x += item_width;
    }

    tree.set_rect(list_node, Rect::new(0, 2, width, height.saturating_sub(3)));
    for (index, option) in listbox.members().into_iter().enumerate() {
        tree.set_rect(option, Rect::new(0, 2 + index as u16, width, 1));
    }
    Ok(())
}

fn draw(
    tree: &NodeTree,
    bar: &MenuBar,
    listbox: &ListBox,
    bar_active: bool,
    status: &str,
) -> io::Result<()> {
    let mut stdout = io::stdout();
    let (width, height) = terminal::size()?;

    queue!(stdout, terminal::Clear(terminal::ClearType::All))?;

    // List entries first so an open drop-down paints over them
    let list_focused = listbox.focused();
    for option in listbox.members() {
        let Some(rect) = tree.rect(option) else {
            continue;
        };
        if rect.y >= height.saturating_sub(1) {
            continue;
        }
        let label = tree.label(option).unwrap_or_default();
        let selected = listbox.is_selected(option);
        let marker = if list_focused == Some(option) { ">" } else { " " };
        if selected {
            queue!(stdout, SetAttribute(Attribute::Reverse))?;
        }
        queue!(
            stdout,
            cursor::MoveTo(rect.x, rect.y),
            Print(format!("{marker} {label:<w$.w$}", w = (width as usize).saturating_sub(2))),
        )?;
        if selected {
            queue!(stdout, SetAttribute(Attribute::Reset))?;
        }
    }

    // Bar items, highlighting the focused one while the bar is active
    let bar_focused = bar.focused();
    for item in bar.members() {
        let Some(rect) = tree.rect(item) else {
            continue;
        };
        let label = tree.label(item).unwrap_or_default();
        let highlighted = bar_active && bar_focused == Some(item);
        if highlighted {
            queue!(stdout, SetAttribute(Attribute::Reverse))?;
        }
        queue!(
            stdout,
            cursor::MoveTo(rect.x, rect.y),
            Print(format!(" {label} ")),
        )?;
        if highlighted {
            queue!(stdout, SetAttribute(Attribute::Reset))?;
        }
    }

    // Open drop-down on top
    if let Some(anchor) = bar.open_menu() {
        if let Some(menu) = bar.menu_for(anchor) {
            let menu_focused = menu.focused();
            for member in menu.members() {
                let Some(rect) = tree.rect(member) else {
                    continue;
                };
                let label = tree.label(member).unwrap_or_default();
                let highlighted = menu_focused == Some(member);
                if highlighted {
                    queue!(stdout, SetAttribute(Attribute::Reverse))?;
                }
                queue!(
                    stdout,
                    cursor::MoveTo(rect.x, rect.y),
                    Print(format!("{label:<w$.w$}", w = rect.width as usize)),
                )?;
                if highlighted {
                    queue!(stdout, SetAttribute(Attribute::Reset))?;
                }
            }
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
