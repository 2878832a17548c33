use ariadom::{Node, NodeId, NodeTree, RangeValue, Rect, Role};
use flaretail::{
    EventQueue, EventResult, Focusable, Key, KeyCombo, ListBox, Modifiers, PointerButton,
    RadioGroup, Selectable, Splitter, SplitterOptions, TabList, WidgetError, WidgetEvent,
    WidgetEvents,
};

fn key(k: Key) -> KeyCombo {
    KeyCombo::key(k)
}

// ============================================================================
// ListBox
// ============================================================================

fn list_box(labels: &[&str], multi: bool) -> (NodeTree, EventQueue, ListBox, Vec<NodeId>) {
    let tree = NodeTree::new();
    let queue = EventQueue::new();
    let container = tree.insert(Node::new(Role::ListBox), None);
    let options: Vec<NodeId> = labels
        .iter()
        .map(|label| tree.insert(Node::new(Role::Option).label(*label), Some(container)))
        .collect();
    let widget = ListBox::bind(&tree, container, multi, &queue).unwrap();
    (tree, queue, widget, options)
}

#[test]
fn test_listbox_bind_requires_listbox_role() {
    let tree = NodeTree::new();
    let queue = EventQueue::new();
    let node = tree.insert(Node::new(Role::Menu), None);
    assert!(matches!(
        ListBox::bind(&tree, node, false, &queue),
        Err(WidgetError::RoleMismatch {
            expected: Role::ListBox,
            found: Role::Menu,
        })
    ));
}

#[test]
fn test_listbox_keyboard_walks_options() {
    let (_tree, _queue, widget, options) = list_box(&["Apple", "Banana", "Cherry"], false);
    assert_eq!(widget.on_key(key(Key::Down)), EventResult::Consumed);
    assert_eq!(widget.selected(), vec![options[0]]);
    widget.on_key(key(Key::Down));
    assert_eq!(widget.selected(), vec![options[1]]);
    widget.on_key(key(Key::End));
    assert_eq!(widget.selected(), vec![options[2]]);
}

#[test]
fn test_listbox_typeahead_is_on_by_default() {
    let (_tree, _queue, widget, options) = list_box(&["Apple", "Banana", "Cherry"], false);
    widget.on_key(key(Key::Down));
    widget.on_key(key(Key::Char('c')));
    assert_eq!(widget.selected(), vec![options[2]]);
}

#[test]
fn test_listbox_press_selects_under_pointer() {
    let (tree, _queue, widget, options) = list_box(&["Apple", "Banana", "Cherry"], true);
    tree.set_rect(widget.container(), Rect::new(0, 0, 8, 4));
    for (index, option) in options.iter().enumerate() {
        tree.set_rect(*option, Rect::new(0, index as u16, 8, 1));
    }

    assert_eq!(
        widget.on_press(2, 2, PointerButton::Left, Modifiers::NONE),
        EventResult::Consumed
    );
    assert_eq!(widget.selected(), vec![options[2]]);

    assert_eq!(
        widget.on_press(2, 2, PointerButton::Right, Modifiers::NONE),
        EventResult::Ignored
    );
    assert_eq!(
        widget.on_press(2, 3, PointerButton::Left, Modifiers::NONE),
        EventResult::Ignored
    );
}

// ============================================================================
// RadioGroup
// ============================================================================

fn radio_group() -> (NodeTree, EventQueue, RadioGroup, Vec<NodeId>) {
    let tree = NodeTree::new();
    let queue = EventQueue::new();
    let container = tree.insert(Node::new(Role::RadioGroup), None);
    let radios: Vec<NodeId> = ["small", "medium", "large"]
        .iter()
        .map(|id| tree.insert(Node::new(Role::Radio).id(*id).label(*id), Some(container)))
        .collect();
    let widget = RadioGroup::bind(&tree, container, &queue).unwrap();
    (tree, queue, widget, radios)
}

#[test]
fn test_radio_bind_requires_radiogroup_role() {
    let tree = NodeTree::new();
    let queue = EventQueue::new();
    let node = tree.insert(Node::new(Role::ListBox), None);
    assert!(matches!(
        RadioGroup::bind(&tree, node, &queue),
        Err(WidgetError::RoleMismatch {
            expected: Role::RadioGroup,
            found: Role::ListBox,
        })
    ));
}

#[test]
fn test_radio_checks_with_aria_checked() {
    let (tree, _queue, widget, radios) = radio_group();
    widget.on_key(key(Key::Down));
    assert_eq!(widget.checked(), Some(radios[0]));
    // The checked attribute carries the state, not aria-selected
    assert!(tree.is_checked(radios[0]));
    assert!(!tree.is_selected(radios[0]));

    widget.on_key(key(Key::Down));
    assert_eq!(widget.checked(), Some(radios[1]));
    assert!(!tree.is_checked(radios[0]));
    assert_eq!(widget.value(), Some("medium".to_string()));
}

#[test]
fn test_radio_arrows_cycle_past_the_edges() {
    let (_tree, _queue, widget, radios) = radio_group();
    widget.on_key(key(Key::Down));
    widget.on_key(key(Key::Down));
    widget.on_key(key(Key::Down));
    assert_eq!(widget.checked(), Some(radios[2]));
    widget.on_key(key(Key::Down));
    assert_eq!(widget.checked(), Some(radios[0]));
    widget.on_key(key(Key::Up));
    assert_eq!(widget.checked(), Some(radios[2]));
}

#[test]
fn test_radio_selection_is_single() {
    let (_tree, _queue, widget, radios) = radio_group();
    widget.set_selected(&[radios[0], radios[2]]);
    assert_eq!(widget.selected(), vec![radios[0]]);
}

// ============================================================================
// TabList
// ============================================================================

struct TabFixture {
    tree: NodeTree,
    queue: EventQueue,
    widget: TabList,
    editor: NodeId,
    preview: NodeId,
    editor_panel: NodeId,
    preview_panel: NodeId,
}

fn tab_list() -> TabFixture {
    let tree = NodeTree::new();
    let queue = EventQueue::new();
    let root = tree.insert(Node::new(Role::Presentation), None);
    let container = tree.insert(Node::new(Role::TabList), Some(root));
    let editor = tree.insert(
        Node::new(Role::Tab).label("Editor").selected(true),
        Some(container),
    );
    let preview = tree.insert(Node::new(Role::Tab).label("Preview"), Some(container));
    let editor_panel = tree.insert(Node::new(Role::TabPanel), Some(root));
    let preview_panel = tree.insert(Node::new(Role::TabPanel), Some(root));
    tree.set_controls(editor, Some(editor_panel));
    tree.set_controls(preview, Some(preview_panel));
    let widget = TabList::bind(&tree, container, &queue).unwrap();
    TabFixture {
        tree,
        queue,
        widget,
        editor,
        preview,
        editor_panel,
        preview_panel,
    }
}

#[test]
fn test_tablist_bind_syncs_panels() {
    let fx = tab_list();
    assert_eq!(fx.widget.selected_tab(), Some(fx.editor));
    assert!(!fx.tree.is_hidden(fx.editor_panel));
    assert!(fx.tree.is_hidden(fx.preview_panel));
    assert_eq!(fx.widget.panel_for(fx.preview), Some(fx.preview_panel));
}

#[test]
fn test_select_tab_swaps_panels() {
    let fx = tab_list();
    fx.widget.select_tab(fx.preview);
    assert_eq!(fx.widget.selected_tab(), Some(fx.preview));
    assert!(fx.tree.is_hidden(fx.editor_panel));
    assert!(!fx.tree.is_hidden(fx.preview_panel));
}

#[test]
fn test_tab_keys_move_selection_and_panels() {
    let fx = tab_list();
    fx.widget.set_focused(Some(fx.editor));
    assert_eq!(fx.widget.on_key(key(Key::Right)), EventResult::Consumed);
    assert_eq!(fx.widget.selected_tab(), Some(fx.preview));
    assert!(!fx.tree.is_hidden(fx.preview_panel));
    // Cycling wraps back to the first tab
    fx.widget.on_key(key(Key::Right));
    assert_eq!(fx.widget.selected_tab(), Some(fx.editor));
}

#[test]
fn test_add_tab_appends_without_selecting() {
    let fx = tab_list();
    let root = fx.tree.parent(fx.widget.container()).unwrap();
    let settings_panel = fx.tree.insert(Node::new(Role::TabPanel), Some(root));
    fx.queue.drain();

    let settings = fx.widget.add_tab("Settings", settings_panel);
    assert_eq!(fx.widget.members().len(), 3);
    assert_eq!(fx.widget.selected_tab(), Some(fx.editor));
    assert!(fx.tree.is_hidden(settings_panel));
    assert!(matches!(fx.queue.next(), Some(WidgetEvent::Rebuilt { .. })));
    assert_eq!(fx.widget.panel_for(settings), Some(settings_panel));
}

#[test]
fn test_close_selected_tab_falls_back_to_previous() {
    let fx = tab_list();
    fx.widget.select_tab(fx.preview);
    assert!(fx.widget.close_tab(fx.preview));
    assert_eq!(fx.widget.members(), vec![fx.editor]);
    assert_eq!(fx.widget.selected_tab(), Some(fx.editor));
    assert!(!fx.tree.is_hidden(fx.editor_panel));
    assert!(!fx.tree.contains(fx.preview_panel));
}

#[test]
fn test_close_first_selected_tab_falls_forward() {
    let fx = tab_list();
    assert!(fx.widget.close_tab(fx.editor));
    assert_eq!(fx.widget.selected_tab(), Some(fx.preview));
    assert!(!fx.tree.is_hidden(fx.preview_panel));
}

#[test]
fn test_close_unselected_tab_keeps_selection() {
    let fx = tab_list();
    assert!(fx.widget.close_tab(fx.preview));
    assert_eq!(fx.widget.selected_tab(), Some(fx.editor));

    // Closing a tab that is gone reports false
    assert!(!fx.widget.close_tab(fx.preview));
}

#[test]
fn test_tab_press_selects() {
    let fx = tab_list();
    fx.tree.set_rect(fx.widget.container(), Rect::new(0, 0, 16, 1));
    fx.tree.set_rect(fx.editor, Rect::new(0, 0, 8, 1));
    fx.tree.set_rect(fx.preview, Rect::new(8, 0, 8, 1));

    assert_eq!(
        fx.widget.on_press(9, 0, PointerButton::Left, Modifiers::NONE),
        EventResult::Consumed
    );
    assert_eq!(fx.widget.selected_tab(), Some(fx.preview));
    assert!(!fx.tree.is_hidden(fx.preview_panel));
}

// ============================================================================
// Splitter
// ============================================================================

fn splitter_setup(options: SplitterOptions) -> (NodeTree, EventQueue, Splitter, NodeId) {
    let tree = NodeTree::new();
    let queue = EventQueue::new();
    let pane = tree.insert(Node::new(Role::Presentation), None);
    tree.set_rect(pane, Rect::new(5, 0, 40, 10));
    let separator = tree.insert(Node::new(Role::Separator), Some(pane));
    let widget = Splitter::bind(&tree, separator, options, &queue).unwrap();
    (tree, queue, widget, separator)
}

#[test]
fn test_splitter_bind_validates() {
    let tree = NodeTree::new();
    let queue = EventQueue::new();
    let wrong = tree.insert(Node::new(Role::Presentation), None);
    assert!(matches!(
        Splitter::bind(&tree, wrong, SplitterOptions::default(), &queue),
        Err(WidgetError::RoleMismatch {
            expected: Role::Separator,
            found: Role::Presentation,
        })
    ));

    let separator = tree.insert(Node::new(Role::Separator), None);
    let empty = SplitterOptions {
        min: 30,
        max: 10,
        ..SplitterOptions::default()
    };
    assert!(matches!(
        Splitter::bind(&tree, separator, empty, &queue),
        Err(WidgetError::Unsupported(_))
    ));
}

#[test]
fn test_splitter_starts_from_the_range_attribute() {
    let tree = NodeTree::new();
    let queue = EventQueue::new();
    let separator = tree.insert(Node::new(Role::Separator), None);
    tree.set_range(separator, Some(RangeValue::new(25, 0, 0)));
    let options = SplitterOptions {
        min: 10,
        max: 50,
        ..SplitterOptions::default()
    };
    let widget = Splitter::bind(&tree, separator, options, &queue).unwrap();
    assert_eq!(widget.position(), 25);
    // The range value is rewritten with the configured bounds
    assert_eq!(tree.range(separator), Some(RangeValue::new(25, 10, 50)));
}

#[test]
fn test_splitter_clamps_and_reports_moves() {
    let options = SplitterOptions {
        min: 10,
        max: 50,
        ..SplitterOptions::default()
    };
    let (tree, queue, widget, separator) = splitter_setup(options);
    assert_eq!(widget.position(), 10);

    widget.set_position(99);
    assert_eq!(widget.position(), 50);
    widget.set_position(5);
    assert_eq!(widget.position(), 10);
    assert_eq!(tree.range(separator), Some(RangeValue::new(10, 10, 50)));

    // One Resized per actual change; repeats stay quiet
    widget.set_position(10);
    let moves: Vec<u16> = queue
        .drain()
        .into_iter()
        .filter_map(|event| match event {
            WidgetEvent::Resized { position, .. } => Some(position),
            _ => None,
        })
        .collect();
    assert_eq!(moves, vec![50, 10]);
}

#[test]
fn test_splitter_keys_nudge_and_jump() {
    let options = SplitterOptions {
        min: 10,
        max: 50,
        ..SplitterOptions::default()
    };
    let (_tree, _queue, widget, _separator) = splitter_setup(options);

    assert_eq!(widget.on_key(key(Key::End)), EventResult::Consumed);
    assert_eq!(widget.position(), 50);
    assert_eq!(widget.on_key(key(Key::Home)), EventResult::Consumed);
    assert_eq!(widget.position(), 10);
    widget.on_key(key(Key::Right));
    assert_eq!(widget.position(), 11);
    widget.on_key(key(Key::Left));
    assert_eq!(widget.position(), 10);

    assert_eq!(widget.on_key(key(Key::Right).ctrl()), EventResult::Ignored);
    assert_eq!(widget.on_key(key(Key::Enter)), EventResult::Ignored);
}

#[test]
fn test_splitter_drag_follows_the_pointer() {
    let options = SplitterOptions {
        min: 10,
        max: 50,
        ..SplitterOptions::default()
    };
    let (tree, queue, widget, separator) = splitter_setup(options);
    widget.set_position(20);
    queue.drain();

    // The pane sits at x 5, so pointer x 27 is 22 along the axis
    assert_eq!(
        widget.on_press(27, 3, PointerButton::Left, Modifiers::NONE),
        EventResult::StartDrag
    );
    assert_eq!(tree.grabbed(separator), Some(true));
    assert_eq!(
        widget.on_press(27, 3, PointerButton::Left, Modifiers::NONE),
        EventResult::Ignored
    );

    assert_eq!(widget.on_drag(30, 3), EventResult::Consumed);
    assert_eq!(widget.position(), 23);

    assert_eq!(widget.on_release(), EventResult::Consumed);
    assert_eq!(tree.grabbed(separator), Some(false));
    assert_eq!(widget.on_release(), EventResult::Ignored);
    assert_eq!(widget.on_drag(31, 3), EventResult::Ignored);
}

// ============================================================================
// Event plumbing
// ============================================================================

#[test]
fn test_queue_is_fifo_one_per_tick() {
    let (_tree, queue, widget, options) = list_box(&["Apple", "Banana"], true);
    widget.on_key(key(Key::Down));
    widget.on_key(key(Key::Down).shift());

    let first = queue.next();
    match first {
        Some(WidgetEvent::Selected { items, .. }) => assert_eq!(items, vec![options[0]]),
        other => panic!("expected a selection event, got {other:?}"),
    }
    match queue.next() {
        Some(WidgetEvent::Selected { items, .. }) => {
            assert_eq!(items, vec![options[0], options[1]])
        }
        other => panic!("expected a selection event, got {other:?}"),
    }
    assert_eq!(queue.next(), None);
    assert!(queue.is_empty());
}

#[test]
fn test_event_result_classifies_handled() {
    assert!(EventResult::Consumed.is_handled());
    assert!(EventResult::StartDrag.is_handled());
    assert!(!EventResult::Ignored.is_handled());
}
