use ariadom::{Node, NodeTree, RangeValue, Rect, Role, SortOrder};

fn listbox_with_options(labels: &[&str]) -> (NodeTree, ariadom::NodeId, Vec<ariadom::NodeId>) {
    let tree = NodeTree::new();
    let container = tree.insert(Node::new(Role::ListBox), None);
    let items = labels
        .iter()
        .map(|l| tree.insert(Node::new(Role::Option).label(*l), Some(container)))
        .collect();
    (tree, container, items)
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn test_insert_links_parent_and_children() {
    let (tree, container, items) = listbox_with_options(&["a", "b", "c"]);
    assert_eq!(tree.children(container), items);
    for &item in &items {
        assert_eq!(tree.parent(item), Some(container));
    }
    assert_eq!(tree.roots(), vec![container]);
}

#[test]
fn test_insert_before() {
    let (tree, container, items) = listbox_with_options(&["a", "c"]);
    let b = tree
        .insert_before(Node::new(Role::Option).label("b"), container, items[1])
        .unwrap();
    assert_eq!(tree.children(container), vec![items[0], b, items[1]]);
}

#[test]
fn test_insert_before_unknown_sibling_is_noop() {
    let (tree, container, _) = listbox_with_options(&["a"]);
    let other = NodeTree::new();
    let foreign = other.insert(Node::new(Role::Option), None);
    assert!(tree
        .insert_before(Node::new(Role::Option), container, foreign)
        .is_none());
    assert_eq!(tree.children(container).len(), 1);
}

#[test]
fn test_remove_subtree() {
    let tree = NodeTree::new();
    let root = tree.insert(Node::new(Role::Tree), None);
    let item = tree.insert(Node::new(Role::TreeItem), Some(root));
    let group = tree.insert(Node::new(Role::Group), Some(item));
    let child = tree.insert(Node::new(Role::TreeItem), Some(group));

    assert!(tree.remove(item));
    assert!(!tree.contains(item));
    assert!(!tree.contains(group));
    assert!(!tree.contains(child));
    assert!(tree.children(root).is_empty());
}

#[test]
fn test_remove_clears_focus_inside_subtree() {
    let tree = NodeTree::new();
    let root = tree.insert(Node::new(Role::Tree), None);
    let item = tree.insert(Node::new(Role::TreeItem), Some(root));
    let group = tree.insert(Node::new(Role::Group), Some(item));
    let child = tree.insert(Node::new(Role::TreeItem), Some(group));

    tree.set_focus(Some(child));
    tree.remove(item);
    assert_eq!(tree.focus(), None);
}

#[test]
fn test_move_child() {
    let (tree, container, items) = listbox_with_options(&["a", "b", "c"]);
    assert!(tree.move_child(container, 2, 0));
    assert_eq!(tree.children(container), vec![items[2], items[0], items[1]]);
    // Out of bounds is a no-op
    assert!(!tree.move_child(container, 5, 0));
}

#[test]
fn test_set_children_requires_permutation() {
    let (tree, container, items) = listbox_with_options(&["a", "b", "c"]);
    assert!(tree.set_children(container, &[items[2], items[1], items[0]]));
    assert_eq!(tree.children(container), vec![items[2], items[1], items[0]]);

    // Dropping an element is rejected
    assert!(!tree.set_children(container, &[items[0], items[1]]));
    // Substituting a foreign id is rejected
    let stray = tree.insert(Node::new(Role::Option), None);
    assert!(!tree.set_children(container, &[items[0], items[1], stray]));
    assert_eq!(tree.children(container), vec![items[2], items[1], items[0]]);
}

#[test]
fn test_ancestors_and_descendants() {
    let tree = NodeTree::new();
    let root = tree.insert(Node::new(Role::Tree), None);
    let item = tree.insert(Node::new(Role::TreeItem), Some(root));
    let group = tree.insert(Node::new(Role::Group), Some(item));
    let leaf = tree.insert(Node::new(Role::TreeItem), Some(group));

    assert_eq!(tree.ancestors(leaf), vec![group, item, root]);
    assert_eq!(tree.descendants(item), vec![group, leaf]);
    assert_eq!(tree.descendants(leaf), Vec::new());
}

// ============================================================================
// Attributes and revisions
// ============================================================================

#[test]
fn test_setters_bump_revision_only_on_change() {
    let (tree, _, items) = listbox_with_options(&["a"]);
    let before = tree.revision();
    tree.set_selected(items[0], true);
    let after = tree.revision();
    assert!(after > before);

    // Same value again: no bump
    tree.set_selected(items[0], true);
    assert_eq!(tree.revision(), after);
}

#[test]
fn test_rect_bumps_layout_revision_not_revision() {
    let (tree, container, _) = listbox_with_options(&["a"]);
    let rev = tree.revision();
    let layout_rev = tree.layout_revision();

    tree.set_rect(container, Rect::new(0, 0, 40, 10));
    assert_eq!(tree.revision(), rev);
    assert_eq!(tree.layout_revision(), layout_rev + 1);

    // Same rect: no bump
    tree.set_rect(container, Rect::new(0, 0, 40, 10));
    assert_eq!(tree.layout_revision(), layout_rev + 1);
}

#[test]
fn test_setters_on_vacant_id_are_noops() {
    let tree = NodeTree::new();
    let id = tree.insert(Node::new(Role::Option), None);
    tree.remove(id);

    tree.set_selected(id, true);
    tree.set_hidden(id, true);
    tree.set_range(id, Some(RangeValue::new(1, 0, 10)));
    assert_eq!(tree.range(id), None);
    assert!(!tree.is_selected(id));
}

#[test]
fn test_sort_attribute_round_trip() {
    let tree = NodeTree::new();
    let header = tree.insert(Node::new(Role::ColumnHeader).label("Name"), None);
    assert_eq!(tree.sort(header), None);
    tree.set_sort(header, Some(SortOrder::Ascending));
    assert_eq!(tree.sort(header), Some(SortOrder::Ascending));
    tree.set_sort(header, None);
    assert_eq!(tree.sort(header), None);
}

#[test]
fn test_focus_rejects_vacant_id() {
    let (tree, _, items) = listbox_with_options(&["a"]);
    let ghost = {
        let id = tree.insert(Node::new(Role::Option), None);
        tree.remove(id);
        id
    };
    assert!(!tree.set_focus(Some(ghost)));
    assert_eq!(tree.focus(), None);

    assert!(tree.set_focus(Some(items[0])));
    assert_eq!(tree.focus(), Some(items[0]));
    assert!(tree.set_focus(None));
    assert_eq!(tree.focus(), None);
}

// ============================================================================
// Member collection
// ============================================================================

#[test]
fn test_collect_members_basic_order() {
    let (tree, container, items) = listbox_with_options(&["a", "b", "c"]);
    assert_eq!(tree.collect_members(container, &[Role::Option]), items);
}

#[test]
fn test_collect_members_excludes_disabled_and_hidden() {
    let (tree, container, items) = listbox_with_options(&["a", "b", "c", "d"]);
    tree.set_disabled(items[1], true);
    tree.set_hidden(items[2], true);
    assert_eq!(
        tree.collect_members(container, &[Role::Option]),
        vec![items[0], items[3]]
    );
}

#[test]
fn test_collect_members_prunes_hidden_subtree() {
    let tree = NodeTree::new();
    let root = tree.insert(Node::new(Role::Tree), None);
    let top = tree.insert(Node::new(Role::TreeItem).label("top"), Some(root));
    let group = tree.insert(Node::new(Role::Group).hidden(true), Some(top));
    let _nested = tree.insert(Node::new(Role::TreeItem).label("nested"), Some(group));

    assert_eq!(tree.collect_members(root, &[Role::TreeItem]), vec![top]);

    tree.set_hidden(group, false);
    assert_eq!(tree.collect_members(root, &[Role::TreeItem]).len(), 2);
}

#[test]
fn test_collect_members_stops_at_nested_composite() {
    // A submenu's items belong to the submenu, not the outer menu.
    let tree = NodeTree::new();
    let menu = tree.insert(Node::new(Role::Menu), None);
    let item = tree.insert(Node::new(Role::MenuItem).label("File"), Some(menu));
    let submenu = tree.insert(Node::new(Role::Menu), Some(item));
    let _sub_item = tree.insert(Node::new(Role::MenuItem).label("Open"), Some(submenu));

    assert_eq!(tree.collect_members(menu, &[Role::MenuItem]), vec![item]);
    assert_eq!(
        tree.collect_members(submenu, &[Role::MenuItem]).len(),
        1
    );
}

#[test]
fn test_collect_members_descends_through_structure() {
    // Grid rows live under a rowgroup; the rowgroup is transparent.
    let tree = NodeTree::new();
    let grid = tree.insert(Node::new(Role::Grid), None);
    let body = tree.insert(Node::new(Role::RowGroup), Some(grid));
    let r1 = tree.insert(Node::new(Role::Row), Some(body));
    let r2 = tree.insert(Node::new(Role::Row), Some(body));
    let _cell = tree.insert(Node::new(Role::GridCell), Some(r1));

    assert_eq!(tree.collect_members(grid, &[Role::Row]), vec![r1, r2]);
}

#[test]
fn test_label_width() {
    let node = Node::new(Role::Option).label("hello");
    assert_eq!(node.label_width(), 5);
    let wide = Node::new(Role::Option).label("日本語");
    assert_eq!(wide.label_width(), 6);
}
