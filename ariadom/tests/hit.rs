use ariadom::{node_at_point, row_like_at_point, Node, NodeTree, Rect, Role};

#[test]
fn test_hit_deepest_node_wins() {
    let tree = NodeTree::new();
    let root = tree.insert(
        Node::new(Role::Generic).rect(Rect::new(0, 0, 100, 50)),
        None,
    );
    let inner = tree.insert(
        Node::new(Role::Generic).rect(Rect::new(10, 10, 30, 3)),
        Some(root),
    );

    assert_eq!(node_at_point(&tree, root, 15, 11), Some(inner));
    assert_eq!(node_at_point(&tree, root, 5, 5), Some(root));
    assert_eq!(node_at_point(&tree, root, 99, 49), Some(root));
    assert_eq!(node_at_point(&tree, root, 150, 150), None);
}

#[test]
fn test_hit_later_sibling_on_top() {
    let tree = NodeTree::new();
    let root = tree.insert(
        Node::new(Role::Generic).rect(Rect::new(0, 0, 100, 100)),
        None,
    );
    let bottom = tree.insert(
        Node::new(Role::Generic).rect(Rect::new(10, 10, 50, 50)),
        Some(root),
    );
    let top = tree.insert(
        Node::new(Role::Generic).rect(Rect::new(30, 30, 50, 50)),
        Some(root),
    );

    assert_eq!(node_at_point(&tree, root, 40, 40), Some(top));
    assert_eq!(node_at_point(&tree, root, 15, 15), Some(bottom));
}

#[test]
fn test_hit_skips_hidden() {
    let tree = NodeTree::new();
    let root = tree.insert(
        Node::new(Role::Generic).rect(Rect::new(0, 0, 100, 100)),
        None,
    );
    let veiled = tree.insert(
        Node::new(Role::Generic)
            .hidden(true)
            .rect(Rect::new(10, 10, 50, 50)),
        Some(root),
    );

    assert_ne!(node_at_point(&tree, root, 20, 20), Some(veiled));
}

#[test]
fn test_hit_descends_through_rectless_node() {
    // A wrapper without a rect is transparent but not opaque to its children.
    let tree = NodeTree::new();
    let root = tree.insert(
        Node::new(Role::Generic).rect(Rect::new(0, 0, 100, 100)),
        None,
    );
    let wrapper = tree.insert(Node::new(Role::RowGroup), Some(root));
    let row = tree.insert(
        Node::new(Role::Row).rect(Rect::new(0, 3, 100, 1)),
        Some(wrapper),
    );

    assert_eq!(node_at_point(&tree, root, 50, 3), Some(row));
}

#[test]
fn test_row_like_walks_up_from_cell() {
    let tree = NodeTree::new();
    let grid = tree.insert(Node::new(Role::Grid).rect(Rect::new(0, 0, 80, 20)), None);
    let body = tree.insert(Node::new(Role::RowGroup), Some(grid));
    let row = tree.insert(
        Node::new(Role::Row).rect(Rect::new(0, 2, 80, 1)),
        Some(body),
    );
    let _cell = tree.insert(
        Node::new(Role::GridCell).rect(Rect::new(0, 2, 40, 1)),
        Some(row),
    );

    // The deepest hit is the cell; the row-like lookup climbs to the row.
    assert_eq!(row_like_at_point(&tree, grid, 10, 2), Some(row));
}

#[test]
fn test_row_like_misses_non_row_nodes() {
    let tree = NodeTree::new();
    let root = tree.insert(
        Node::new(Role::Generic).rect(Rect::new(0, 0, 80, 20)),
        None,
    );
    assert_eq!(row_like_at_point(&tree, root, 10, 10), None);
}
