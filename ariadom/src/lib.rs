pub mod hit;
pub mod node;
pub mod rect;
pub mod role;
pub mod tree;

pub use hit::{node_at_point, row_like_at_point};
pub use node::{Node, RangeValue, SortOrder};
pub use rect::Rect;
pub use role::Role;
pub use tree::{NodeId, NodeTree};
