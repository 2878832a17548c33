//! Construction-time widget errors.
//!
//! Widgets fail only while binding: a vacant container node or an
//! unsupported configuration refuses to mount. Runtime operations on
//! absent or detached nodes are silent no-ops instead.

use ariadom::Role;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WidgetError {
    /// The container node is vacant or was never inserted into the tree.
    #[error("container node is missing or detached")]
    MissingContainer,

    /// The container node carries the wrong role for this widget.
    #[error("container role mismatch: expected {expected}, found {found}")]
    RoleMismatch { expected: Role, found: Role },

    /// A configuration the engine explicitly does not implement.
    #[error("unsupported configuration: {0}")]
    Unsupported(&'static str),
}
