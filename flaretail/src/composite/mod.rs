//! Shared selection engine for composite widgets.
//!
//! This module provides:
//! - `Composite` state handle binding a container node to its members
//! - Configuration types (`CompositeOptions`, `SelectedAttr`, `Orientation`)
//! - Pointer and keyboard selection semantics shared by every widget
//! - The rolling type-ahead search buffer

mod events;
mod options;
mod search;
mod state;

pub use options::{CompositeOptions, Orientation, SelectedAttr};
pub use state::{Composite, CompositeId};
