//! Scroll synchronization between a scrollable host and its scrollbar node.
//!
//! This module provides:
//! - `ScrollBar` state handle bound through the `controls` link
//! - Configuration (`ScrollBarOptions`) and geometry (`ScrollBarGeometry`)
//! - Thumb drag with grab offset, track jumps, wheel and key scrolling
//! - Row-snapping "adjusted" mode for list-shaped content

mod events;
mod state;

pub use state::{ScrollBar, ScrollBarGeometry, ScrollBarOptions};
