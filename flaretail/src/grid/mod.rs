//! Data grid widget.
//!
//! This module provides:
//! - `Grid` state handle composing a selection engine over data rows
//! - Column and cell data types (`GridColumn`, `CellValue`, serde-ready)
//! - Kind-aware sorting with normalized, cached string comparison
//! - Column reorder drags, visibility toggles, row filtering

mod column;
mod events;
mod sort;
mod state;

pub use column::{CellValue, ColumnKind, GridColumn, GridOptions, GridRow, SortCondition, SortOrder};
pub use state::Grid;
