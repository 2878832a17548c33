//! Grid data model: columns, cell values, sort conditions.
//!
//! These types derive serde so hosts can persist a user's column layout
//! and sort preference between sessions.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use ariadom::SortOrder;

/// Column data kind, selecting the sort comparator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    #[default]
    String,
    Integer,
    Boolean,
    Time,
}

/// Column description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridColumn {
    /// Stable identifier; rows key their cell values by it
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub kind: ColumnKind,
    #[serde(default)]
    pub hidden: bool,
    /// Key column: its cell value identifies the row
    #[serde(default)]
    pub key: bool,
}

impl GridColumn {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: ColumnKind::String,
            hidden: false,
            key: false,
        }
    }

    pub fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn key(mut self, key: bool) -> Self {
        self.key = key;
        self
    }
}

/// One cell's value.
///
/// Untagged serde keeps persisted grids readable; `Time` must precede
/// `String` so timestamps are not swallowed as plain text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Integer(i64),
    Boolean(bool),
    Time(DateTime<Utc>),
    String(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(n) => write!(f, "{n}"),
            CellValue::Boolean(b) => write!(f, "{b}"),
            CellValue::Time(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M")),
            CellValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(value: DateTime<Utc>) -> Self {
        CellValue::Time(value)
    }
}

/// One row's cell values, keyed by column id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridRow {
    pub cells: HashMap<String, CellValue>,
}

impl GridRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(mut self, column_id: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.cells.insert(column_id.into(), value.into());
        self
    }

    pub fn get(&self, column_id: &str) -> Option<&CellValue> {
        self.cells.get(column_id)
    }
}

/// Applied sort: which column, which direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCondition {
    pub key: String,
    pub order: SortOrder,
}

/// Behavior switches for a [`Grid`](super::Grid)
#[derive(Debug, Clone, Copy)]
pub struct GridOptions {
    pub multiselectable: bool,
    /// Header clicks sort
    pub sortable: bool,
    /// Header drags reorder columns
    pub reorderable: bool,
    /// Per-cell selection; not implemented, rejected at construction
    pub cell_selection: bool,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            multiselectable: true,
            sortable: true,
            reorderable: true,
            cell_selection: false,
        }
    }
}
