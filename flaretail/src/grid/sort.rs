//! Cell comparators.
//!
//! String cells compare after normalization: bracket and quote
//! punctuation stripped, then lowercased, so "[RFE] thing" files next to
//! "Thing". Normalized forms are cached per distinct value.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::OnceLock;

use chrono::DateTime;
use regex::Regex;

use super::column::{CellValue, ColumnKind};

static PUNCTUATION: OnceLock<Regex> = OnceLock::new();

fn punctuation() -> &'static Regex {
    PUNCTUATION.get_or_init(|| Regex::new(r#"[\[\]()<>{}"']"#).expect("punctuation pattern is valid"))
}

pub(super) fn normalize_label(label: &str) -> String {
    punctuation().replace_all(label, "").to_lowercase()
}

/// Fill the cache with normalized forms of every string value in `values`.
pub(super) fn prime_cache<'a>(
    values: impl Iterator<Item = &'a CellValue>,
    cache: &mut HashMap<String, String>,
) {
    for value in values {
        if let CellValue::String(s) = value {
            if !cache.contains_key(s) {
                cache.insert(s.clone(), normalize_label(s));
            }
        }
    }
}

fn normalized<'a>(value: &CellValue, cache: &'a HashMap<String, String>) -> Cow<'a, str> {
    match value {
        CellValue::String(s) => match cache.get(s) {
            Some(normal) => Cow::Borrowed(normal.as_str()),
            None => Cow::Owned(normalize_label(s)),
        },
        other => Cow::Owned(normalize_label(&other.to_string())),
    }
}

fn as_integer(value: &CellValue) -> i64 {
    match value {
        CellValue::Integer(n) => *n,
        CellValue::Boolean(b) => *b as i64,
        CellValue::Time(t) => t.timestamp(),
        CellValue::String(s) => s.trim().parse().unwrap_or(0),
    }
}

fn as_boolean(value: &CellValue) -> bool {
    match value {
        CellValue::Boolean(b) => *b,
        CellValue::Integer(n) => *n != 0,
        CellValue::Time(_) => true,
        CellValue::String(s) => !s.is_empty() && s != "false",
    }
}

fn as_timestamp(value: &CellValue) -> i64 {
    match value {
        CellValue::Time(t) => t.timestamp_millis(),
        CellValue::Integer(n) => *n,
        CellValue::Boolean(_) => 0,
        CellValue::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|t| t.timestamp_millis())
            .unwrap_or(0),
    }
}

/// Compare two optional cells under a column kind; absent cells sort first.
pub(super) fn compare_cells(
    kind: ColumnKind,
    a: Option<&CellValue>,
    b: Option<&CellValue>,
    cache: &HashMap<String, String>,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => match kind {
            ColumnKind::Integer => as_integer(a).cmp(&as_integer(b)),
            ColumnKind::Boolean => as_boolean(a).cmp(&as_boolean(b)),
            ColumnKind::Time => as_timestamp(a).cmp(&as_timestamp(b)),
            ColumnKind::String => normalized(a, cache).cmp(&normalized(b, cache)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation() {
        assert_eq!(normalize_label("[RFE] \"Widget\" (draft)"), "rfe widget draft");
    }

    #[test]
    fn test_string_compare_ignores_brackets() {
        // Raw comparison would put '[' after 'A'; normalized it is
        // "apple" vs "apricot"
        let cache = HashMap::new();
        let a = CellValue::from("[Apple]");
        let b = CellValue::from("Apricot");
        assert_eq!(
            compare_cells(ColumnKind::String, Some(&a), Some(&b), &cache),
            Ordering::Less
        );
    }

    #[test]
    fn test_boolean_false_before_true() {
        let cache = HashMap::new();
        let a = CellValue::from(false);
        let b = CellValue::from(true);
        assert_eq!(
            compare_cells(ColumnKind::Boolean, Some(&a), Some(&b), &cache),
            Ordering::Less
        );
    }

    #[test]
    fn test_absent_cells_sort_first() {
        let cache = HashMap::new();
        let b = CellValue::from(7_i64);
        assert_eq!(
            compare_cells(ColumnKind::Integer, None, Some(&b), &cache),
            Ordering::Less
        );
    }
}
