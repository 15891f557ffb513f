//! Single-column sort cycling and value ordering.

use std::cmp::Ordering;

use serde_json::Value;

use crate::query::{ColumnSort, SortDirection};
use crate::table::column::ColumnDef;

/// Next sort after a click on `column`.
///
/// Cycles `unsorted -> asc -> desc -> unsorted`. A click on a different
/// column starts that column at `asc`, replacing the previous sort: only
/// one column is ever sorted.
pub fn next_sort(current: Option<&ColumnSort>, column: &str) -> Option<ColumnSort> {
    match current {
        Some(sort) if sort.column == column => match sort.direction {
            SortDirection::Asc => Some(ColumnSort::desc(column)),
            SortDirection::Desc => None,
        },
        _ => Some(ColumnSort::asc(column)),
    }
}

/// Like [`next_sort`], but a click on an unknown or non-sortable column
/// leaves the sort unchanged.
pub fn toggle_sort(
    columns: &[ColumnDef],
    current: Option<&ColumnSort>,
    column: &str,
) -> Option<ColumnSort> {
    let sortable = columns
        .iter()
        .any(|def| def.id == column && def.enable_sorting);
    if sortable {
        next_sort(current, column)
    } else {
        current.cloned()
    }
}

/// Sort direction shown on a column header, if it is the sorted one.
pub fn indicator(current: Option<&ColumnSort>, column: &str) -> Option<SortDirection> {
    current
        .filter(|sort| sort.column == column)
        .map(|sort| sort.direction)
}

/// Total order over JSON values used by in-memory sorting.
///
/// Values of different kinds order as null < bool < number < string <
/// array < object. Numeric strings come before all other strings and compare
/// numerically; the rest compare case-insensitively.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.unwrap_or(&Value::Null);
    let b = b.unwrap_or(&Value::Null);
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(0.0);
            let y = y.as_f64().unwrap_or(0.0);
            x.total_cmp(&y)
        }
        (Value::String(x), Value::String(y)) => {
            match (x.trim().parse::<f64>(), y.trim().parse::<f64>()) {
                (Ok(x), Ok(y)) => x.total_cmp(&y),
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => x.to_lowercase().cmp(&y.to_lowercase()),
            }
        }
        (Value::Array(x), Value::Array(y)) => x.len().cmp(&y.len()),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
