use std::cmp::Ordering;

use crate::engine::QueryParameters;
use crate::state::{CellValue, ColumnDescriptor, ColumnKind, Record};

/// What: Evaluate query parameters over a dataset the way a remote endpoint would.
///
/// Inputs:
/// - `rows`: Baseline dataset
/// - `params`: Sort and range parameters
///
/// Output:
/// - Rows satisfying every range (inclusive), stably sorted on the sort column.
///
/// Details:
/// - Date columns compare whole years; rows lacking a value for a ranged column are dropped.
/// - Rows missing the sort value are placed last in both directions.
#[must_use]
pub fn evaluate(rows: &[Record], params: &QueryParameters) -> Vec<Record> {
    let ranges: Vec<(ColumnDescriptor, (f64, f64))> = params
        .ranges()
        .map(|(column, range)| (ColumnDescriptor::resolve(column, rows), range))
        .collect();
    let mut out: Vec<Record> = rows
        .iter()
        .filter(|r| ranges.iter().all(|(desc, range)| in_range(r, desc, *range)))
        .cloned()
        .collect();
    if let Some((column, ascending)) = params.sort() {
        out.sort_by(|a, b| match (a.get(column), b.get(column)) {
            (Some(x), Some(y)) => {
                let ord = compare_cells(x, y);
                if ascending { ord } else { ord.reverse() }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }
    out
}

/// Whether `record` falls inside the inclusive range of `desc`; text columns never exclude.
fn in_range(record: &Record, desc: &ColumnDescriptor, (min, max): (f64, f64)) -> bool {
    let value = match desc.kind {
        ColumnKind::Numeric => record.number(&desc.name),
        ColumnKind::Date => record.year(&desc.name).map(f64::from),
        ColumnKind::Text => return true,
    };
    value.is_some_and(|v| v >= min && v <= max)
}

/// Numbers numerically, dates and text lexicographically; numbers before strings.
fn compare_cells(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Number(x), CellValue::Number(y)) => x.total_cmp(y),
        (CellValue::Number(_), _) => Ordering::Less,
        (_, CellValue::Number(_)) => Ordering::Greater,
        (CellValue::Date(x) | CellValue::Text(x), CellValue::Date(y) | CellValue::Text(y)) => x.cmp(y),
    }
}
