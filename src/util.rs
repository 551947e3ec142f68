//! Small formatting and parsing helpers shared across modules.

use chrono::{Datelike, NaiveDate};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::state::{CellValue, ColumnKind};

/// What: Parse the leading `YYYY-MM-DD` part of a date or datetime string.
///
/// Inputs:
/// - `s`: Raw string such as `2023-09-30` or `2023-11-02 18:04:43`
///
/// Output:
/// - `Some(NaiveDate)` when the first ten characters form a valid date; `None` otherwise.
#[must_use]
pub fn parse_date_prefix(s: &str) -> Option<NaiveDate> {
    let head = s.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

/// What: Extract the calendar year from a date string or a bare year.
///
/// Inputs:
/// - `s`: `YYYY-MM-DD[...]` or `YYYY`
///
/// Output:
/// - The year, or `None` when neither form matches.
#[must_use]
pub fn year_of(s: &str) -> Option<i32> {
    if let Some(d) = parse_date_prefix(s) {
        return Some(d.year());
    }
    let t = s.trim();
    if t.len() == 4 && t.bytes().all(|b| b.is_ascii_digit()) {
        return t.parse().ok();
    }
    None
}

/// What: Strip an exchange suffix from a symbol.
///
/// Inputs:
/// - `symbol`: e.g. `AAPL.NE`
///
/// Output:
/// - The bare ticker (`AAPL`), trimmed and upper-cased.
#[must_use]
pub fn ticker_of(symbol: &str) -> String {
    symbol
        .trim()
        .split('.')
        .next()
        .unwrap_or_default()
        .to_ascii_uppercase()
}

/// What: Format a number with thousands separators.
///
/// Inputs:
/// - `n`: Value to format
///
/// Output:
/// - Integral values without decimals (`1,234,567`); fractional values with up to four
///   decimals, trailing zeros trimmed (`0.4331`, `-1.5`).
#[must_use]
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    let fixed = format!("{:.4}", n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if n < 0.0 && (grouped != "0" || !frac.is_empty()) {
        "-"
    } else {
        ""
    };
    if frac.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac}")
    }
}

/// Render a cell for the table; absent cells render as `-`.
#[must_use]
pub fn format_cell(cell: Option<&CellValue>) -> String {
    match cell {
        Some(CellValue::Number(n)) => format_number(*n),
        Some(CellValue::Date(s) | CellValue::Text(s)) => s.clone(),
        None => "-".to_string(),
    }
}

/// Format a bound for display: whole years for date columns, separated numbers otherwise.
#[must_use]
pub fn format_bound(value: f64, kind: ColumnKind) -> String {
    match kind {
        #[allow(clippy::cast_possible_truncation)]
        ColumnKind::Date => format!("{}", value.round() as i64),
        ColumnKind::Numeric | ColumnKind::Text => format_number(value),
    }
}

/// What: Turn a camelCase field name into a Title Case label.
///
/// Inputs:
/// - `name`: e.g. `netIncome`, `grossProfitRatio`
///
/// Output:
/// - `Net Income`, `Gross Profit Ratio`
///
/// Details:
/// - A space is inserted between a lowercase letter and the uppercase letter that follows it;
///   the first character is upper-cased.
#[must_use]
pub fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for (i, ch) in name.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else {
            if prev_lower && ch.is_ascii_uppercase() {
                out.push(' ');
            }
            out.push(ch);
        }
        prev_lower = ch.is_ascii_lowercase();
    }
    out
}

/// What: Truncate `s` to at most `width` terminal columns, appending `…` when cut.
#[must_use]
pub fn truncate_to_width(s: &str, width: usize) -> String {
    if UnicodeWidthStr::width(s) <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}
