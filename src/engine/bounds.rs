use std::collections::BTreeMap;

use crate::state::{ColumnDescriptor, ColumnKind, Record};

/// Inclusive `[min, max]` bounds of one column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    /// Smallest value (or year).
    pub min: f64,
    /// Largest value (or year).
    pub max: f64,
}

impl Bounds {
    /// Bounds of an empty baseline.
    pub const ZERO: Self = Self { min: 0.0, max: 0.0 };

    /// Clamp `value` into the bounds.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Width of the bounds.
    #[must_use]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

/// What: Compute the `[min, max]` bounds of `column` over a baseline.
///
/// Inputs:
/// - `baseline`: The baseline dataset
/// - `column`: Column descriptor; the kind selects value or year extraction
///
/// Output:
/// - Bounds over numeric coercion (numeric columns) or calendar years (date columns).
///   `Bounds::ZERO` when no record yields a value, including the empty baseline.
///
/// Details:
/// - Values that fail coercion are skipped rather than poisoning the result.
/// - Text columns have no meaningful bounds and yield `Bounds::ZERO`.
#[must_use]
pub fn compute_bounds(baseline: &[Record], column: &ColumnDescriptor) -> Bounds {
    let values = baseline.iter().filter_map(|r| match column.kind {
        ColumnKind::Numeric => r.number(&column.name),
        ColumnKind::Date => r.year(&column.name).map(f64::from),
        ColumnKind::Text => None,
    });
    let mut acc: Option<Bounds> = None;
    for v in values {
        acc = Some(match acc {
            None => Bounds { min: v, max: v },
            Some(b) => Bounds {
                min: b.min.min(v),
                max: b.max.max(v),
            },
        });
    }
    acc.unwrap_or(Bounds::ZERO)
}

/// Per-column bounds cached for the lifetime of one baseline load.
#[derive(Clone, Debug, Default)]
pub struct RangeTracker {
    /// Descriptor and bounds for every rangeable column of the baseline.
    columns: BTreeMap<String, (ColumnDescriptor, Bounds)>,
}

impl RangeTracker {
    /// What: Recompute bounds for every rangeable column found in `baseline`.
    ///
    /// Inputs:
    /// - `baseline`: Freshly loaded baseline dataset
    /// - `extra`: Column names to track even if absent from the first records (e.g. table columns)
    ///
    /// Details:
    /// - Only called when a baseline lands; query results never reach this method.
    pub fn rebuild(&mut self, baseline: &[Record], extra: &[String]) {
        self.columns.clear();
        let mut names: Vec<&str> = baseline.iter().flat_map(Record::columns).collect();
        names.extend(extra.iter().map(String::as_str));
        names.sort_unstable();
        names.dedup();
        for name in names {
            let desc = ColumnDescriptor::resolve(name, baseline);
            if desc.kind.is_rangeable() {
                let bounds = compute_bounds(baseline, &desc);
                self.columns.insert(name.to_string(), (desc, bounds));
            }
        }
        tracing::debug!(columns = self.columns.len(), "range bounds rebuilt");
    }

    /// Forget all bounds.
    pub fn clear(&mut self) {
        self.columns.clear();
    }

    /// Cached bounds of `column`, if it is rangeable.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<Bounds> {
        self.columns.get(column).map(|(_, b)| *b)
    }

    /// Cached descriptor of `column`, if it is rangeable.
    #[must_use]
    pub fn descriptor(&self, column: &str) -> Option<&ColumnDescriptor> {
        self.columns.get(column).map(|(d, _)| d)
    }
}
