use std::collections::BTreeMap;

use super::sort::SortState;

/// Key carrying the sort column in serialized parameters.
pub const SORT_FIELD_KEY: &str = "sort_field";
/// Key carrying the sort direction in serialized parameters.
pub const ASCENDING_KEY: &str = "ascending";

/// Inclusive per-column bounds the user has set. Only touched columns have entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RangeFilter {
    /// Column name to `(min, max)`.
    ranges: BTreeMap<String, (f64, f64)>,
}

impl RangeFilter {
    /// Set the range of `column`, replacing any previous one.
    pub fn set(&mut self, column: &str, min: f64, max: f64) {
        self.ranges.insert(column.to_string(), (min, max));
    }

    /// Drop the range of `column`. Returns whether an entry existed.
    pub fn remove(&mut self, column: &str) -> bool {
        self.ranges.remove(column).is_some()
    }

    /// Drop every range.
    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    /// Range of `column`, if touched.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<(f64, f64)> {
        self.ranges.get(column).copied()
    }

    /// Whether no column has a range.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Entries in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, (f64, f64))> {
        self.ranges.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Request descriptor: the union of the sort state and all range entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryParameters {
    /// Sort column and direction.
    sort: Option<(String, bool)>,
    /// Range entries by column.
    ranges: BTreeMap<String, (f64, f64)>,
}

impl QueryParameters {
    /// Whether neither a sort nor a range is present. Empty descriptors are never dispatched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sort.is_none() && self.ranges.is_empty()
    }

    /// Sort column and ascending flag.
    #[must_use]
    pub fn sort(&self) -> Option<(&str, bool)> {
        self.sort.as_ref().map(|(c, a)| (c.as_str(), *a))
    }

    /// Range entries in column order.
    pub fn ranges(&self) -> impl Iterator<Item = (&str, (f64, f64))> {
        self.ranges.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// What: Serialize to deterministic key/value pairs.
    ///
    /// Output:
    /// - `sort_field`/`ascending` when sorting, then `<column>_min`/`<column>_max` per range,
    ///   columns in lexical order.
    ///
    /// Details:
    /// - The same state always yields the same pairs, so requests are reproducible and
    ///   usable as cache keys.
    #[must_use]
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(2 + self.ranges.len() * 2);
        if let Some((column, ascending)) = &self.sort {
            out.push((SORT_FIELD_KEY.to_string(), column.clone()));
            out.push((ASCENDING_KEY.to_string(), ascending.to_string()));
        }
        for (column, (min, max)) in &self.ranges {
            out.push((format!("{column}_min"), min.to_string()));
            out.push((format!("{column}_max"), max.to_string()));
        }
        out
    }

    /// Pairs joined as a URL query string (without the leading `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        self.pairs()
            .into_iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// What: Merge the sort state and range filters into one descriptor.
///
/// Inputs:
/// - `sort`: Current sort state
/// - `filters`: Current range filters
///
/// Output:
/// - Descriptor holding the sort (if set) and every range entry; empty when both inputs are.
#[must_use]
pub fn compose(sort: &SortState, filters: &RangeFilter) -> QueryParameters {
    QueryParameters {
        sort: sort.column().map(|c| (c.to_string(), sort.ascending())),
        ranges: filters.iter().map(|(c, r)| (c.to_string(), r)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::sort::SortController;

    #[test]
    /// What: Empty sort and filters compose to an empty descriptor.
    fn compose_empty_inputs_yield_empty_descriptor() {
        let p = compose(&SortState::default(), &RangeFilter::default());
        assert!(p.is_empty());
        assert!(p.pairs().is_empty());
    }

    #[test]
    /// What: Sort and ranges serialize deterministically with per-column keys.
    ///
    /// Inputs:
    /// - Sort on `revenue` descending; ranges on `revenue` and `date`
    ///
    /// Output:
    /// - `sort_field`, `ascending`, then `date_*` before `revenue_*`
    fn compose_union_is_deterministic() {
        let mut sort = SortController::default();
        sort.select("revenue");
        sort.select("revenue");
        let mut f = RangeFilter::default();
        f.set("revenue", 150.0, 250.0);
        f.set("date", 2020.0, 2021.0);
        let p = compose(sort.state(), &f);
        assert_eq!(
            p.to_query_string(),
            "sort_field=revenue&ascending=false&date_min=2020&date_max=2021&revenue_min=150&revenue_max=250"
        );
        assert_eq!(p, compose(sort.state(), &f));
    }

    #[test]
    /// What: Re-setting a column replaces its range instead of duplicating it.
    fn range_filter_set_replaces() {
        let mut f = RangeFilter::default();
        f.set("eps", 1.0, 2.0);
        f.set("eps", 1.5, 3.0);
        let p = compose(&SortState::default(), &f);
        assert_eq!(p.ranges().count(), 1);
        assert_eq!(p.pairs().len(), 2);
        assert_eq!(f.get("eps"), Some((1.5, 3.0)));
    }
}
