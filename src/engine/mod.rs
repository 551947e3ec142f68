//! Table state engine: reconciles the baseline dataset, the latest query dataset and the
//! user's sort/range interactions into one displayed view.
//!
//! The engine never performs I/O. Operations that need the data service return a request
//! (`BaselineRequest`, `QueryRequest`) tagged with a fresh id; the caller dispatches it and
//! feeds the response back through `apply_baseline`/`apply_query`. Responses whose id is
//! no longer the latest are discarded.

mod bounds;
mod query;
mod reset;
mod sort;
mod view;

pub use bounds::{Bounds, RangeTracker, compute_bounds};
pub use query::{ASCENDING_KEY, QueryParameters, RangeFilter, SORT_FIELD_KEY, compose};
pub use sort::{SortController, SortState};
pub use view::{Applied, RequestId, RequestSeq, ViewPhase, ViewSelector};

use crate::sources::DataError;
use crate::state::{ColumnKind, Record};

/// A baseline load to dispatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaselineRequest {
    /// Id the response must carry.
    pub id: RequestId,
    /// Symbol to load.
    pub symbol: String,
}

/// A sort/filter query to dispatch.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryRequest {
    /// Id the response must carry.
    pub id: RequestId,
    /// Symbol of the current baseline.
    pub symbol: String,
    /// Composed sort and range parameters; never empty.
    pub params: QueryParameters,
}

/// Progress of the baseline load for the current symbol.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadState {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Baseline request in flight.
    Loading,
    /// Baseline set (possibly empty).
    Loaded,
    /// Baseline request failed.
    Failed(DataError),
}

/// Which empty-view message applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyState {
    /// The symbol has no data: suggest a known-good symbol.
    NotFound,
    /// The baseline has rows but the filters exclude all of them: suggest a reset.
    NoMatches,
}

impl EmptyState {
    /// Message shown in place of the table.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotFound => {
                "This company may not have data available. Try a different company symbol, for example: AAPL.NE or AGO.WA."
            }
            Self::NoMatches => "No income statements available. Press r to reset filters.",
        }
    }
}

/// The table state engine for one table.
#[derive(Debug, Default)]
pub struct TableEngine {
    /// Symbol of the current (or loading) baseline.
    symbol: Option<String>,
    /// Baseline dataset; replaced wholesale, never mutated.
    baseline: Vec<Record>,
    /// Columns tracked for bounds even when missing from the payload.
    tracked_columns: Vec<String>,
    /// Whether the baseline ever had a record.
    has_baseline_data: bool,
    /// Baseline load progress.
    load: LoadState,
    /// Baseline request ids.
    baseline_seq: RequestSeq,
    /// Per-column bounds of the baseline.
    bounds: RangeTracker,
    /// Sort state owner.
    sort: SortController,
    /// User-set ranges.
    filters: RangeFilter,
    /// Authoritative dataset selection.
    view: ViewSelector,
}

impl TableEngine {
    /// Engine that also tracks bounds for `columns` (typically the visible table columns).
    #[must_use]
    pub fn with_columns(columns: &[String]) -> Self {
        Self {
            tracked_columns: columns.to_vec(),
            ..Self::default()
        }
    }

    /// What: Start loading the baseline for `symbol`.
    ///
    /// Inputs:
    /// - `symbol`: Ticker entered by the user
    ///
    /// Output:
    /// - Request to dispatch; responses to any earlier baseline or query request become stale.
    ///
    /// Details:
    /// - Sort, filters, bounds and the previous baseline are dropped; the table shows nothing
    ///   until the new baseline lands.
    pub fn begin_baseline(&mut self, symbol: &str) -> BaselineRequest {
        let symbol = symbol.trim().to_ascii_uppercase();
        let id = self.baseline_seq.issue();
        self.symbol = Some(symbol.clone());
        self.baseline = Vec::new();
        self.has_baseline_data = false;
        self.bounds.clear();
        self.load = LoadState::Loading;
        self.filters.clear();
        self.sort.clear();
        self.view.reset();
        tracing::info!(symbol = %symbol, id, "baseline load started");
        BaselineRequest { id, symbol }
    }

    /// What: Apply a baseline response.
    ///
    /// Inputs:
    /// - `id`: Id of the request the response answers
    /// - `result`: Rows or failure
    ///
    /// Output:
    /// - `Applied::Stale` if a newer baseline was requested since; otherwise `Applied::Applied`.
    ///
    /// Details:
    /// - Success sets the baseline once and computes bounds for every rangeable column.
    /// - Zero rows, `NotFound` and `EmptyResult` all leave an empty baseline with
    ///   `has_baseline_data == false`; other failures record `LoadState::Failed`.
    pub fn apply_baseline(&mut self, id: RequestId, result: Result<Vec<Record>, DataError>) -> Applied {
        if !self.baseline_seq.settle(id) {
            tracing::debug!(id, "stale baseline response discarded");
            return Applied::Stale;
        }
        let symbol = self.symbol.clone().unwrap_or_default();
        match result {
            Ok(rows) => {
                tracing::info!(symbol = %symbol, rows = rows.len(), "baseline loaded");
                self.has_baseline_data = !rows.is_empty();
                self.bounds.rebuild(&rows, &self.tracked_columns);
                self.baseline = rows;
                self.load = LoadState::Loaded;
            }
            Err(DataError::NotFound(_) | DataError::EmptyResult) => {
                tracing::info!(symbol = %symbol, "no data for symbol");
                self.load = LoadState::Loaded;
            }
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "baseline load failed");
                self.load = LoadState::Failed(e);
            }
        }
        Applied::Applied
    }

    /// What: Toggle the sort on `column`.
    ///
    /// Output:
    /// - Query to dispatch, or `None` when no baseline data is loaded.
    pub fn toggle_sort(&mut self, column: &str) -> Option<QueryRequest> {
        if !self.accepts_interaction() {
            return None;
        }
        self.sort.select(column);
        self.dispatch()
    }

    /// What: Set the range filter of `column`.
    ///
    /// Inputs:
    /// - `column`: Numeric or date column
    /// - `min`, `max`: Inclusive bounds (years for date columns); swapped if reversed
    ///
    /// Output:
    /// - Query to dispatch; `None` if the column is not rangeable, no baseline is loaded, or the
    ///   range did not change.
    ///
    /// Details:
    /// - Values are clamped to the baseline bounds of the column.
    pub fn set_range(&mut self, column: &str, min: f64, max: f64) -> Option<QueryRequest> {
        if !self.accepts_interaction() || min.is_nan() || max.is_nan() {
            return None;
        }
        let bounds = self.bounds.get(column)?;
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        let range = (bounds.clamp(lo), bounds.clamp(hi));
        if self.filters.get(column) == Some(range) {
            return None;
        }
        self.filters.set(column, range.0, range.1);
        self.dispatch()
    }

    /// What: Remove the range filter of `column`.
    ///
    /// Output:
    /// - Query to dispatch when a sort or other ranges remain active; `None` otherwise (the view
    ///   is then back at `Baseline`, or nothing changed).
    pub fn clear_range(&mut self, column: &str) -> Option<QueryRequest> {
        if !self.filters.remove(column) {
            return None;
        }
        self.dispatch()
    }

    /// What: Apply a query response under last-request-wins.
    ///
    /// Output:
    /// - `Applied::Stale` when superseded by a newer query, a reset, or a new baseline.
    pub fn apply_query(&mut self, id: RequestId, result: Result<Vec<Record>, DataError>) -> Applied {
        self.view.resolve(id, result)
    }

    /// Issue a query for the current state, or fall back to the baseline view when inactive.
    fn dispatch(&mut self) -> Option<QueryRequest> {
        if !self.is_query_active() {
            self.view.reset();
            return None;
        }
        let params = compose(self.sort.state(), &self.filters);
        let id = self.view.begin_query();
        let symbol = self.symbol.clone().unwrap_or_default();
        tracing::info!(symbol = %symbol, id, query = %params.to_query_string(), "query dispatched");
        Some(QueryRequest { id, symbol, params })
    }

    /// Sort and filter changes only make sense against a loaded, non-empty baseline.
    fn accepts_interaction(&self) -> bool {
        self.load == LoadState::Loaded && self.has_baseline_data
    }

    /// Whether a sort column is set or any range filter exists.
    #[must_use]
    pub fn is_query_active(&self) -> bool {
        self.sort.state().is_active() || !self.filters.is_empty()
    }

    /// The authoritative dataset; empty rather than absent.
    #[must_use]
    pub fn displayed(&self) -> &[Record] {
        self.view.queried().unwrap_or(&self.baseline)
    }

    /// The baseline dataset.
    #[must_use]
    pub fn baseline(&self) -> &[Record] {
        &self.baseline
    }

    /// Current view phase.
    #[must_use]
    pub const fn phase(&self) -> ViewPhase {
        self.view.phase()
    }

    /// Baseline load progress.
    #[must_use]
    pub const fn load_state(&self) -> &LoadState {
        &self.load
    }

    /// Whether a baseline or query response is awaited.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.load, LoadState::Loading) || self.view.is_querying()
    }

    /// Whether the baseline had at least one record.
    #[must_use]
    pub const fn has_baseline_data(&self) -> bool {
        self.has_baseline_data
    }

    /// Symbol of the current baseline.
    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    /// Current sort state.
    #[must_use]
    pub const fn sort(&self) -> &SortState {
        self.sort.state()
    }

    /// Active range of `column`.
    #[must_use]
    pub fn range(&self, column: &str) -> Option<(f64, f64)> {
        self.filters.get(column)
    }

    /// Baseline bounds of `column`, if rangeable.
    #[must_use]
    pub fn bounds(&self, column: &str) -> Option<Bounds> {
        self.bounds.get(column)
    }

    /// Kind of `column` as resolved against the baseline.
    #[must_use]
    pub fn column_kind(&self, column: &str) -> ColumnKind {
        self.bounds.descriptor(column).map_or_else(
            || crate::state::ColumnDescriptor::resolve(column, &self.baseline).kind,
            |d| d.kind,
        )
    }

    /// Non-blocking notice for the latest failure: a query error or a failed baseline load.
    #[must_use]
    pub fn notice(&self) -> Option<&DataError> {
        match &self.load {
            LoadState::Failed(e) => Some(e),
            _ => self.view.error(),
        }
    }

    /// What: Choose the empty-view message.
    ///
    /// Output:
    /// - `None` while loading or when rows are displayed; `NoMatches` when the baseline had data
    ///   but the view is empty; `NotFound` when the baseline never had data.
    #[must_use]
    pub fn empty_state(&self) -> Option<EmptyState> {
        if !self.displayed().is_empty() || self.is_loading() || self.load == LoadState::Idle {
            return None;
        }
        Some(if self.has_baseline_data {
            EmptyState::NoMatches
        } else {
            EmptyState::NotFound
        })
    }

    /// What: Stable identity for each displayed row.
    ///
    /// Output:
    /// - One key per displayed row: the `date` value, or `date|period` for every row when the
    ///   dataset holds duplicate dates. Rows without a date fall back to their position.
    #[must_use]
    pub fn row_keys(&self) -> Vec<String> {
        let rows = self.displayed();
        let dates: Vec<Option<&str>> = rows.iter().map(|r| r.text("date")).collect();
        let mut seen = std::collections::HashSet::new();
        let duplicated = dates.iter().flatten().any(|d| !seen.insert(*d));
        rows.iter()
            .zip(dates)
            .enumerate()
            .map(|(i, (r, date))| match (date, duplicated) {
                (Some(d), false) => d.to_string(),
                (Some(d), true) => format!("{d}|{}", r.text("period").unwrap_or("")),
                (None, _) => format!("#{i}"),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CellValue;

    fn rec(revenue: f64, date: &str) -> Record {
        Record::from_iter([
            ("revenue", CellValue::Number(revenue)),
            ("date", CellValue::Date(date.to_string())),
            ("period", CellValue::Text("FY".to_string())),
        ])
    }

    fn loaded(rows: Vec<Record>) -> TableEngine {
        let mut e = TableEngine::default();
        let req = e.begin_baseline("aapl");
        assert_eq!(req.symbol, "AAPL");
        assert_eq!(e.apply_baseline(req.id, Ok(rows)), Applied::Applied);
        e
    }

    #[test]
    /// What: A baseline load sets data, bounds and the data flag.
    fn engine_baseline_sets_bounds() {
        let e = loaded(vec![rec(100.0, "2020-01-01"), rec(200.0, "2021-01-01")]);
        assert!(e.has_baseline_data());
        assert_eq!(e.phase(), ViewPhase::Baseline);
        assert_eq!(e.bounds("revenue"), Some(Bounds { min: 100.0, max: 200.0 }));
        assert_eq!(e.bounds("date"), Some(Bounds { min: 2020.0, max: 2021.0 }));
        assert_eq!(e.displayed().len(), 2);
        assert_eq!(e.empty_state(), None);
    }

    #[test]
    /// What: `is_query_active` tracks sort OR filters across a sequence of interactions.
    ///
    /// Inputs:
    /// - Sort, range, clear sort via reset, range then clear range
    ///
    /// Output:
    /// - Flag equals `sort set || filters non-empty` after every step
    fn engine_query_active_is_sort_or_filters() {
        let mut e = loaded(vec![rec(100.0, "2020-01-01"), rec(200.0, "2021-01-01")]);
        let check = |e: &TableEngine| {
            let expected = e.sort().is_active() || e.range("revenue").is_some() || e.range("date").is_some();
            assert_eq!(e.is_query_active(), expected);
        };
        check(&e);
        assert!(e.toggle_sort("revenue").is_some());
        check(&e);
        assert!(e.set_range("revenue", 120.0, 180.0).is_some());
        check(&e);
        e.reset();
        check(&e);
        assert!(e.set_range("date", 2021.0, 2021.0).is_some());
        check(&e);
        assert!(e.clear_range("date").is_none());
        check(&e);
        assert_eq!(e.phase(), ViewPhase::Baseline);
    }

    #[test]
    /// What: Ranges are ordered, clamped and not re-issued when unchanged.
    fn engine_set_range_clamps_and_dedups() {
        let mut e = loaded(vec![rec(100.0, "2020-01-01"), rec(200.0, "2021-01-01")]);
        let q = e.set_range("revenue", 500.0, 50.0).unwrap();
        assert_eq!(e.range("revenue"), Some((100.0, 200.0)));
        assert_eq!(q.params.ranges().next(), Some(("revenue", (100.0, 200.0))));
        assert!(e.set_range("revenue", 100.0, 200.0).is_none());
        assert!(e.set_range("period", 0.0, 1.0).is_none());
    }

    #[test]
    /// What: Interactions before the baseline lands are ignored.
    fn engine_ignores_interaction_while_loading() {
        let mut e = TableEngine::default();
        e.begin_baseline("MSFT");
        assert!(e.toggle_sort("revenue").is_none());
        assert!(!e.is_query_active());
        assert!(e.is_loading());
        assert_eq!(e.empty_state(), None);
    }

    #[test]
    /// What: A newer symbol load makes the older baseline and pending queries stale.
    fn engine_symbol_change_discards_stale_responses() {
        let mut e = loaded(vec![rec(1.0, "2020-01-01")]);
        let q = e.toggle_sort("revenue").unwrap();
        let a = e.begin_baseline("AAA");
        let b = e.begin_baseline("BBB");
        assert_eq!(e.apply_query(q.id, Ok(vec![rec(9.0, "2020-01-01")])), Applied::Stale);
        assert_eq!(e.apply_baseline(a.id, Ok(vec![rec(2.0, "2020-01-01")])), Applied::Stale);
        assert_eq!(e.apply_baseline(b.id, Ok(vec![rec(3.0, "2020-01-01")])), Applied::Applied);
        assert_eq!(e.symbol(), Some("BBB"));
        assert_eq!(e.displayed()[0].number("revenue"), Some(3.0));
    }

    #[test]
    /// What: Bounds stay those of the baseline after query results arrive.
    fn engine_query_results_do_not_touch_bounds() {
        let mut e = loaded(vec![rec(100.0, "2020-01-01"), rec(200.0, "2021-01-01")]);
        let q = e.set_range("revenue", 150.0, 200.0).unwrap();
        e.apply_query(q.id, Ok(vec![rec(999.0, "2030-01-01")]));
        assert_eq!(e.bounds("revenue"), Some(Bounds { min: 100.0, max: 200.0 }));
        assert_eq!(e.bounds("date"), Some(Bounds { min: 2020.0, max: 2021.0 }));
    }

    #[test]
    /// What: Network failure on the baseline is surfaced, and the view reads as not found.
    fn engine_baseline_network_failure() {
        let mut e = TableEngine::default();
        let req = e.begin_baseline("AAPL");
        e.apply_baseline(req.id, Err(DataError::Network("connection refused".into())));
        assert!(matches!(e.load_state(), LoadState::Failed(_)));
        assert!(e.notice().is_some());
        assert_eq!(e.empty_state(), Some(EmptyState::NotFound));
    }

    #[test]
    /// What: Row keys use the date, switching to date+period on duplicates.
    fn engine_row_keys() {
        let e = loaded(vec![rec(1.0, "2020-01-01"), rec(2.0, "2021-01-01")]);
        assert_eq!(e.row_keys(), vec!["2020-01-01", "2021-01-01"]);
        let dup = loaded(vec![rec(1.0, "2020-01-01"), rec(2.0, "2020-01-01")]);
        assert_eq!(dup.row_keys(), vec!["2020-01-01|FY", "2020-01-01|FY"]);
    }
}
