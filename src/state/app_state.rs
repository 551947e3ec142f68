//! Central TUI state mutated by the event handlers and read by the UI.

use ratatui::widgets::TableState;

use crate::chart::Legend;
use crate::config::Settings;
use crate::engine::{Applied, BaselineRequest, LoadState, QueryRequest, RequestId, TableEngine};
use crate::sources::DataError;
use crate::state::{ChartMode, ColumnKind, CompanyProfile, Record};

/// Number of slider steps across a numeric column's bounds.
pub const NUMERIC_STEPS: f64 = 20.0;

/// Frames of the loading spinner.
pub const SPINNER: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Which end of a range filter a key moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeEnd {
    /// Lower bound.
    Min,
    /// Upper bound.
    Max,
}

/// Keyboard focus.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Table navigation and filter keys.
    #[default]
    Browse,
    /// Typing a new symbol; holds the text so far.
    EditSymbol(String),
}

/// Application state for one session.
#[derive(Debug)]
pub struct AppState {
    /// Table state engine.
    pub engine: TableEngine,
    /// Table columns in display order.
    pub columns: Vec<String>,
    /// Index into `columns` of the column keys act on.
    pub selected_column: usize,
    /// Row scroll state of the table widget.
    pub table_state: TableState,
    /// Symbol as entered by the user.
    pub symbol: String,
    /// Keyboard focus.
    pub input: InputMode,
    /// Profile of the current company.
    pub profile: Option<CompanyProfile>,
    /// Chart metrics and their visibility.
    pub legend: Legend,
    /// Chart presentation mode.
    pub chart_mode: ChartMode,
    /// Redraw tick counter, drives the spinner.
    pub tick: u64,
}

impl AppState {
    /// What: Build the initial state from settings.
    ///
    /// Inputs:
    /// - `settings`: Columns, chart metrics, chart mode and default symbol
    /// - `symbol`: Symbol to show first, if given on the command line
    #[must_use]
    pub fn new(settings: &Settings, symbol: Option<&str>) -> Self {
        Self {
            engine: TableEngine::with_columns(&settings.columns),
            columns: settings.columns.clone(),
            selected_column: 0,
            table_state: TableState::default(),
            symbol: symbol.unwrap_or(&settings.default_symbol).trim().to_string(),
            input: InputMode::Browse,
            profile: None,
            legend: Legend::new(settings.chart_metrics.clone()),
            chart_mode: settings.chart_mode,
            tick: 0,
        }
    }

    /// What: Start loading `symbol`.
    ///
    /// Output:
    /// - Request for the worker; the profile of the previous symbol is dropped.
    pub fn begin_load(&mut self, symbol: &str) -> BaselineRequest {
        self.symbol = symbol.trim().to_string();
        self.profile = None;
        self.table_state = TableState::default();
        self.engine.begin_baseline(&self.symbol)
    }

    /// What: Apply the joined baseline/profile response of a load.
    ///
    /// Details:
    /// - The profile is kept only when the baseline response is current; a missing profile is
    ///   not an error on its own.
    pub fn apply_company(
        &mut self,
        id: RequestId,
        rows: Result<Vec<Record>, DataError>,
        profile: Result<CompanyProfile, DataError>,
    ) -> Applied {
        let applied = self.engine.apply_baseline(id, rows);
        if applied == Applied::Applied {
            self.profile = match profile {
                Ok(p) => Some(p),
                Err(e) => {
                    tracing::debug!(symbol = %self.symbol, error = %e, "profile unavailable");
                    None
                }
            };
        }
        applied
    }

    /// Apply a query response and move the row highlight back to the top.
    pub fn apply_query(&mut self, id: RequestId, rows: Result<Vec<Record>, DataError>) -> Applied {
        let applied = self.engine.apply_query(id, rows);
        if applied == Applied::Applied {
            self.table_state.select(None);
            *self.table_state.offset_mut() = 0;
        }
        applied
    }

    /// What: Status bar notice derived from the engine at draw time.
    ///
    /// Output:
    /// - `Load failed: …` while the baseline load is failed, `Query failed: …` while the view is in
    ///   its error phase, `None` otherwise.
    #[must_use]
    pub fn status_line(&self) -> Option<String> {
        let notice = self.engine.notice()?;
        let prefix = if matches!(self.engine.load_state(), LoadState::Failed(_)) {
            "Load failed"
        } else {
            "Query failed"
        };
        Some(format!("{prefix}: {notice}"))
    }

    /// Name of the selected column.
    #[must_use]
    pub fn selected_column_name(&self) -> Option<&str> {
        self.columns.get(self.selected_column).map(String::as_str)
    }

    /// Move the column selection by `delta`, wrapping around.
    pub fn move_column(&mut self, delta: isize) {
        let len = self.columns.len();
        if len == 0 {
            return;
        }
        let len = isize::try_from(len).unwrap_or(isize::MAX);
        let current = isize::try_from(self.selected_column).unwrap_or(0);
        let next = (current + delta).rem_euclid(len);
        self.selected_column = usize::try_from(next).unwrap_or(0);
    }

    /// Toggle the sort on the selected column.
    pub fn toggle_selected_sort(&mut self) -> Option<QueryRequest> {
        let column = self.selected_column_name()?.to_string();
        self.engine.toggle_sort(&column)
    }

    /// Clear the selected column's range filter.
    pub fn clear_selected_range(&mut self) -> Option<QueryRequest> {
        let column = self.selected_column_name()?.to_string();
        self.engine.clear_range(&column)
    }

    /// What: Slider step of `column`.
    ///
    /// Output:
    /// - One year for date columns, a twentieth of the bounds for numeric columns; `None` for
    ///   text columns or when the bounds are a single point.
    #[must_use]
    pub fn filter_step(&self, column: &str) -> Option<f64> {
        let bounds = self.engine.bounds(column)?;
        let step = match self.engine.column_kind(column) {
            ColumnKind::Date => 1.0,
            ColumnKind::Numeric => bounds.span() / NUMERIC_STEPS,
            ColumnKind::Text => return None,
        };
        (step > 0.0 && bounds.span() > 0.0).then_some(step)
    }

    /// What: Move one end of the selected column's range by `steps` slider steps.
    ///
    /// Inputs:
    /// - `end`: Which end moves
    /// - `steps`: Signed step count
    ///
    /// Output:
    /// - Query to dispatch, or `None` when nothing changed.
    ///
    /// Details:
    /// - An untouched column starts from its full bounds; the moved end stops at the other end.
    pub fn nudge_range(&mut self, end: RangeEnd, steps: i32) -> Option<QueryRequest> {
        let column = self.selected_column_name()?.to_string();
        let step = self.filter_step(&column)?;
        let bounds = self.engine.bounds(&column)?;
        let (min, max) = self.engine.range(&column).unwrap_or((bounds.min, bounds.max));
        let delta = f64::from(steps) * step;
        let (min, max) = match end {
            RangeEnd::Min => ((min + delta).min(max), max),
            RangeEnd::Max => (min, (max + delta).max(min)),
        };
        self.engine.set_range(&column, min, max)
    }

    /// Cycle the chart mode.
    pub const fn cycle_chart_mode(&mut self) {
        self.chart_mode = self.chart_mode.next();
    }

    /// Current spinner frame.
    #[must_use]
    pub fn spinner(&self) -> char {
        let len = SPINNER.len() as u64;
        usize::try_from(self.tick % len)
            .ok()
            .and_then(|i| SPINNER.get(i))
            .copied()
            .unwrap_or('*')
    }
}
