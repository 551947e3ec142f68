//! Data model types and the TUI application state.

pub mod app_state;
pub mod types;

pub use app_state::{AppState, InputMode, RangeEnd};
pub use types::{
    CellValue, ChartMode, ColumnDescriptor, ColumnKind, CompanyProfile, DEFAULT_CHART_METRICS,
    DEFAULT_TABLE_COLUMNS, INCOME_STATEMENT_FIELDS, Record,
};
