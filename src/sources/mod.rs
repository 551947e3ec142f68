//! Data retrieval: the `DataService` seam plus HTTP and in-memory implementations.

use std::fmt;
use std::future::Future;

use crate::engine::QueryParameters;
use crate::state::{CompanyProfile, Record};

mod evaluate;
mod http;
mod memory;

pub use evaluate::evaluate;
pub use http::HttpDataService;
pub use memory::MemoryDataService;

/// Result type alias for data service calls.
pub type Result<T> = std::result::Result<T, DataError>;

/// What: Failure kinds reported by data services.
///
/// Inputs: Produced by service implementations.
///
/// Output: Implements `Display`/`Error`; cloneable so the engine can keep it as a notice.
///
/// Details:
/// - `NotFound` and `EmptyResult` are expected outcomes, not faults: the table explains them
///   instead of reporting an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataError {
    /// The symbol has no data (HTTP 404 or an empty payload).
    NotFound(String),
    /// Transport or server failure.
    Network(String),
    /// A query matched no rows.
    EmptyResult,
    /// The payload could not be decoded.
    Decode(String),
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(symbol) => write!(f, "no data found for {symbol}"),
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::EmptyResult => write!(f, "no rows match the current filters"),
            Self::Decode(msg) => write!(f, "invalid response: {msg}"),
        }
    }
}

impl std::error::Error for DataError {}

impl From<reqwest::Error> for DataError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Decode(value.to_string())
        } else {
            Self::Network(value.to_string())
        }
    }
}

impl From<serde_json::Error> for DataError {
    fn from(value: serde_json::Error) -> Self {
        Self::Decode(value.to_string())
    }
}

/// What: Source of income statements and company profiles.
///
/// Details:
/// - Calls may complete in any order; callers tag requests with ids and drop stale responses.
/// - Futures are `Send` so workers can run them on spawned tasks.
pub trait DataService: Send + Sync + 'static {
    /// Unfiltered, unsorted income statements for `symbol`.
    ///
    /// # Errors
    /// - `NotFound` when the symbol has no statements
    /// - `Network`/`Decode` on transport or payload failures
    fn fetch_baseline(&self, symbol: &str) -> impl Future<Output = Result<Vec<Record>>> + Send;

    /// Statements for `symbol` narrowed and ordered by `params`.
    ///
    /// # Errors
    /// - `EmptyResult` when nothing matches
    /// - `Network`/`Decode` on transport or payload failures
    fn fetch_query(
        &self,
        symbol: &str,
        params: &QueryParameters,
    ) -> impl Future<Output = Result<Vec<Record>>> + Send;

    /// Company profile for `symbol`.
    ///
    /// # Errors
    /// - `NotFound` when the symbol is unknown
    /// - `Network`/`Decode` on transport or payload failures
    fn fetch_profile(&self, symbol: &str) -> impl Future<Output = Result<CompanyProfile>> + Send;
}
