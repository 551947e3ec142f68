//! Fixture-backed data service used by `--fixture`, tests and the headless runtime.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Deserialize;

use super::{DataError, DataService, Result, evaluate};
use crate::engine::QueryParameters;
use crate::state::{CompanyProfile, Record};
use crate::util::ticker_of;

/// Data held for one symbol.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct CompanyData {
    /// Profile, if known.
    pub profile: Option<CompanyProfile>,
    /// Income statements in delivery order.
    pub income: Vec<Record>,
}

/// In-memory `DataService`: statements keyed by bare ticker, profiles by full symbol.
#[derive(Debug, Default)]
pub struct MemoryDataService {
    /// Ticker to income statements.
    income: HashMap<String, Vec<Record>>,
    /// Upper-cased symbol, exchange suffix included, to profile.
    profiles: HashMap<String, CompanyProfile>,
    /// Delay applied before every response.
    latency: Duration,
    /// When set, every call fails with `Network`.
    offline: AtomicBool,
}

impl MemoryDataService {
    /// Empty service: every symbol is unknown.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// What: Load a fixture file.
    ///
    /// Inputs:
    /// - `path`: JSON object mapping symbols to `{ "profile": {...}, "income": [...] }`
    ///
    /// Output:
    /// - The service, or an error when the file cannot be read or parsed.
    ///
    /// # Errors
    /// - I/O failures reading the file
    /// - JSON shape mismatches
    pub fn from_fixture(path: &Path) -> std::result::Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let raw = std::fs::read_to_string(path)?;
        let service = Self::from_json(&raw)?;
        tracing::info!(path = %path.display(), tickers = service.income.len(), "fixture loaded");
        Ok(service)
    }

    /// What: Parse a fixture document.
    ///
    /// Details:
    /// - Listings sharing a ticker (`AAPL`, `AAPL.NE`) share statements: the first non-empty list
    ///   in symbol order is kept. Each listing keeps its own profile.
    ///
    /// # Errors
    /// - `Decode` when the JSON does not match the fixture shape
    pub fn from_json(raw: &str) -> Result<Self> {
        let map: BTreeMap<String, CompanyData> = serde_json::from_str(raw)?;
        let mut service = Self::new();
        for (symbol, data) in map {
            service.insert(&symbol, data.income, data.profile);
        }
        Ok(service)
    }

    /// Add the data of `symbol`; statements already held for its ticker are replaced only when empty.
    #[must_use]
    pub fn with_company(mut self, symbol: &str, income: Vec<Record>, profile: Option<CompanyProfile>) -> Self {
        self.insert(symbol, income, profile);
        self
    }

    /// Store statements under the ticker and the profile under the full symbol.
    fn insert(&mut self, symbol: &str, income: Vec<Record>, profile: Option<CompanyProfile>) {
        let rows = self.income.entry(ticker_of(symbol)).or_default();
        if rows.is_empty() {
            *rows = income;
        }
        if let Some(p) = profile {
            self.profiles.insert(symbol.trim().to_ascii_uppercase(), p);
        }
    }

    /// Delay every response by `latency`.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make every subsequent call fail with a network error (or succeed again).
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    /// Wait out the latency and fail when offline.
    async fn respond(&self) -> Result<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.offline.load(Ordering::Relaxed) {
            return Err(DataError::Network("service offline".to_string()));
        }
        Ok(())
    }

    /// Statements of `symbol`'s ticker.
    async fn statements(&self, symbol: &str) -> Result<&[Record]> {
        self.respond().await?;
        self.income
            .get(&ticker_of(symbol))
            .map(Vec::as_slice)
            .ok_or_else(|| DataError::NotFound(symbol.to_string()))
    }
}

impl DataService for MemoryDataService {
    async fn fetch_baseline(&self, symbol: &str) -> Result<Vec<Record>> {
        let rows = self.statements(symbol).await?;
        if rows.is_empty() {
            return Err(DataError::NotFound(symbol.to_string()));
        }
        Ok(rows.to_vec())
    }

    async fn fetch_query(&self, symbol: &str, params: &QueryParameters) -> Result<Vec<Record>> {
        let rows = evaluate(self.statements(symbol).await?, params);
        if rows.is_empty() {
            return Err(DataError::EmptyResult);
        }
        Ok(rows)
    }

    /// The listing's own profile; the bare ticker's only when the listing has none.
    async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile> {
        self.respond().await?;
        let full = symbol.trim().to_ascii_uppercase();
        self.profiles
            .get(&full)
            .or_else(|| self.profiles.get(&ticker_of(symbol)))
            .cloned()
            .ok_or_else(|| DataError::NotFound(symbol.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{RangeFilter, SortState, compose};

    const FIXTURE: &str = r#"{
        "AAPL.NE": {
            "profile": { "symbol": "AAPL.NE", "companyName": "Apple Inc." },
            "income": [
                { "date": "2021-01-01", "revenue": 200 },
                { "date": "2020-01-01", "revenue": 100 }
            ]
        }
    }"#;

    #[tokio::test]
    /// What: Fixture symbols resolve with or without their exchange suffix.
    async fn memory_lookup_by_ticker() {
        let svc = MemoryDataService::from_json(FIXTURE).unwrap();
        assert_eq!(svc.fetch_baseline("aapl").await.unwrap().len(), 2);
        assert_eq!(svc.fetch_profile("AAPL.NE").await.unwrap().company_name, "Apple Inc.");
        assert!(matches!(svc.fetch_baseline("ZZZZ").await, Err(DataError::NotFound(_))));
    }

    #[tokio::test]
    /// What: Two listings of one ticker keep their own profiles and share statements.
    ///
    /// Inputs:
    /// - `AAPL` and `AAPL.NE` entries with different company names; only `AAPL` carries statements
    ///
    /// Output:
    /// - Each symbol returns its own profile; `AAPL.NE` falls back to the `AAPL` statements.
    ///
    /// Details:
    /// - `MSFT.NE` has no listing profile and falls back to the bare `MSFT` profile.
    async fn memory_listings_keep_own_profile() {
        let svc = MemoryDataService::from_json(
            r#"{
                "AAPL.NE": {
                    "profile": { "symbol": "AAPL.NE", "companyName": "Apple CDR" }
                },
                "AAPL": {
                    "profile": { "symbol": "AAPL", "companyName": "Apple Inc." },
                    "income": [ { "date": "2021-01-01", "revenue": 200 } ]
                },
                "MSFT": {
                    "profile": { "symbol": "MSFT", "companyName": "Microsoft" }
                }
            }"#,
        )
        .unwrap();
        assert_eq!(svc.fetch_profile("aapl.ne").await.unwrap().company_name, "Apple CDR");
        assert_eq!(svc.fetch_profile("AAPL").await.unwrap().company_name, "Apple Inc.");
        assert_eq!(svc.fetch_baseline("AAPL.NE").await.unwrap().len(), 1);
        assert_eq!(svc.fetch_profile("MSFT.NE").await.unwrap().company_name, "Microsoft");
        assert!(matches!(svc.fetch_profile("GOOG").await, Err(DataError::NotFound(_))));
    }

    #[tokio::test]
    /// What: Queries with no matches report `EmptyResult`.
    async fn memory_query_empty_result() {
        let svc = MemoryDataService::from_json(FIXTURE).unwrap();
        let mut f = RangeFilter::default();
        f.set("revenue", 500.0, 600.0);
        let res = svc.fetch_query("AAPL", &compose(&SortState::default(), &f)).await;
        assert_eq!(res, Err(DataError::EmptyResult));
    }

    #[tokio::test]
    /// What: Offline mode fails every call with a network error.
    async fn memory_offline() {
        let svc = MemoryDataService::from_json(FIXTURE).unwrap();
        svc.set_offline(true);
        assert!(matches!(svc.fetch_baseline("AAPL").await, Err(DataError::Network(_))));
    }
}
