//! Financial data API client.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::Duration;

use lru::LruCache;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;

use super::{DataError, DataService, Result, evaluate};
use crate::config::Settings;
use crate::engine::QueryParameters;
use crate::state::{CompanyProfile, Record};
use crate::util::ticker_of;

/// `DataService` backed by the financial data REST API.
#[derive(Debug)]
pub struct HttpDataService {
    /// Pooled client.
    client: reqwest::Client,
    /// API base, without a trailing slash.
    base_url: String,
    /// Key sent as `apikey`.
    api_key: Option<String>,
    /// `annual` or `quarter`.
    period: &'static str,
    /// Remote sort/filter endpoint.
    query_endpoint: Option<String>,
    /// Baselines by ticker, for local query evaluation.
    cache: Mutex<LruCache<String, Vec<Record>>>,
}

impl HttpDataService {
    /// What: Build the service from settings.
    ///
    /// Inputs:
    /// - `settings`: Base URL, key, period, timeouts, query endpoint and cache size
    ///
    /// Output:
    /// - The service, or `Network` when the HTTP client cannot be built.
    ///
    /// # Errors
    /// - TLS backend initialisation failures
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let timeout = Duration::from_secs(settings.request_timeout_secs.max(1));
        let client = reqwest::Client::builder()
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .timeout(timeout)
            .user_agent(format!("finscope/{}", env!("CARGO_PKG_VERSION")))
            .build()?;
        let capacity = NonZeroUsize::new(settings.cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            period: settings.period.as_str(),
            query_endpoint: settings.query_endpoint.clone(),
            cache: Mutex::new(LruCache::new(capacity)),
        })
    }

    /// Build `{base_url}/{path}` with `params` plus the API key.
    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut pairs: Vec<(&str, &str)> = params.to_vec();
        if let Some(key) = self.api_key.as_deref() {
            pairs.push(("apikey", key));
        }
        let raw = format!("{}/{path}", self.base_url);
        let url = if pairs.is_empty() {
            Url::parse(&raw)
        } else {
            Url::parse_with_params(&raw, &pairs)
        };
        url.map_err(|e| DataError::Network(format!("invalid url: {e}")))
    }

    /// What: GET `url` and decode a JSON body.
    ///
    /// Output:
    /// - Decoded body; `NotFound(symbol)` on 404, `Network` on other non-success statuses or an
    ///   API error object.
    async fn get_json<T: DeserializeOwned>(&self, url: Url, symbol: &str) -> Result<T> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        tracing::debug!(symbol, status = status.as_u16(), bytes = body.len(), "api response");
        if status == StatusCode::NOT_FOUND {
            return Err(DataError::NotFound(symbol.to_string()));
        }
        if !status.is_success() {
            let preview: String = body.chars().take(200).collect();
            tracing::warn!(symbol, status = status.as_u16(), preview = %preview, "api returned non-success status");
            return Err(DataError::Network(format!("status {status}")));
        }
        let value: serde_json::Value = serde_json::from_str(&body)?;
        if let Some(msg) = value.get("Error Message").and_then(serde_json::Value::as_str) {
            return Err(DataError::Network(msg.to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Cached baseline for `ticker`, fetching it when absent.
    async fn cached_baseline(&self, symbol: &str) -> Result<Vec<Record>> {
        let ticker = ticker_of(symbol);
        if let Some(rows) = self.cache_get(&ticker) {
            return Ok(rows);
        }
        self.fetch_baseline(symbol).await
    }

    /// Clone of the cached rows for `ticker`.
    fn cache_get(&self, ticker: &str) -> Option<Vec<Record>> {
        self.cache.lock().ok()?.get(ticker).cloned()
    }

    /// Remember the rows for `ticker`.
    fn cache_put(&self, ticker: String, rows: &[Record]) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(ticker, rows.to_vec());
        }
    }
}

impl DataService for HttpDataService {
    async fn fetch_baseline(&self, symbol: &str) -> Result<Vec<Record>> {
        let ticker = ticker_of(symbol);
        let url = self.endpoint(&format!("income-statement/{ticker}"), &[("period", self.period)])?;
        let rows: Vec<Record> = self.get_json(url, symbol).await?;
        if rows.is_empty() {
            return Err(DataError::NotFound(symbol.to_string()));
        }
        tracing::info!(symbol, ticker = %ticker, rows = rows.len(), "income statements fetched");
        self.cache_put(ticker, &rows);
        Ok(rows)
    }

    async fn fetch_query(&self, symbol: &str, params: &QueryParameters) -> Result<Vec<Record>> {
        let rows = if let Some(endpoint) = self.query_endpoint.as_deref() {
            let ticker = ticker_of(symbol);
            let pairs = params.pairs();
            let mut query: Vec<(&str, &str)> = vec![("symbol", ticker.as_str())];
            query.extend(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
            let url = Url::parse_with_params(endpoint, &query)
                .map_err(|e| DataError::Network(format!("invalid query endpoint: {e}")))?;
            match self.get_json::<Vec<Record>>(url, symbol).await {
                Err(DataError::NotFound(_)) => Vec::new(),
                other => other?,
            }
        } else {
            evaluate(&self.cached_baseline(symbol).await?, params)
        };
        if rows.is_empty() {
            return Err(DataError::EmptyResult);
        }
        Ok(rows)
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<CompanyProfile> {
        let url = self.endpoint(&format!("profile/{}", symbol.trim().to_ascii_uppercase()), &[])?;
        let mut profiles: Vec<CompanyProfile> = self.get_json(url, symbol).await?;
        if profiles.is_empty() {
            return Err(DataError::NotFound(symbol.to_string()));
        }
        Ok(profiles.swap_remove(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(key: Option<&str>) -> HttpDataService {
        let settings = Settings {
            base_url: "http://localhost:5000/api/v3/".to_string(),
            api_key: key.map(ToString::to_string),
            ..Settings::default()
        };
        HttpDataService::from_settings(&settings).unwrap()
    }

    #[test]
    /// What: Endpoint URLs join the base, encode parameters and append the key last.
    fn http_endpoint_url() {
        let svc = service(Some("k&y"));
        let url = svc
            .endpoint("income-statement/AAPL", &[("period", "annual")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:5000/api/v3/income-statement/AAPL?period=annual&apikey=k%26y"
        );
        let url = service(None).endpoint("profile/AAPL.NE", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/v3/profile/AAPL.NE");
    }

    #[tokio::test]
    /// What: Cached baselines serve local queries without a network round trip.
    ///
    /// Inputs:
    /// - A cached baseline for `AAPL`, queried through `AAPL.NE`
    ///
    /// Output:
    /// - Sorted rows from the cache; an unmatched range yields `EmptyResult`
    async fn http_local_query_uses_cache() {
        use crate::engine::{RangeFilter, SortController, compose};
        use crate::state::CellValue;
        let svc = service(None);
        svc.cache_put(
            "AAPL".to_string(),
            &[
                Record::from_iter([("revenue", CellValue::Number(2.0))]),
                Record::from_iter([("revenue", CellValue::Number(1.0))]),
            ],
        );
        let mut sort = SortController::default();
        sort.select("revenue");
        let rows = svc
            .fetch_query("AAPL.NE", &compose(sort.state(), &RangeFilter::default()))
            .await
            .unwrap();
        assert_eq!(rows[0].number("revenue"), Some(1.0));
        let mut f = RangeFilter::default();
        f.set("revenue", 5.0, 6.0);
        let res = svc.fetch_query("AAPL", &compose(sort.state(), &f)).await;
        assert_eq!(res, Err(DataError::EmptyResult));
    }
}
