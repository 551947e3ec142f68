//! Fixture-backed data service and the shared query evaluator.

use std::path::Path;

use finscope::app::{print_table, render_plain};
use finscope::config::Settings;
use finscope::engine::{QueryParameters, RangeFilter, SortController, compose};
use finscope::sources::{DataError, DataService, MemoryDataService};
use finscope::state::AppState;

fn fixture() -> MemoryDataService {
    MemoryDataService::from_fixture(Path::new("tests/fixtures/companies.json")).expect("fixture")
}

fn params(sort: &[&str], ranges: &[(&str, f64, f64)]) -> QueryParameters {
    let mut controller = SortController::default();
    for column in sort {
        controller.select(column);
    }
    let mut filters = RangeFilter::default();
    for (column, min, max) in ranges {
        filters.set(column, *min, *max);
    }
    compose(controller.state(), &filters)
}

fn years(rows: &[finscope::state::Record]) -> Vec<String> {
    rows.iter()
        .filter_map(|r| r.text("calendarYear").map(str::to_string))
        .collect()
}

#[tokio::test]
/// What: Exchange suffixes resolve to the bare ticker; profiles parse lenient numbers.
async fn fixture_baseline_and_profile() {
    let svc = fixture();
    let rows = svc.fetch_baseline("aapl.ne").await.expect("rows");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].number("revenue"), Some(383_285_000_000.0));
    let profile = svc.fetch_profile("AAPL.NE").await.expect("profile");
    assert_eq!(profile.company_name, "Apple Inc.");
    assert_eq!(profile.price, Some(189.98));
    assert_eq!(profile.market_cap, Some(2.95e12));
}

#[tokio::test]
/// What: Unknown and empty companies are `NotFound`; a company without a profile too.
async fn fixture_not_found_cases() {
    let svc = fixture();
    assert!(matches!(svc.fetch_baseline("MSFT").await, Err(DataError::NotFound(_))));
    assert!(matches!(svc.fetch_baseline("EMPTY").await, Err(DataError::NotFound(_))));
    assert!(matches!(svc.fetch_profile("EMPTY").await, Err(DataError::NotFound(_))));
}

#[tokio::test]
/// What: Ranges combine with AND; date ranges compare calendar years.
///
/// Inputs:
/// - `date ∈ [2021, 2022]` and `revenue ∈ [370e9, 400e9]`
///
/// Output:
/// - Only the 2022 statement
async fn query_ranges_are_conjunctive() {
    let svc = fixture();
    let p = params(&[], &[("date", 2021.0, 2022.0), ("revenue", 370e9, 400e9)]);
    let rows = svc.fetch_query("AAPL", &p).await.expect("rows");
    assert_eq!(years(&rows), ["2022"]);

    let p = params(&[], &[("date", 2021.0, 2022.0)]);
    let rows = svc.fetch_query("AAPL", &p).await.expect("rows");
    assert_eq!(years(&rows), ["2022", "2021"]);
}

#[tokio::test]
/// What: Sorting is numeric, reversible, and puts missing values last.
async fn query_sorting() {
    let svc = fixture();
    let rows = svc.fetch_query("AAPL", &params(&["eps"], &[])).await.expect("rows");
    assert_eq!(years(&rows), ["2020", "2021", "2022", "2023"]);
    let rows = svc.fetch_query("AAPL", &params(&["eps", "eps"], &[])).await.expect("rows");
    assert_eq!(years(&rows), ["2023", "2022", "2021", "2020"]);
    let rows = svc
        .fetch_query("AAPL", &params(&["grossProfitRatio"], &[]))
        .await
        .expect("rows");
    assert_eq!(years(&rows), ["2021", "2022", "2023", "2020"]);
}

#[tokio::test]
/// What: A query matching nothing reports `EmptyResult`.
async fn query_empty_result() {
    let svc = fixture();
    let p = params(&["revenue"], &[("revenue", 1.0, 2.0)]);
    assert_eq!(svc.fetch_query("AAPL", &p).await, Err(DataError::EmptyResult));
}

#[tokio::test]
/// What: Print mode renders the company title and formatted rows.
async fn print_mode_renders_table() {
    let svc = fixture();
    let mut app = AppState::new(&Settings::default(), Some("AAPL"));
    let out = print_table(&svc, &mut app).await;
    assert!(out.starts_with("Apple Inc. (AAPL)"));
    assert!(out.contains("383,285,000,000"));
    assert!(out.contains("2020-09-26"));

    let mut missing = AppState::new(&Settings::default(), Some("MSFT"));
    let out = print_table(&svc, &mut missing).await;
    assert!(out.contains("AAPL.NE or AGO.WA"));
    assert_eq!(render_plain(&missing), out);
}
