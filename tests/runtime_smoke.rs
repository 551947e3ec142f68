#![cfg(test)]
// End-to-end runtime smoke test (headless)
// - Starts finscope::app::run in the background with FINSCOPE_TEST_HEADLESS=1, which bypasses
//   raw TTY setup/restore, key input and drawing.
// - The in-memory service answers the initial load with a short latency.
// - If still running after the wait, aborts the task and asserts the join was a clean cancel.

use std::sync::Arc;
use std::time::Duration;

use finscope::config::Settings;
use finscope::sources::MemoryDataService;
use finscope::state::{AppState, CellValue, Record};

#[tokio::test(flavor = "multi_thread")]
async fn runtime_smoke_headless_initializes_and_runs_without_panic() {
    unsafe {
        std::env::set_var(finscope::app::HEADLESS_ENV, "1");
    }

    let service = MemoryDataService::new()
        .with_company(
            "AAPL",
            vec![Record::from_iter([
                ("date", CellValue::Date("2023-09-30".into())),
                ("revenue", CellValue::Number(383_285_000_000.0)),
            ])],
            None,
        )
        .with_latency(Duration::from_millis(5));
    let app = AppState::new(&Settings::default(), Some("AAPL"));
    let handle = tokio::spawn(async move { finscope::app::run(Arc::new(service), app).await });

    tokio::time::sleep(Duration::from_millis(50)).await;

    if handle.is_finished() {
        match handle.await {
            Ok(run_result) => {
                if let Err(e) = run_result {
                    panic!("app::run returned error early: {e:?}");
                }
                return;
            }
            Err(join_err) => panic!("app::run task panicked: {join_err}"),
        }
    }

    handle.abort();
    match handle.await {
        Ok(run_result) => {
            if let Err(e) = run_result {
                panic!("app::run completed with error on abort race: {e:?}");
            }
        }
        Err(join_err) => {
            assert!(
                join_err.is_cancelled(),
                "app::run join error should be cancellation, got: {join_err}"
            );
        }
    }
}
