use std::sync::Arc;

use tokio::{
    select,
    sync::mpsc,
    time::{Duration, sleep},
};

use crate::app::runtime::channels::DataMsg;
use crate::engine::QueryRequest;
use crate::sources::DataService;

/// Quiet period before a burst of filter key presses is sent as one query.
pub const DEBOUNCE_MS: u64 = 120;

/// What: Spawn background worker for sort/filter queries.
///
/// Inputs:
/// - `service`: Data service
/// - `req_rx`: Query requests from the event handlers
/// - `data_tx`: Responses back to the event loop
///
/// Details:
/// - Debounces requests with a 120ms window and only sends the latest of a burst; superseded
///   ids never get a response, which the engine treats like any stale id.
/// - Each surviving query runs on its own task; responses may arrive out of order.
pub fn spawn_query_worker<S: DataService>(
    service: Arc<S>,
    mut req_rx: mpsc::UnboundedReceiver<QueryRequest>,
    data_tx: mpsc::UnboundedSender<DataMsg>,
) {
    tokio::spawn(async move {
        loop {
            let Some(mut latest) = req_rx.recv().await else {
                break;
            };
            loop {
                select! {
                    Some(newer) = req_rx.recv() => { latest = newer; }
                    () = sleep(Duration::from_millis(DEBOUNCE_MS)) => { break; }
                }
            }
            let service = Arc::clone(&service);
            let tx = data_tx.clone();
            tokio::spawn(async move {
                let rows = service.fetch_query(&latest.symbol, &latest.params).await;
                tracing::debug!(id = latest.id, ok = rows.is_ok(), "query fetch finished");
                let _ = tx.send(DataMsg::Query {
                    id: latest.id,
                    rows,
                });
            });
        }
    });
}
