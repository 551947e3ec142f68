use std::sync::Arc;

use tokio::sync::mpsc;

use crate::app::runtime::channels::DataMsg;
use crate::engine::BaselineRequest;
use crate::sources::DataService;

/// What: Spawn background worker for baseline loads.
///
/// Inputs:
/// - `service`: Data service
/// - `req_rx`: Baseline requests from the event handlers
/// - `data_tx`: Responses back to the event loop
///
/// Details:
/// - Each request runs on its own task so a slow symbol never delays a newer one; the engine
///   discards whichever response is stale.
/// - Income statements and the profile are fetched concurrently and delivered as one message.
pub fn spawn_baseline_worker<S: DataService>(
    service: Arc<S>,
    mut req_rx: mpsc::UnboundedReceiver<BaselineRequest>,
    data_tx: mpsc::UnboundedSender<DataMsg>,
) {
    tokio::spawn(async move {
        while let Some(req) = req_rx.recv().await {
            let service = Arc::clone(&service);
            let tx = data_tx.clone();
            tokio::spawn(async move {
                let (rows, profile) = futures::join!(
                    service.fetch_baseline(&req.symbol),
                    service.fetch_profile(&req.symbol)
                );
                tracing::debug!(
                    id = req.id,
                    symbol = %req.symbol,
                    ok = rows.is_ok(),
                    "baseline fetch finished"
                );
                let _ = tx.send(DataMsg::Company {
                    id: req.id,
                    rows,
                    profile,
                });
            });
        }
    });
}
