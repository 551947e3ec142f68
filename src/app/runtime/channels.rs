use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crossterm::event::Event as CEvent;
use tokio::sync::mpsc;

use super::workers::{spawn_baseline_worker, spawn_query_worker};
use crate::engine::{BaselineRequest, QueryRequest, RequestId};
use crate::sources::{DataError, DataService};
use crate::state::{CompanyProfile, Record};

/// Responses delivered by the fetch workers to the event loop.
#[derive(Debug)]
pub enum DataMsg {
    /// Baseline and profile of one load, fetched together.
    Company {
        /// Baseline request id.
        id: RequestId,
        /// Income statements.
        rows: Result<Vec<Record>, DataError>,
        /// Company profile.
        profile: Result<CompanyProfile, DataError>,
    },
    /// Result of a sort/filter query.
    Query {
        /// Query request id.
        id: RequestId,
        /// Matching rows.
        rows: Result<Vec<Record>, DataError>,
    },
}

/// What: Senders the event handlers use to start fetches.
///
/// Details:
/// - Sending never blocks; a closed worker is logged and otherwise ignored.
#[derive(Clone, Debug)]
pub struct Dispatch {
    /// Baseline load requests.
    baseline_tx: mpsc::UnboundedSender<BaselineRequest>,
    /// Query requests.
    query_tx: mpsc::UnboundedSender<QueryRequest>,
}

impl Dispatch {
    /// What: Create a dispatcher plus the receiving ends.
    ///
    /// Output:
    /// - `(dispatch, baseline_rx, query_rx)`; tests read the receivers directly.
    #[must_use]
    pub fn channel() -> (
        Self,
        mpsc::UnboundedReceiver<BaselineRequest>,
        mpsc::UnboundedReceiver<QueryRequest>,
    ) {
        let (baseline_tx, baseline_rx) = mpsc::unbounded_channel();
        let (query_tx, query_rx) = mpsc::unbounded_channel();
        (
            Self {
                baseline_tx,
                query_tx,
            },
            baseline_rx,
            query_rx,
        )
    }

    /// Send a baseline load.
    pub fn load(&self, req: BaselineRequest) {
        if self.baseline_tx.send(req).is_err() {
            tracing::warn!("baseline worker gone; load dropped");
        }
    }

    /// Send a query if the engine produced one.
    pub fn query(&self, req: Option<QueryRequest>) {
        if let Some(req) = req
            && self.query_tx.send(req).is_err()
        {
            tracing::warn!("query worker gone; query dropped");
        }
    }
}

/// What: Channel definitions for runtime communication.
///
/// Details:
/// - Contains all channel senders and receivers used for communication
///   between the main event loop and background workers
pub struct Channels {
    /// Terminal events from the input thread.
    pub event_tx: mpsc::UnboundedSender<CEvent>,
    /// Receiving end of terminal events.
    pub event_rx: mpsc::UnboundedReceiver<CEvent>,
    /// Tells the input thread to stop.
    pub event_thread_cancelled: Arc<AtomicBool>,
    /// Worker responses.
    pub data_rx: mpsc::UnboundedReceiver<DataMsg>,
    /// Redraw ticks.
    pub tick_tx: mpsc::UnboundedSender<()>,
    /// Receiving end of redraw ticks.
    pub tick_rx: mpsc::UnboundedReceiver<()>,
    /// Request senders handed to the event handlers.
    pub dispatch: Dispatch,
}

impl Channels {
    /// What: Create all channels and spawn the fetch workers.
    ///
    /// Inputs:
    /// - `service`: Data service shared by the workers
    pub fn new<S: DataService>(service: Arc<S>) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel::<CEvent>();
        let event_thread_cancelled = Arc::new(AtomicBool::new(false));
        let (data_tx, data_rx) = mpsc::unbounded_channel::<DataMsg>();
        let (tick_tx, tick_rx) = mpsc::unbounded_channel::<()>();
        let (dispatch, baseline_rx, query_rx) = Dispatch::channel();

        spawn_baseline_worker(Arc::clone(&service), baseline_rx, data_tx.clone());
        spawn_query_worker(service, query_rx, data_tx);

        Self {
            event_tx,
            event_rx,
            event_thread_cancelled,
            data_rx,
            tick_tx,
            tick_rx,
            dispatch,
        }
    }
}
