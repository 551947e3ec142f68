use crate::sources::DataError;
use crate::state::Record;

/// Identifier tagged onto every outgoing request.
pub type RequestId = u64;

/// Which dataset is authoritative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewPhase {
    /// The baseline is displayed as received.
    Baseline,
    /// A query is in flight; the previously displayed dataset stays on screen.
    Querying,
    /// The latest query response is displayed.
    Queried,
    /// The latest query failed; the previously displayed dataset stays on screen.
    Error,
}

/// Outcome of feeding a response into the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    /// The response was current and changed the view.
    Applied,
    /// The response was superseded and ignored.
    Stale,
}

/// Monotonic request ids plus the id whose response is still awaited.
#[derive(Clone, Debug)]
pub struct RequestSeq {
    /// Next id to hand out.
    next_id: RequestId,
    /// Latest issued id that has not been settled or invalidated.
    latest_id: Option<RequestId>,
}

impl Default for RequestSeq {
    fn default() -> Self {
        Self {
            next_id: 1,
            latest_id: None,
        }
    }
}

impl RequestSeq {
    /// Allocate a fresh id and mark it as the only current one.
    pub fn issue(&mut self) -> RequestId {
        let id = self.next_id;
        self.next_id += 1;
        self.latest_id = Some(id);
        id
    }

    /// Whether a response tagged `id` may still be applied.
    #[must_use]
    pub fn is_current(&self, id: RequestId) -> bool {
        self.latest_id == Some(id)
    }

    /// Whether a request is awaiting its response.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.latest_id.is_some()
    }

    /// What: Consume the current id once its response is applied.
    ///
    /// Output:
    /// - `true` when `id` was current; later duplicates of it become stale.
    pub fn settle(&mut self, id: RequestId) -> bool {
        if self.is_current(id) {
            self.latest_id = None;
            true
        } else {
            false
        }
    }

    /// Make every outstanding id stale.
    pub fn invalidate(&mut self) {
        self.latest_id = None;
    }
}

/// State machine choosing between the baseline and the latest query dataset.
#[derive(Debug)]
pub struct ViewSelector {
    /// Current phase.
    phase: ViewPhase,
    /// Query request ids.
    seq: RequestSeq,
    /// Last successfully applied query dataset; `None` shows the baseline.
    queried: Option<Vec<Record>>,
    /// Failure of the latest query, shown as a non-blocking notice.
    error: Option<DataError>,
}

impl Default for ViewSelector {
    fn default() -> Self {
        Self {
            phase: ViewPhase::Baseline,
            seq: RequestSeq::default(),
            queried: None,
            error: None,
        }
    }
}

impl ViewSelector {
    /// What: Enter `Querying` for a newly dispatched query.
    ///
    /// Output:
    /// - The id the response must carry to be applied; earlier ids become stale.
    ///
    /// Details:
    /// - Valid from every phase: `Baseline` on the first sort/filter, `Queried`/`Error`/`Querying`
    ///   on later changes.
    pub fn begin_query(&mut self) -> RequestId {
        let id = self.seq.issue();
        self.phase = ViewPhase::Querying;
        tracing::debug!(id, "query issued");
        id
    }

    /// What: Apply a query response under last-request-wins.
    ///
    /// Inputs:
    /// - `id`: Id the response was tagged with
    /// - `result`: Rows or failure
    ///
    /// Output:
    /// - `Applied::Stale` when `id` is not the latest issued id; otherwise `Applied::Applied`
    ///   after moving to `Queried` (rows, an `EmptyResult` counts as zero rows) or `Error`.
    ///
    /// Details:
    /// - On failure the previously displayed dataset is kept.
    pub fn resolve(&mut self, id: RequestId, result: Result<Vec<Record>, DataError>) -> Applied {
        if !self.seq.settle(id) {
            tracing::debug!(id, "stale query response discarded");
            return Applied::Stale;
        }
        match result {
            Ok(rows) => {
                tracing::debug!(id, rows = rows.len(), "query response applied");
                self.queried = Some(rows);
                self.error = None;
                self.phase = ViewPhase::Queried;
            }
            Err(DataError::EmptyResult) => {
                self.queried = Some(Vec::new());
                self.error = None;
                self.phase = ViewPhase::Queried;
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "query failed; keeping previous rows");
                self.error = Some(e);
                self.phase = ViewPhase::Error;
            }
        }
        Applied::Applied
    }

    /// Force `Baseline`: drop the query dataset and error, invalidate in-flight ids.
    pub fn reset(&mut self) {
        self.seq.invalidate();
        self.queried = None;
        self.error = None;
        self.phase = ViewPhase::Baseline;
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> ViewPhase {
        self.phase
    }

    /// Query dataset to display, or `None` to display the baseline.
    #[must_use]
    pub fn queried(&self) -> Option<&[Record]> {
        self.queried.as_deref()
    }

    /// Failure of the latest query.
    #[must_use]
    pub const fn error(&self) -> Option<&DataError> {
        self.error.as_ref()
    }

    /// Whether a query response is awaited.
    #[must_use]
    pub const fn is_querying(&self) -> bool {
        self.seq.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::CellValue;

    fn rows(n: f64) -> Vec<Record> {
        vec![Record::from_iter([("revenue", CellValue::Number(n))])]
    }

    #[test]
    /// What: Only the latest issued id is current; settling consumes it.
    fn seq_issue_settle_invalidate() {
        let mut s = RequestSeq::default();
        let a = s.issue();
        let b = s.issue();
        assert!(a < b);
        assert!(!s.is_current(a));
        assert!(s.settle(b));
        assert!(!s.settle(b));
        let c = s.issue();
        s.invalidate();
        assert!(!s.is_current(c));
    }

    #[test]
    /// What: A late response to an earlier query is discarded even if it succeeded.
    ///
    /// Inputs:
    /// - Query A issued, query B issued, B resolves, then A resolves
    ///
    /// Output:
    /// - B's rows displayed; A reported as stale
    fn view_last_request_wins() {
        let mut v = ViewSelector::default();
        let a = v.begin_query();
        let b = v.begin_query();
        assert_eq!(v.resolve(b, Ok(rows(2.0))), Applied::Applied);
        assert_eq!(v.resolve(a, Ok(rows(1.0))), Applied::Stale);
        assert_eq!(v.phase(), ViewPhase::Queried);
        assert_eq!(v.queried().unwrap()[0].number("revenue"), Some(2.0));
    }

    #[test]
    /// What: A failed query keeps the previous dataset and records the error.
    fn view_error_keeps_previous_rows() {
        let mut v = ViewSelector::default();
        let a = v.begin_query();
        v.resolve(a, Ok(rows(5.0)));
        let b = v.begin_query();
        v.resolve(b, Err(DataError::Network("timeout".into())));
        assert_eq!(v.phase(), ViewPhase::Error);
        assert_eq!(v.queried().unwrap()[0].number("revenue"), Some(5.0));
        assert!(v.error().is_some());
    }

    #[test]
    /// What: Reset invalidates in-flight queries and returns to Baseline.
    fn view_reset_discards_in_flight() {
        let mut v = ViewSelector::default();
        let a = v.begin_query();
        v.reset();
        assert_eq!(v.resolve(a, Ok(rows(1.0))), Applied::Stale);
        assert_eq!(v.phase(), ViewPhase::Baseline);
        assert!(v.queried().is_none());
    }
}
