use super::TableEngine;

impl TableEngine {
    /// What: Restore the engine to its baseline view.
    ///
    /// Output:
    /// - Range filters and sort cleared, view forced to `Baseline`, any in-flight query made stale.
    ///
    /// Details:
    /// - The baseline dataset and its bounds are untouched.
    /// - Idempotent: a second call leaves the state unchanged.
    pub fn reset(&mut self) {
        let was_active = self.is_query_active();
        self.filters.clear();
        self.sort.clear();
        self.view.reset();
        if was_active {
            tracing::info!(symbol = self.symbol.as_deref().unwrap_or(""), "table reset to baseline");
        }
    }
}
