/// Active sort column and direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortState {
    /// Active column, if any.
    column: Option<String>,
    /// Direction for the active column.
    ascending: bool,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            column: None,
            ascending: true,
        }
    }
}

impl SortState {
    /// Active column, if any.
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// Whether the active column sorts ascending.
    #[must_use]
    pub const fn ascending(&self) -> bool {
        self.ascending
    }

    /// Whether a sort column is set.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.column.is_some()
    }

    /// Whether `column` is the active sort column.
    #[must_use]
    pub fn is_column(&self, column: &str) -> bool {
        self.column.as_deref() == Some(column)
    }
}

/// Owns the [`SortState`]; nothing else writes it.
#[derive(Clone, Debug, Default)]
pub struct SortController {
    /// The controlled state.
    state: SortState,
}

impl SortController {
    /// What: Apply a header click on `column`.
    ///
    /// Inputs:
    /// - `column`: Column the user selected
    ///
    /// Output:
    /// - Updates the state: the active column flips direction; any other column becomes active
    ///   ascending, never inheriting the previous direction.
    pub fn select(&mut self, column: &str) {
        if self.state.is_column(column) {
            self.state.ascending = !self.state.ascending;
        } else {
            self.state.column = Some(column.to_string());
            self.state.ascending = true;
        }
    }

    /// Back to no active column, ascending.
    pub fn clear(&mut self) {
        self.state = SortState::default();
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &SortState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: First selection activates ascending; reselecting flips.
    fn sort_select_then_toggle() {
        let mut c = SortController::default();
        c.select("revenue");
        assert_eq!(c.state().column(), Some("revenue"));
        assert!(c.state().ascending());
        c.select("revenue");
        assert!(!c.state().ascending());
    }

    #[test]
    /// What: Two toggles of the active column restore its direction.
    fn sort_double_toggle_restores_direction() {
        let mut c = SortController::default();
        c.select("eps");
        let before = c.state().clone();
        c.select("eps");
        c.select("eps");
        assert_eq!(c.state(), &before);
    }

    #[test]
    /// What: Switching columns resets direction to ascending.
    ///
    /// Inputs:
    /// - `revenue` toggled to descending, then `netIncome` selected
    ///
    /// Output:
    /// - `netIncome` active and ascending
    fn sort_new_column_starts_ascending() {
        let mut c = SortController::default();
        c.select("revenue");
        c.select("revenue");
        c.select("netIncome");
        assert_eq!(c.state().column(), Some("netIncome"));
        assert!(c.state().ascending());
    }

    #[test]
    /// What: Clearing returns to the default state.
    fn sort_clear_is_default() {
        let mut c = SortController::default();
        c.select("date");
        c.clear();
        assert_eq!(c.state(), &SortState::default());
        assert!(!c.state().is_active());
    }
}
