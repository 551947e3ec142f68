use crate::engine::Applied;
use crate::state::AppState;

use super::channels::DataMsg;

/// What: Apply a worker response to the application state.
///
/// Inputs:
/// - `app`: Mutable application state
/// - `msg`: Company or query response
///
/// Output:
/// - Whether the response was current and changed the view.
///
/// Details:
/// - Stale responses are dropped by the engine; this only logs them.
pub fn handle_data_msg(app: &mut AppState, msg: DataMsg) -> Applied {
    let applied = match msg {
        DataMsg::Company { id, rows, profile } => app.apply_company(id, rows, profile),
        DataMsg::Query { id, rows } => app.apply_query(id, rows),
    };
    if applied == Applied::Stale {
        tracing::debug!(symbol = %app.symbol, "dropped stale response");
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::engine::ViewPhase;
    use crate::sources::DataError;
    use crate::state::{CellValue, Record};

    fn rows(values: &[f64]) -> Vec<Record> {
        values
            .iter()
            .map(|v| Record::from_iter([("revenue", CellValue::Number(*v))]))
            .collect()
    }

    #[test]
    /// What: Out-of-order query responses resolve to the latest request.
    ///
    /// Inputs:
    /// - Two range queries A then B; B's response arrives first, A's second
    ///
    /// Output:
    /// - B applied, A stale; B's rows displayed
    fn handle_out_of_order_queries() {
        let mut app = AppState::new(&Settings::default(), Some("AAPL"));
        let b = app.begin_load("AAPL");
        handle_data_msg(
            &mut app,
            DataMsg::Company {
                id: b.id,
                rows: Ok(rows(&[100.0, 200.0, 300.0])),
                profile: Err(DataError::NotFound("AAPL".into())),
            },
        );
        let qa = app.engine.set_range("revenue", 100.0, 150.0).unwrap();
        let qb = app.engine.set_range("revenue", 250.0, 300.0).unwrap();
        let rb = DataMsg::Query {
            id: qb.id,
            rows: Ok(rows(&[300.0])),
        };
        let ra = DataMsg::Query {
            id: qa.id,
            rows: Ok(rows(&[100.0])),
        };
        assert_eq!(handle_data_msg(&mut app, rb), Applied::Applied);
        assert_eq!(handle_data_msg(&mut app, ra), Applied::Stale);
        assert_eq!(app.engine.phase(), ViewPhase::Queried);
        assert_eq!(app.engine.displayed()[0].number("revenue"), Some(300.0));
    }
}
