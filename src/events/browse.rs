use crossterm::event::{KeyCode, KeyEvent};

use crate::app::Dispatch;
use crate::state::{AppState, InputMode, RangeEnd};

/// Rows moved by PageUp/PageDown.
const PAGE_ROWS: isize = 10;

/// What: Handle a key in browse mode.
///
/// Inputs:
/// - `ke`: Key press
/// - `app`: Mutable application state
/// - `dispatch`: Request senders
///
/// Output:
/// - `true` when the application should exit.
///
/// Details:
/// - Sort and filter keys act on the selected column and send a query when the engine issues one.
/// - Legend keys `1`-`9` toggle the chart metrics in legend order.
pub fn handle_key(ke: KeyEvent, app: &mut AppState, dispatch: &Dispatch) -> bool {
    match ke.code {
        KeyCode::Char('q') => return true,
        KeyCode::Left | KeyCode::Char('h') => app.move_column(-1),
        KeyCode::Right | KeyCode::Char('l') => app.move_column(1),
        KeyCode::Up | KeyCode::Char('k') => scroll_rows(app, -1),
        KeyCode::Down | KeyCode::Char('j') => scroll_rows(app, 1),
        KeyCode::PageUp => scroll_rows(app, -PAGE_ROWS),
        KeyCode::PageDown => scroll_rows(app, PAGE_ROWS),
        KeyCode::Char('s') | KeyCode::Enter => dispatch.query(app.toggle_selected_sort()),
        KeyCode::Char('[') => dispatch.query(app.nudge_range(RangeEnd::Min, -1)),
        KeyCode::Char(']') => dispatch.query(app.nudge_range(RangeEnd::Min, 1)),
        KeyCode::Char('{') => dispatch.query(app.nudge_range(RangeEnd::Max, -1)),
        KeyCode::Char('}') => dispatch.query(app.nudge_range(RangeEnd::Max, 1)),
        KeyCode::Char('x') => dispatch.query(app.clear_selected_range()),
        KeyCode::Char('r') => app.engine.reset(),
        KeyCode::Char('/') => app.input = InputMode::EditSymbol(String::new()),
        KeyCode::Char('c') => app.cycle_chart_mode(),
        KeyCode::Char(d @ '1'..='9') => {
            if let Some(n) = d.to_digit(10).and_then(|n| usize::try_from(n).ok()) {
                app.legend.toggle(n - 1);
            }
        }
        _ => {}
    }
    false
}

/// Move the highlighted row by `delta`, clamped to the displayed rows.
fn scroll_rows(app: &mut AppState, delta: isize) {
    let len = app.engine.displayed().len();
    if len == 0 {
        app.table_state.select(None);
        return;
    }
    let current = app.table_state.selected().unwrap_or(0);
    let next = current.saturating_add_signed(delta).min(len - 1);
    app.table_state.select(Some(next));
}
