//! Event handling layer for the finscope TUI.
//!
//! `handle_event` routes key presses to the browse or symbol-input handlers, which mutate
//! [`AppState`] and hand any resulting fetch requests to the [`Dispatch`].

use crossterm::event::{Event as CEvent, KeyCode, KeyEventKind, KeyModifiers};

use crate::app::Dispatch;
use crate::state::{AppState, InputMode};

mod browse;
mod symbol_input;

/// Dispatch a single terminal event and mutate the [`AppState`].
///
/// Returns `true` to signal the application should exit; otherwise `false`.
pub fn handle_event(ev: &CEvent, app: &mut AppState, dispatch: &Dispatch) -> bool {
    let CEvent::Key(ke) = ev else {
        return false;
    };
    if ke.kind != KeyEventKind::Press {
        return false;
    }
    if ke.code == KeyCode::Char('c') && ke.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }
    match app.input {
        InputMode::EditSymbol(_) => {
            symbol_input::handle_key(*ke, app, dispatch);
            false
        }
        InputMode::Browse => browse::handle_key(*ke, app, dispatch),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyModifiers};

    use crate::config::Settings;
    use crate::state::{AppState, CellValue, Record};

    /// Press event for `code`.
    pub fn key(code: KeyCode) -> CEvent {
        CEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    /// App with `AAPL` loaded: two years, revenue 100 and 300.
    pub fn loaded_app() -> AppState {
        let mut app = AppState::new(&Settings::default(), Some("AAPL"));
        let req = app.begin_load("AAPL");
        let rows = vec![
            Record::from_iter([
                ("date", CellValue::Date("2020-09-26".into())),
                ("revenue", CellValue::Number(100.0)),
            ]),
            Record::from_iter([
                ("date", CellValue::Date("2021-09-25".into())),
                ("revenue", CellValue::Number(300.0)),
            ]),
        ];
        app.apply_company(req.id, Ok(rows), Ok(crate::state::CompanyProfile::default()));
        app
    }
}
