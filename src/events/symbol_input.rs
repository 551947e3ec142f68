use crossterm::event::{KeyCode, KeyEvent};

use crate::app::Dispatch;
use crate::state::{AppState, InputMode};

/// Longest symbol accepted.
const MAX_SYMBOL_LEN: usize = 16;

/// What: Handle a key while the symbol prompt is open.
///
/// Details:
/// - Enter with non-empty text loads that symbol and closes the prompt; Esc closes it unchanged.
/// - Input is upper-cased; only ASCII alphanumerics, `.`, `-` and `^` are accepted.
pub fn handle_key(ke: KeyEvent, app: &mut AppState, dispatch: &Dispatch) {
    let InputMode::EditSymbol(text) = &mut app.input else {
        return;
    };
    match ke.code {
        KeyCode::Esc => app.input = InputMode::Browse,
        KeyCode::Enter => {
            let symbol = text.trim().to_string();
            app.input = InputMode::Browse;
            if !symbol.is_empty() {
                tracing::info!(symbol = %symbol, "symbol changed");
                dispatch.load(app.begin_load(&symbol));
            }
        }
        KeyCode::Backspace => {
            text.pop();
        }
        KeyCode::Char(ch)
            if text.len() < MAX_SYMBOL_LEN
                && (ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '^')) =>
        {
            text.push(ch.to_ascii_uppercase());
        }
        _ => {}
    }
}
