use ratatui::{
    Frame,
    prelude::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::{AppState, InputMode};
use crate::ui::theme;

/// Key hints for the browse mode.
const BROWSE_HINTS: &str =
    "←→ column  s sort  [ ] min  { } max  x clear  r reset  / symbol  c chart  1-9 legend  q quit";

/// Render the one-line status bar: spinner or notice on the left, key hints after it.
pub fn render_status(f: &mut Frame, app: &AppState, area: Rect) {
    let th = theme();
    let mut spans = Vec::new();
    if app.engine.is_loading() {
        spans.push(Span::styled(
            format!("{} Loading {}  ", app.spinner(), app.symbol),
            Style::default().fg(th.light),
        ));
    } else if let Some(status) = app.status_line() {
        spans.push(Span::styled(format!("{status}  "), Style::default().fg(th.error)));
    }
    let hints = match app.input {
        InputMode::Browse => BROWSE_HINTS,
        InputMode::EditSymbol(_) => "Enter load  Esc cancel",
    };
    spans.push(Span::styled(hints, Style::default().fg(th.subtext)));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
