//! ratatui rendering: company header, income-statement table, chart and status line.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::state::AppState;

mod chart;
mod header;
mod status;
mod table;
mod theme;

pub use theme::{Theme, series_color, theme};

/// What: Draw one frame.
///
/// Details:
/// - Layout top to bottom: header, table, chart, status line. The chart takes the larger share
///   of the remaining height; the table keeps at least a header and a few rows.
pub fn ui(f: &mut Frame, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header::HEIGHT),
            Constraint::Min(8),
            Constraint::Percentage(45),
            Constraint::Length(1),
        ])
        .split(f.area());

    header::render_header(f, app, chunks[0]);
    table::render_table(f, app, chunks[1]);
    chart::render_chart(f, app, chunks[2]);
    status::render_status(f, app, chunks[3]);
}

#[cfg(test)]
mod tests {
    use ratatui::{Terminal, backend::TestBackend};

    use crate::events::test_support::loaded_app;

    /// Flatten a test buffer to text.
    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        buf.content().iter().map(ratatui::buffer::Cell::symbol).collect()
    }

    #[test]
    /// What: A loaded company renders its table headers, values and key hints.
    fn ui_renders_loaded_table() {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        let mut app = loaded_app();
        terminal.draw(|f| super::ui(f, &mut app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Revenue"));
        assert!(text.contains("2021-09-25"));
        assert!(text.contains("q quit"));
    }

    #[test]
    /// What: A filtered-to-nothing view shows the reset hint, not the not-found text.
    fn ui_renders_no_matches_message() {
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        let mut app = loaded_app();
        let q = app.engine.set_range("revenue", 150.0, 200.0).unwrap();
        app.apply_query(q.id, Err(crate::sources::DataError::EmptyResult));
        terminal.draw(|f| super::ui(f, &mut app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Press r to reset filters"));
        assert!(!text.contains("AGO.WA"));
    }
}
