//! Non-interactive `--print` mode.

use unicode_width::UnicodeWidthStr;

use crate::sources::DataService;
use crate::state::AppState;
use crate::util::{format_cell, title_case, truncate_to_width};

/// Widest a printed column may get.
const MAX_COL_WIDTH: usize = 24;

/// What: Load the app's symbol once and render the table as plain text.
///
/// Inputs:
/// - `service`: Data service
/// - `app`: State holding the symbol and columns
///
/// Output:
/// - The rendered table, or the empty-state message.
pub async fn print_table<S: DataService>(service: &S, app: &mut AppState) -> String {
    let symbol = app.symbol.clone();
    let req = app.begin_load(&symbol);
    let (rows, profile) = futures::join!(service.fetch_baseline(&req.symbol), service.fetch_profile(&req.symbol));
    app.apply_company(req.id, rows, profile);
    render_plain(app)
}

/// What: Render the displayed dataset as an aligned plain-text table.
///
/// Output:
/// - Title line, header and one line per row; the empty-state message (and any load error)
///   when there are no rows.
#[must_use]
pub fn render_plain(app: &AppState) -> String {
    let mut out = String::new();
    let title = app
        .profile
        .as_ref()
        .filter(|p| !p.company_name.is_empty())
        .map_or_else(|| app.symbol.clone(), |p| format!("{} ({})", p.company_name, p.symbol));
    out.push_str(&title);
    out.push('\n');

    if let Some(empty) = app.engine.empty_state() {
        if let Some(err) = app.engine.notice() {
            out.push_str(&format!("error: {err}\n"));
        }
        out.push_str(empty.message());
        out.push('\n');
        return out;
    }

    let rows = app.engine.displayed();
    let header: Vec<String> = app.columns.iter().map(|c| title_case(c)).collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|r| app.columns.iter().map(|c| format_cell(r.get(c))).collect())
        .collect();
    let widths: Vec<usize> = header
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .map(|row| row[i].width())
                .chain(std::iter::once(h.width()))
                .max()
                .unwrap_or(0)
                .min(MAX_COL_WIDTH)
        })
        .collect();

    let line = |values: &[String]| {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| {
                let v = truncate_to_width(v, *w);
                format!("{v}{}", " ".repeat(w.saturating_sub(v.width())))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };
    out.push_str(&line(&header));
    out.push('\n');
    for row in &cells {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}
