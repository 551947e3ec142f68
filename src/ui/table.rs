use ratatui::{
    Frame,
    layout::{Alignment, Constraint},
    prelude::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Wrap},
};

use crate::engine::{SortState, ViewPhase};
use crate::state::{AppState, ColumnKind};
use crate::ui::theme;
use crate::util::{format_bound, format_cell, title_case};

/// Sort indicator for `column`: `↕` inactive, `↑` ascending, `↓` descending.
#[must_use]
pub fn sort_indicator(sort: &SortState, column: &str) -> &'static str {
    if !sort.is_column(column) {
        "↕"
    } else if sort.ascending() {
        "↑"
    } else {
        "↓"
    }
}

/// What: Text of the range line under a header cell.
///
/// Output:
/// - The active filter, else the column bounds; empty for text columns or unloaded bounds.
fn range_line(app: &AppState, column: &str) -> (String, bool) {
    let kind = app.engine.column_kind(column);
    if kind == ColumnKind::Text {
        return (String::new(), false);
    }
    if let Some((min, max)) = app.engine.range(column) {
        return (format!("{}..{}", format_bound(min, kind), format_bound(max, kind)), true);
    }
    app.engine.bounds(column).map_or_else(
        || (String::new(), false),
        |b| (format!("{}..{}", format_bound(b.min, kind), format_bound(b.max, kind)), false),
    )
}

/// Block title: row count, phase and spinner.
fn title(app: &AppState) -> Line<'static> {
    let th = theme();
    let rows = app.engine.displayed().len();
    let mut spans = vec![Span::styled(
        format!(" Income statements ({rows}) "),
        Style::default().fg(th.primary),
    )];
    if app.engine.is_loading() {
        spans.push(Span::styled(
            format!("{} loading ", app.spinner()),
            Style::default().fg(th.light),
        ));
    } else if matches!(app.engine.phase(), ViewPhase::Queried | ViewPhase::Error) {
        spans.push(Span::styled("filtered ", Style::default().fg(th.subtext)));
    }
    Line::from(spans)
}

/// Render the income-statement table, or the empty-state message.
pub fn render_table(f: &mut Frame, app: &mut AppState, area: Rect) {
    let th = theme();
    let block = Block::default()
        .title(title(app))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(th.dark));

    if let Some(empty) = app.engine.empty_state() {
        let msg = Paragraph::new(empty.message())
            .style(Style::default().fg(th.subtext))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block);
        f.render_widget(msg, area);
        return;
    }

    let sort = app.engine.sort().clone();
    let header_cells: Vec<Cell> = app
        .columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let selected = i == app.selected_column;
            let label_style = if selected {
                Style::default().fg(th.lightest).bg(th.darkest).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(th.lightest).add_modifier(Modifier::BOLD)
            };
            let (range, active) = range_line(app, c);
            let range_style = if active {
                Style::default().fg(th.light)
            } else {
                Style::default().fg(th.subtext)
            };
            Cell::from(Text::from(vec![
                Line::from(vec![
                    Span::styled(title_case(c), label_style),
                    Span::styled(format!(" {}", sort_indicator(&sort, c)), Style::default().fg(th.light)),
                ]),
                Line::from(Span::styled(range, range_style)),
            ]))
        })
        .collect();
    let header = Row::new(header_cells).height(2).bottom_margin(1);

    let rows: Vec<Row> = app
        .engine
        .displayed()
        .iter()
        .map(|r| {
            Row::new(
                app.columns
                    .iter()
                    .map(|c| Cell::from(format_cell(r.get(c))))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();
    let widths: Vec<Constraint> = app.columns.iter().map(|_| Constraint::Min(12)).collect();
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .style(Style::default().fg(th.text))
        .row_highlight_style(Style::default().fg(th.lightest).bg(th.dark))
        .column_spacing(2);
    f.render_stateful_widget(table, area, &mut app.table_state);
}
