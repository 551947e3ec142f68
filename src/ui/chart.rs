use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    prelude::Rect,
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph},
};

use crate::chart::{ChartData, Legend, build_chart};
use crate::state::{AppState, ChartMode};
use crate::ui::{series_color, theme};
use crate::util::{format_number, title_case};

/// Legend row: `[n] Label` per selected metric, dimmed when hidden.
fn legend_line(legend: &Legend) -> Line<'static> {
    let th = theme();
    let mut spans = Vec::new();
    for (i, metric) in legend.metrics().iter().enumerate() {
        let style = if legend.is_visible(metric) {
            Style::default().fg(series_color(i))
        } else {
            Style::default().fg(th.subtext).add_modifier(Modifier::CROSSED_OUT)
        };
        spans.push(Span::styled(format!("[{}] {}", i + 1, title_case(metric)), style));
        spans.push(Span::raw("  "));
    }
    Line::from(spans)
}

/// Three y-axis labels: low, middle, high.
fn y_labels(data: &ChartData) -> Vec<String> {
    let (lo, hi) = data.y_bounds;
    [lo, f64::midpoint(lo, hi), hi]
        .into_iter()
        .map(format_number)
        .collect()
}

/// First, middle and last x labels; fewer when the dataset is short.
fn x_labels(data: &ChartData) -> Vec<String> {
    let labels = &data.x_labels;
    match labels.len() {
        0 => Vec::new(),
        1 | 2 => labels.clone(),
        n => vec![labels[0].clone(), labels[n / 2].clone(), labels[n - 1].clone()],
    }
}

/// Render the chart of the displayed dataset with its legend.
#[allow(clippy::cast_precision_loss)]
pub fn render_chart(f: &mut Frame, app: &AppState, area: Rect) {
    let th = theme();
    let data = build_chart(app.engine.displayed(), &app.legend, app.chart_mode);
    let mut title = vec![Span::styled(
        format!(" Chart ({}) ", app.chart_mode.label()),
        Style::default().fg(th.primary),
    )];
    if let Some(sub) = data.scale.subtitle() {
        title.push(Span::styled(format!("{sub} "), Style::default().fg(th.subtext)));
    }
    let block = Block::default()
        .title(Line::from(title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(th.dark));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);
    f.render_widget(Paragraph::new(legend_line(&app.legend)), rows[0]);

    if data.x_labels.is_empty() {
        return;
    }
    let graph_type = match app.chart_mode {
        ChartMode::Line => GraphType::Line,
        ChartMode::StackedArea | ChartMode::Area => GraphType::Bar,
    };
    let datasets: Vec<Dataset> = data
        .series
        .iter()
        .map(|s| {
            let index = app
                .legend
                .metrics()
                .iter()
                .position(|m| *m == s.metric)
                .unwrap_or_default();
            Dataset::default()
                .name(s.label.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(graph_type)
                .style(Style::default().fg(series_color(index)))
                .data(&s.points)
        })
        .collect();
    let x_max = (data.x_labels.len().saturating_sub(1)) as f64;
    let chart = Chart::new(datasets)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(th.subtext))
                .bounds([0.0, x_max.max(1.0)])
                .labels(x_labels(&data)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(th.subtext))
                .bounds([data.y_bounds.0, data.y_bounds.1])
                .labels(y_labels(&data)),
        )
        .hidden_legend_constraints((Constraint::Length(0), Constraint::Length(0)));
    f.render_widget(chart, rows[1]);
}
