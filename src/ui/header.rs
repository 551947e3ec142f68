use ratatui::{
    Frame,
    prelude::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::state::{AppState, CompanyProfile, InputMode};
use crate::ui::theme;
use crate::util::format_number;

/// Rows taken by the header block, borders included.
pub const HEIGHT: u16 = 4;

/// Company name line: name, symbol and exchange, or just the symbol before a profile lands.
fn title_line(app: &AppState) -> Line<'static> {
    let th = theme();
    let bold = Style::default().fg(th.lightest).add_modifier(Modifier::BOLD);
    match app.profile.as_ref().filter(|p| !p.company_name.is_empty()) {
        Some(p) => {
            let mut spans = vec![
                Span::styled(p.company_name.clone(), bold),
                Span::styled(format!("  {}", p.symbol), Style::default().fg(th.light)),
            ];
            if !p.exchange.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", p.exchange),
                    Style::default().fg(th.subtext),
                ));
            }
            Line::from(spans)
        }
        None => Line::from(Span::styled(app.symbol.clone(), bold)),
    }
}

/// Industry, sector, price and market cap, skipping blanks.
fn detail_line(p: &CompanyProfile) -> String {
    let mut parts: Vec<String> = [&p.industry, &p.sector]
        .into_iter()
        .filter(|s| !s.is_empty())
        .cloned()
        .collect();
    if let Some(price) = p.price {
        parts.push(format!("{} {}", format_number(price), p.currency).trim_end().to_string());
    }
    if let Some(cap) = p.market_cap {
        parts.push(format!("mkt cap {}", format_number(cap)));
    }
    parts.join(" · ")
}

/// Render the company header, or the symbol prompt while editing.
pub fn render_header(f: &mut Frame, app: &AppState, area: Rect) {
    let th = theme();
    let second = match &app.input {
        InputMode::EditSymbol(text) => Line::from(vec![
            Span::styled("Symbol: ", Style::default().fg(th.primary)),
            Span::styled(format!("{text}█"), Style::default().fg(th.text)),
            Span::styled("  (Enter load, Esc cancel)", Style::default().fg(th.subtext)),
        ]),
        InputMode::Browse => Line::from(Span::styled(
            app.profile.as_ref().map(detail_line).unwrap_or_default(),
            Style::default().fg(th.subtext).add_modifier(Modifier::ITALIC),
        )),
    };
    let header = Paragraph::new(vec![title_line(app), second]).block(
        Block::default()
            .title(Span::styled(" finscope ", Style::default().fg(th.primary)))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(th.dark)),
    );
    f.render_widget(header, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Detail line joins the populated fields only.
    fn header_detail_line() {
        let p = CompanyProfile {
            industry: "Consumer Electronics".into(),
            price: Some(27.5),
            currency: "CAD".into(),
            ..CompanyProfile::default()
        };
        assert_eq!(detail_line(&p), "Consumer Electronics · 27.5 CAD");
    }
}
