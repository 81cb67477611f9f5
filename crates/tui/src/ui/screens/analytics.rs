use engine::MoneyCents;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Paragraph, Row, Table},
};

use crate::{
    app::AppState,
    ui::{
        components::{
            card::Card,
            charts::{PairedBars, render_paired_bars},
        },
        theme::Theme,
    },
};

/// Months shown in the chart, newest last.
const CHART_MONTHS: usize = 6;

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let analytics = &state.analytics;
    let currency = state.currency();

    if analytics.months.is_empty() {
        let message = analytics
            .error
            .clone()
            .unwrap_or_else(|| "No monthly data yet".to_string());
        let color = if analytics.error.is_some() {
            theme.error
        } else {
            theme.dim
        };
        Card::new("Monthly Summary", &theme).render_with(
            frame,
            area,
            Paragraph::new(Span::styled(message, Style::default().fg(color))),
        );
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let mut months: Vec<_> = analytics.months.iter().collect();
    months.sort_by(|a, b| a.month.cmp(&b.month));

    let pairs: Vec<PairedBars> = months
        .iter()
        .rev()
        .take(CHART_MONTHS)
        .rev()
        .map(|m| PairedBars {
            label: m.month.clone().unwrap_or_default(),
            income: whole_units(MoneyCents::coerce(&m.total_income)),
            expenses: whole_units(MoneyCents::coerce(&m.total_expenses)),
        })
        .collect();
    render_paired_bars(frame, layout[0], "Income vs Expenses", &pairs, &theme);

    let header = Row::new(["Month", "Income", "Expenses", "Net"]).style(
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    );
    let rows: Vec<Row> = months
        .iter()
        .rev()
        .map(|m| {
            let net = MoneyCents::coerce(&m.net_amount);
            let net_color = if net.is_negative() {
                theme.negative
            } else {
                theme.positive
            };
            Row::new([
                Span::styled(
                    m.month.clone().unwrap_or_else(|| "-".to_string()),
                    Style::default().fg(theme.text),
                ),
                Span::styled(
                    MoneyCents::coerce(&m.total_income).format(currency),
                    Style::default().fg(theme.positive),
                ),
                Span::styled(
                    MoneyCents::coerce(&m.total_expenses).format(currency),
                    Style::default().fg(theme.negative),
                ),
                Span::styled(net.format(currency), Style::default().fg(net_color)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(16),
            Constraint::Length(16),
            Constraint::Length(16),
        ],
    )
    .header(header);
    Card::new("Monthly Summary", &theme).render_with(frame, layout[1], table);
}

/// Bar heights in whole currency units; negatives draw as empty.
fn whole_units(amount: MoneyCents) -> u64 {
    u64::try_from(amount.cents() / 100).unwrap_or(0)
}
