use engine::{Currency, DashboardModel, Insight, InsightKind};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph, Wrap},
};

use crate::{
    app::AppState,
    ui::{
        components::{
            card::{Card, StatCard},
            charts::percentage_bar,
            money::styled_amount,
        },
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let model = state.dashboard.model();
    let currency = state.currency();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(8),
        ])
        .split(area);

    render_stats(frame, layout[0], model, currency, &theme);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[1]);

    render_recent(frame, middle[0], model, currency, &theme);
    render_breakdown(frame, middle[1], model, currency, &theme);
    render_insights(frame, layout[2], &model.insights, &theme);

    if state.dashboard.is_loading() {
        let spinner = Paragraph::new(Span::styled(
            " Loading... ",
            Style::default().fg(theme.warning),
        ));
        let rect = Rect {
            x: area.x + area.width.saturating_sub(13),
            y: area.y,
            width: area.width.min(12),
            height: 1,
        };
        frame.render_widget(spinner, rect);
    }
}

fn render_stats(
    frame: &mut Frame<'_>,
    area: Rect,
    model: &DashboardModel,
    currency: Currency,
    theme: &Theme,
) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    let summary = &model.summary;
    StatCard::new("Total Income", summary.total_income.format(currency), theme)
        .value_style(Style::default().fg(theme.positive))
        .render(frame, cols[0]);
    StatCard::new(
        "Total Expenses",
        summary.total_expenses.format(currency),
        theme,
    )
    .value_style(Style::default().fg(theme.negative))
    .render(frame, cols[1]);

    let net_color = if summary.is_positive_balance() {
        theme.positive
    } else {
        theme.negative
    };
    StatCard::new("Net Amount", summary.net_amount.format(currency), theme)
        .value_style(Style::default().fg(net_color))
        .render(frame, cols[2]);
    StatCard::new(
        "Transactions",
        summary.transaction_count.to_string(),
        theme,
    )
    .render(frame, cols[3]);
}

fn render_recent(
    frame: &mut Frame<'_>,
    area: Rect,
    model: &DashboardModel,
    currency: Currency,
    theme: &Theme,
) {
    let card = Card::new("Recent Transactions", theme);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    if model.recent.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No transactions yet",
                Style::default().fg(theme.dim),
            )),
            inner,
        );
        return;
    }

    let items: Vec<ListItem> = model
        .recent
        .iter()
        .take(inner.height as usize)
        .map(|tx| {
            let date = tx
                .date
                .map(|d| d.format("%b %d").to_string())
                .unwrap_or_else(|| "      ".to_string());
            ListItem::new(Line::from(vec![
                Span::styled(format!("{date}  "), Style::default().fg(theme.dim)),
                Span::styled(tx.display_name.clone(), Style::default().fg(theme.text)),
                Span::styled(
                    format!("  {}  ", tx.category_label),
                    Style::default().fg(theme.text_muted),
                ),
                styled_amount(tx.amount, currency, theme),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items), inner);
}

fn render_breakdown(
    frame: &mut Frame<'_>,
    area: Rect,
    model: &DashboardModel,
    currency: Currency,
    theme: &Theme,
) {
    let card = Card::new("Spending by Category", theme);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let breakdown = &model.breakdown;
    if breakdown.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No expenses to break down",
                Style::default().fg(theme.dim),
            )),
            inner,
        );
        return;
    }

    let name_width = breakdown
        .shares
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0)
        .min(16);
    let bar_width = (inner.width as usize)
        .saturating_sub(name_width + 24)
        .clamp(4, 20);

    let items: Vec<ListItem> = breakdown
        .shares
        .iter()
        .take(inner.height as usize)
        .map(|share| {
            let color = theme.palette(share.color);
            let name: String = share.name.chars().take(name_width).collect();
            ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(color)),
                Span::styled(
                    format!("{name:<name_width$} "),
                    Style::default().fg(theme.text),
                ),
                Span::styled(
                    percentage_bar(share.percentage, bar_width),
                    Style::default().fg(color),
                ),
                Span::styled(
                    format!(" {:>3}% ", share.percentage),
                    Style::default().fg(theme.text_muted),
                ),
                Span::styled(share.amount.format(currency), Style::default().fg(theme.text)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items), inner);
}

fn render_insights(frame: &mut Frame<'_>, area: Rect, insights: &[Insight], theme: &Theme) {
    let card = Card::new("Insights", theme);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let mut lines = Vec::new();
    for insight in insights {
        let (marker, color) = match insight.kind {
            InsightKind::Info => ("ℹ", theme.accent),
            InsightKind::Success => ("✓", theme.positive),
            InsightKind::Warning => ("!", theme.warning),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker} "), Style::default().fg(color)),
            Span::styled(
                insight.title.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(insight.message.clone(), Style::default().fg(theme.text)),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}
