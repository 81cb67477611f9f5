use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Bar, BarChart, BarGroup},
};

use crate::ui::{components::card::Card, theme::Theme};

/// One labelled pair of bars (income next to expenses).
pub struct PairedBars {
    pub label: String,
    pub income: u64,
    pub expenses: u64,
}

/// Income/expense bars per label, green then red.
pub fn render_paired_bars(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &str,
    pairs: &[PairedBars],
    theme: &Theme,
) {
    let card = Card::new(title, theme);
    let inner = card.inner(area);
    card.render_frame(frame, area);

    let mut chart = BarChart::default()
        .bar_width(5)
        .bar_gap(1)
        .group_gap(3)
        .value_style(Style::default().fg(theme.text).add_modifier(Modifier::BOLD))
        .label_style(Style::default().fg(theme.dim));

    for pair in pairs {
        let bars = [
            Bar::default()
                .value(pair.income)
                .text_value(String::new())
                .style(Style::default().fg(theme.positive)),
            Bar::default()
                .value(pair.expenses)
                .text_value(String::new())
                .style(Style::default().fg(theme.negative)),
        ];
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(pair.label.clone()))
                .bars(&bars),
        );
    }

    frame.render_widget(chart, inner);
}

/// Returns a bar like `████████░░░░░░░░░░░░` of `width` cells for a
/// percentage in `0..=100`.
#[must_use]
pub fn percentage_bar(percentage: u8, width: usize) -> String {
    let filled = (usize::from(percentage.min(100)) * width / 100).min(width);
    let empty = width.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}
