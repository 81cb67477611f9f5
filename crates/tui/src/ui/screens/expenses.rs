use engine::{MoneyCents, expenses::ExpenseStats};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::{
    app::AppState,
    ui::{
        components::card::{Card, StatCard},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let expenses = &state.expenses;
    let currency = state.currency();
    let visible = expenses.book.filtered(&expenses.filter);
    let stats = ExpenseStats::of(&visible);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Min(3),
        ])
        .split(area);

    let search_style = if expenses.searching {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text)
    };
    let cursor = if expenses.searching { "▏" } else { "" };
    let header = Line::from(vec![
        Span::styled(" Search: ", Style::default().fg(theme.text_muted)),
        Span::styled(format!("{}{cursor}", expenses.filter.search), search_style),
        Span::styled("   Category: ", Style::default().fg(theme.text_muted)),
        Span::styled(expenses.category_filter_label(), Style::default().fg(theme.text)),
    ]);
    frame.render_widget(Paragraph::new(header), layout[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(layout[1]);
    StatCard::new("Total Spent", stats.total.format(currency), &theme)
        .value_style(Style::default().fg(theme.negative))
        .render(frame, cols[0]);
    StatCard::new("Expenses", stats.count.to_string(), &theme).render(frame, cols[1]);
    StatCard::new("Average", stats.average.format(currency), &theme).render(frame, cols[2]);

    let card = Card::new("Expenses", &theme).focused(!expenses.searching);
    let inner = card.inner(layout[2]);
    card.render_frame(frame, layout[2]);

    if let Some(error) = &expenses.error
        && !expenses.loaded
    {
        frame.render_widget(
            Paragraph::new(Span::styled(error.clone(), Style::default().fg(theme.error))),
            inner,
        );
        return;
    }

    if visible.is_empty() {
        let message = if expenses.book.expenses.is_empty() {
            "No expenses recorded yet"
        } else {
            "No expenses match the current filters"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(message, Style::default().fg(theme.dim))),
            inner,
        );
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .map(|expense| {
            let date = expense
                .expense_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "----------".to_string());
            let mut spans = vec![
                Span::styled(format!("{date}  "), Style::default().fg(theme.dim)),
                Span::styled(expense.name.clone(), Style::default().fg(theme.text)),
                Span::styled(
                    format!("  {}  ", expenses.book.category_label(expense)),
                    Style::default().fg(theme.text_muted),
                ),
                Span::styled(
                    MoneyCents::coerce(&expense.price).format(currency),
                    Style::default().fg(theme.negative),
                ),
            ];
            if let Some(description) = expense.description.as_deref().filter(|d| !d.is_empty()) {
                spans.push(Span::styled(
                    format!("  {description}"),
                    Style::default().fg(theme.dim),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).highlight_style(
        Style::default()
            .bg(theme.border)
            .add_modifier(Modifier::BOLD),
    );
    let mut list_state = ListState::default().with_selected(Some(expenses.selected));
    frame.render_stateful_widget(list, inner, &mut list_state);
}
