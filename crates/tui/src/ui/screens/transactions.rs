use engine::MoneyCents;
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
        components::{card::Card, money::styled_amount},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();
    let transactions = &state.transactions;
    let currency = state.currency();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3)])
        .split(area);

    let header = Line::from(vec![
        Span::styled(" Type: ", Style::default().fg(theme.text_muted)),
        Span::styled(
            transactions.type_filter.label(),
            Style::default().fg(theme.text),
        ),
        Span::styled("   Range: ", Style::default().fg(theme.text_muted)),
        Span::styled(transactions.range.label(), Style::default().fg(theme.text)),
        Span::styled(
            format!("   {} shown", transactions.items.len()),
            Style::default().fg(theme.dim),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), layout[0]);

    let card = Card::new("Transactions", &theme).focused(true);
    let inner = card.inner(layout[1]);
    card.render_frame(frame, layout[1]);

    if let Some(error) = &transactions.error
        && !transactions.loaded
    {
        frame.render_widget(
            Paragraph::new(Span::styled(error.clone(), Style::default().fg(theme.error))),
            inner,
        );
        return;
    }

    if transactions.items.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No transactions found",
                Style::default().fg(theme.dim),
            )),
            inner,
        );
        return;
    }

    let items: Vec<ListItem> = transactions
        .items
        .iter()
        .map(|tx| {
            let magnitude = MoneyCents::coerce(&tx.amount).abs();
            let signed = if tx.is_credit() { magnitude } else { -magnitude };
            let date = tx
                .trans_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "----------".to_string());
            let name = [tx.name.as_deref(), tx.description.as_deref()]
                .into_iter()
                .flatten()
                .find(|s| !s.trim().is_empty())
                .unwrap_or("Transaction")
                .to_string();
            ListItem::new(Line::from(vec![
                Span::styled(format!("{date}  "), Style::default().fg(theme.dim)),
                Span::styled(name, Style::default().fg(theme.text)),
                Span::raw("  "),
                styled_amount(signed, currency, &theme),
            ]))
        })
        .collect();

    let list = List::new(items).highlight_style(
        Style::default()
            .bg(theme.border)
            .add_modifier(Modifier::BOLD),
    );
    let mut list_state = ListState::default().with_selected(Some(transactions.selected));
    frame.render_stateful_widget(list, inner, &mut list_state);
}
