use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{ExpenseField, ExpenseModal, IncomeField, IncomeModal, Modal},
    ui::{components::centered_rect, theme::Theme},
};

struct FieldRow {
    label: &'static str,
    value: String,
    focused: bool,
    /// Picker fields change with ←/→ instead of typing.
    picker: bool,
}

fn expense_rows(modal: &ExpenseModal) -> Vec<FieldRow> {
    let form = &modal.form;
    let category = modal
        .selected_category()
        .map(|c| c.name.clone())
        .unwrap_or_else(|| {
            if modal.categories.is_empty() {
                "(no categories)".to_string()
            } else {
                "Select a category".to_string()
            }
        });

    [
        (ExpenseField::Name, form.name.clone(), false),
        (ExpenseField::Price, form.price.clone(), false),
        (ExpenseField::Description, form.description.clone(), false),
        (ExpenseField::Date, form.expense_date.to_string(), true),
        (ExpenseField::Category, category, true),
    ]
    .into_iter()
    .map(|(field, value, picker)| FieldRow {
        label: field.label(),
        value,
        focused: modal.focus == field,
        picker,
    })
    .collect()
}

fn income_rows(modal: &IncomeModal) -> Vec<FieldRow> {
    let form = &modal.form;
    let income_type = form
        .income_type
        .map(|t| format!("{} {}", t.emoji(), t.name()))
        .unwrap_or_else(|| "Custom".to_string());

    [
        (IncomeField::Type, income_type, true),
        (IncomeField::Name, form.name.clone(), false),
        (IncomeField::Price, form.price.clone(), false),
        (IncomeField::Description, form.description.clone(), false),
        (IncomeField::Date, form.income_date.to_string(), true),
    ]
    .into_iter()
    .map(|(field, value, picker)| FieldRow {
        label: field.label(),
        value,
        focused: modal.focus == field,
        picker,
    })
    .collect()
}

pub fn render(frame: &mut Frame<'_>, area: Rect, modal: &Modal) {
    let theme = Theme::default();
    let rect = centered_rect(60, 60, area);

    let rows = match modal {
        Modal::Expense(m) => expense_rows(m),
        Modal::Income(m) => income_rows(m),
    };

    let block = Block::default()
        .title(Span::styled(
            format!(" {} ", modal.title()),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.surface));
    let inner = block.inner(rect);

    frame.render_widget(Clear, rect);
    frame.render_widget(block, rect);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    let mut lines = vec![Line::from("")];
    for row in &rows {
        let label_style = if row.focused {
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_muted)
        };
        let marker = if row.focused { "› " } else { "  " };
        let value = match (row.picker, row.focused) {
            (true, true) => format!("◀ {} ▶", row.value),
            (false, true) => format!("{}▏", row.value),
            _ => row.value.clone(),
        };
        lines.push(Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(format!("{:<14}", row.label), label_style),
            Span::styled(value, Style::default().fg(theme.text)),
        ]));
    }

    if let Modal::Income(m) = modal
        && let Some(income_type) = m.form.income_type
    {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("  {}", income_type.description()),
            Style::default().fg(theme.dim),
        )));
    }

    frame.render_widget(Paragraph::new(lines), layout[0]);

    let hints = Line::from(vec![
        Span::styled("Tab", Style::default().fg(theme.accent)),
        Span::raw(" next  "),
        Span::styled("←→", Style::default().fg(theme.accent)),
        Span::raw(" change  "),
        Span::styled("Enter", Style::default().fg(theme.accent)),
        Span::raw(" save  "),
        Span::styled("Esc", Style::default().fg(theme.accent)),
        Span::raw(" cancel"),
    ]);
    frame.render_widget(Paragraph::new(hints), layout[1]);
}
