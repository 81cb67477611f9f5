use engine::{Currency, MoneyCents};
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use crate::ui::theme::Theme;

/// Signed amount: `+$3,200.00` in green, `-$45.20` in red, zero neutral.
#[must_use]
pub fn styled_amount(amount: MoneyCents, currency: Currency, theme: &Theme) -> Span<'static> {
    let formatted = amount.format(currency);

    let (color, prefix) = if amount.is_positive() {
        (theme.positive, "+")
    } else if amount.is_negative() {
        (theme.negative, "")
    } else {
        (theme.text, "")
    };

    Span::styled(format!("{prefix}{formatted}"), Style::default().fg(color))
}

/// Amount without sign, colored by sign; for labelled totals such as
/// "Expenses: $1,700.50".
#[must_use]
pub fn styled_amount_no_sign(amount: MoneyCents, currency: Currency, theme: &Theme) -> Span<'static> {
    let color = if amount.is_positive() {
        theme.positive
    } else if amount.is_negative() {
        theme.negative
    } else {
        theme.text
    };

    Span::styled(amount.abs().format(currency), Style::default().fg(color))
}

#[must_use]
pub fn styled_amount_bold(amount: MoneyCents, currency: Currency, theme: &Theme) -> Span<'static> {
    let span = styled_amount(amount, currency, theme);
    let style = span.style.add_modifier(Modifier::BOLD);
    span.style(style)
}
