use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    app::View,
    ui::{components::card::Card, theme::Theme},
};

fn blurb(view: View) -> (&'static str, &'static str) {
    match view {
        View::Goals => (
            "Financial goals and progress tracking coming soon",
            "Set and track your financial goals with progress bars and milestones.",
        ),
        View::Limits => (
            "Budget limits and spending alerts coming soon",
            "Set spending limits and receive alerts when you're approaching your budget.",
        ),
        View::AiAnalysis => (
            "AI-powered insights and recommendations coming soon",
            "Get personalized insights, spending patterns analysis, and smart recommendations.",
        ),
        _ => ("Coming soon", ""),
    }
}

pub fn render(frame: &mut Frame<'_>, area: Rect, view: View) {
    let theme = Theme::default();
    let (headline, detail) = blurb(view);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} Coming Soon", view.label()),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(headline, Style::default().fg(theme.text))),
        Line::from(Span::styled(detail, Style::default().fg(theme.dim))),
    ];

    let content = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    Card::new(view.label(), &theme).render_with(frame, area, content);
}
