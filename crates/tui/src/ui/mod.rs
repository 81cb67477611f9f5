pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, View};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    let current = state.navigation.current();
    components::tabs::render_tabs(frame, layout[1], current, &theme);

    let content = layout[2];
    match current {
        View::Dashboard => screens::dashboard::render(frame, content, state),
        View::Expenses => screens::expenses::render(frame, content, state),
        View::Analytics => screens::analytics::render(frame, content, state),
        View::Transactions => screens::transactions::render(frame, content, state),
        View::Goals | View::Limits | View::AiAnalysis => {
            screens::placeholder::render(frame, content, current)
        }
    }

    render_bottom_bar(frame, layout[3], state, &theme);
    if let Some(modal) = &state.modal {
        screens::modal::render(frame, area, modal);
    }
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let refresh = state
        .last_refresh
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string());
    let (status, status_style) = if state.dashboard.is_loading() {
        ("LOADING", Style::default().fg(theme.warning))
    } else {
        ("READY", Style::default().fg(theme.positive))
    };

    let line = Line::from(vec![
        Span::styled("Source", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.source)),
        Span::styled("Currency", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.currency().code())),
        Span::styled("Refresh", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {refresh}  ")),
        Span::styled(status, status_style),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = components::tabs::tab_shortcuts(theme);

    let context_hints = context_hints(state, theme);
    if !context_hints.is_empty() {
        parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        parts.extend(context_hints);
    }

    parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    parts.push(Span::styled("q", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" quit"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn hint(key: &'static str, label: &'static str, theme: &Theme) -> [Span<'static>; 2] {
    [
        Span::styled(key, Style::default().fg(theme.accent)),
        Span::raw(label),
    ]
}

/// Keyboard hints for the current view and input mode.
fn context_hints(state: &AppState, theme: &Theme) -> Vec<Span<'static>> {
    if state.modal.is_some() {
        return Vec::new();
    }
    if state.expenses.searching {
        return [
            hint("Enter", " apply  ", theme),
            hint("Esc", " clear", theme),
        ]
        .concat();
    }

    let mut hints = vec![
        hint("a", " expense  ", theme),
        hint("i", " income  ", theme),
    ];
    let current = state.navigation.current();
    match current {
        View::Expenses => {
            hints.push(hint("/", " search  ", theme));
            hints.push(hint("c", " category  ", theme));
        }
        View::Transactions => {
            hints.push(hint("f", " type  ", theme));
            hints.push(hint("d", " range  ", theme));
        }
        _ => {}
    }
    if !current.is_placeholder() {
        hints.push(hint("r", " refresh", theme));
    }
    hints.concat()
}
