use engine::ColorToken;
use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub surface: Color,
    pub border: Color,
    pub border_focused: Color,
    pub text: Color,
    pub text_muted: Color,
    pub dim: Color,
    pub accent: Color,
    pub positive: Color,
    pub negative: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::Rgb(8, 12, 16),
            surface: Color::Rgb(20, 26, 32),
            border: Color::Rgb(60, 70, 80),
            border_focused: Color::Rgb(80, 160, 160),
            text: Color::Rgb(220, 220, 220),
            text_muted: Color::Rgb(160, 160, 160),
            dim: Color::Rgb(140, 140, 140),
            accent: Color::Rgb(80, 160, 160),
            positive: Color::Rgb(90, 190, 110),
            negative: Color::Rgb(220, 90, 90),
            warning: Color::Rgb(230, 180, 70),
            error: Color::Rgb(200, 80, 80),
        }
    }
}

impl Theme {
    /// Terminal color for a breakdown palette entry.
    pub fn palette(&self, token: ColorToken) -> Color {
        match token {
            ColorToken::Red => Color::Rgb(239, 68, 68),
            ColorToken::Blue => Color::Rgb(59, 130, 246),
            ColorToken::Purple => Color::Rgb(168, 85, 247),
            ColorToken::Green => Color::Rgb(34, 197, 94),
            ColorToken::Orange => Color::Rgb(249, 115, 22),
            ColorToken::Pink => Color::Rgb(236, 72, 153),
            ColorToken::Teal => Color::Rgb(20, 184, 166),
        }
    }
}
