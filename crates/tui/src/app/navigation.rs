/// Top-level views, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Expenses,
    Analytics,
    Transactions,
    Goals,
    Limits,
    AiAnalysis,
}

impl View {
    pub const ALL: [View; 7] = [
        Self::Dashboard,
        Self::Expenses,
        Self::Analytics,
        Self::Transactions,
        Self::Goals,
        Self::Limits,
        Self::AiAnalysis,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Expenses => "Expenses",
            Self::Analytics => "Analytics",
            Self::Transactions => "Transactions",
            Self::Goals => "Goals",
            Self::Limits => "Limits",
            Self::AiAnalysis => "AI Analysis",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Expenses => "expenses",
            Self::Analytics => "analytics",
            Self::Transactions => "transactions",
            Self::Goals => "goals",
            Self::Limits => "limits",
            Self::AiAnalysis => "ai-analysis",
        }
    }

    /// Unknown slugs land on the dashboard.
    pub fn from_slug(slug: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|view| view.slug() == slug.trim())
            .unwrap_or_default()
    }

    /// Digit shortcut, `1` for the first tab.
    pub fn shortcut(self) -> char {
        let position = Self::ALL.iter().position(|v| *v == self).unwrap_or(0);
        char::from(b'1' + position as u8)
    }

    pub fn from_shortcut(ch: char) -> Option<Self> {
        let index = ch.to_digit(10)?.checked_sub(1)?;
        Self::ALL.get(index as usize).copied()
    }

    /// Views that only show a coming-soon panel.
    pub fn is_placeholder(self) -> bool {
        matches!(self, Self::Goals | Self::Limits | Self::AiAnalysis)
    }
}

/// The current view. Owned by the app state and handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Navigation {
    current: View,
}

impl Navigation {
    pub fn new(start: View) -> Self {
        Self { current: start }
    }

    pub fn current(&self) -> View {
        self.current
    }

    /// Returns `true` when the view actually changed.
    pub fn go(&mut self, view: View) -> bool {
        let changed = self.current != view;
        self.current = view;
        changed
    }

    pub fn next(&mut self) -> View {
        self.step(1)
    }

    pub fn prev(&mut self) -> View {
        self.step(View::ALL.len() - 1)
    }

    fn step(&mut self, offset: usize) -> View {
        let position = View::ALL.iter().position(|v| *v == self.current).unwrap_or(0);
        self.current = View::ALL[(position + offset) % View::ALL.len()];
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_round_trip() {
        for view in View::ALL {
            assert_eq!(View::from_slug(view.slug()), view);
        }
    }

    #[test]
    fn unknown_slug_falls_back_to_dashboard() {
        assert_eq!(View::from_slug("budgets"), View::Dashboard);
        assert_eq!(View::from_slug(""), View::Dashboard);
        assert_eq!(View::from_slug("ai-analysis"), View::AiAnalysis);
    }

    #[test]
    fn shortcuts_follow_tab_order() {
        assert_eq!(View::Dashboard.shortcut(), '1');
        assert_eq!(View::AiAnalysis.shortcut(), '7');
        assert_eq!(View::from_shortcut('4'), Some(View::Transactions));
        assert_eq!(View::from_shortcut('0'), None);
        assert_eq!(View::from_shortcut('8'), None);
    }

    #[test]
    fn cycling_wraps_around() {
        let mut nav = Navigation::new(View::AiAnalysis);
        assert_eq!(nav.next(), View::Dashboard);
        assert_eq!(nav.prev(), View::AiAnalysis);
        assert!(nav.go(View::Expenses));
        assert!(!nav.go(View::Expenses));
    }
}
