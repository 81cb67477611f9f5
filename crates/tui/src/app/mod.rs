pub mod modal;
pub mod navigation;

use std::time::{Duration, Instant};

use api_types::{
    Query,
    category::Categories,
    transaction::{Transaction, TransactionType, Transactions},
    views::MonthlySummary,
};
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use engine::{
    Currency, Dashboard, Gateway,
    expenses::{self, CategoryFilter, ExpenseBook, ExpenseFilter},
    forms::{CATEGORIES_FAILED, EXPENSE_ADDED, INCOME_ADDED},
};

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

pub use modal::{ExpenseField, ExpenseModal, IncomeField, IncomeModal, Modal};
pub use navigation::{Navigation, View};

const TICK_RATE: Duration = Duration::from_millis(200);
const TOAST_TTL: Duration = Duration::from_secs(4);
pub const TRANSACTIONS_FAILED: &str = "Failed to load transactions";
pub const ANALYTICS_FAILED: &str = "Failed to load monthly summary";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    pub shown_at: Instant,
}

#[derive(Debug, Default)]
pub struct ExpensesState {
    pub book: ExpenseBook,
    pub loaded: bool,
    pub filter: ExpenseFilter,
    pub searching: bool,
    pub selected: usize,
    pub error: Option<String>,
}

impl ExpensesState {
    /// All, then each category in list order, then back to All.
    fn cycle_category(&mut self) {
        let categories = &self.book.categories;
        self.filter.category = match &self.filter.category {
            CategoryFilter::All => categories
                .first()
                .map(|c| CategoryFilter::Only(c.id.clone()))
                .unwrap_or_default(),
            CategoryFilter::Only(id) => categories
                .iter()
                .position(|c| &c.id == id)
                .and_then(|p| categories.get(p + 1))
                .map(|c| CategoryFilter::Only(c.id.clone()))
                .unwrap_or_default(),
        };
        self.selected = 0;
    }

    pub fn category_filter_label(&self) -> String {
        match &self.filter.category {
            CategoryFilter::All => "All categories".to_string(),
            CategoryFilter::Only(id) => self
                .book
                .categories
                .iter()
                .find(|c| &c.id == id)
                .map(|c| format!("{} {}", expenses::category_emoji(&c.name), c.name))
                .unwrap_or_else(|| id.clone()),
        }
    }

    fn select(&mut self, down: bool) {
        let len = self.book.filtered(&self.filter).len();
        self.selected = step(self.selected, len, down);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Debit,
    Credit,
}

impl TypeFilter {
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Debit => "Debits",
            Self::Credit => "Credits",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::All => Self::Debit,
            Self::Debit => Self::Credit,
            Self::Credit => Self::All,
        }
    }

    fn transaction_type(self) -> Option<TransactionType> {
        match self {
            Self::All => None,
            Self::Debit => Some(TransactionType::Debit),
            Self::Credit => Some(TransactionType::Credit),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRange {
    #[default]
    AllTime,
    Last30Days,
    ThisMonth,
}

impl DateRange {
    pub fn label(self) -> &'static str {
        match self {
            Self::AllTime => "All time",
            Self::Last30Days => "Last 30 days",
            Self::ThisMonth => "This month",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::AllTime => Self::Last30Days,
            Self::Last30Days => Self::ThisMonth,
            Self::ThisMonth => Self::AllTime,
        }
    }

    /// Inclusive bounds relative to `today`.
    pub fn bounds(self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Self::AllTime => None,
            Self::Last30Days => Some((today.checked_sub_days(Days::new(29))?, today)),
            Self::ThisMonth => Some((today.with_day(1)?, today)),
        }
    }
}

#[derive(Debug, Default)]
pub struct TransactionsState {
    pub items: Vec<Transaction>,
    pub type_filter: TypeFilter,
    pub range: DateRange,
    pub loaded: bool,
    pub selected: usize,
    pub error: Option<String>,
}

impl TransactionsState {
    pub fn query(&self, today: NaiveDate) -> Query {
        let mut query = Query::new();
        if let Some(kind) = self.type_filter.transaction_type() {
            query = query.eq("transaction_type", kind.as_str());
        }
        if let Some((start, end)) = self.range.bounds(today) {
            query = query.gte("trans_date", start).lte("trans_date", end);
        }
        query.order_by("trans_date", true)
    }

    fn select(&mut self, down: bool) {
        self.selected = step(self.selected, self.items.len(), down);
    }
}

#[derive(Debug, Default)]
pub struct AnalyticsState {
    pub months: Vec<MonthlySummary>,
    pub loaded: bool,
    pub error: Option<String>,
}

fn step(selected: usize, len: usize, down: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if down {
        (selected + 1).min(len - 1)
    } else {
        selected.saturating_sub(1)
    }
}

#[derive(Debug)]
pub struct AppState {
    pub navigation: Navigation,
    pub dashboard: Dashboard,
    pub expenses: ExpensesState,
    pub transactions: TransactionsState,
    pub analytics: AnalyticsState,
    pub modal: Option<Modal>,
    pub toast: Option<ToastState>,
    /// Where the data comes from ("demo" or the backend host).
    pub source: String,
    pub last_refresh: Option<DateTime<Tz>>,
}

impl AppState {
    pub fn currency(&self) -> Currency {
        self.dashboard.currency()
    }
}

pub struct App<G> {
    gateway: G,
    timezone: Tz,
    pub state: AppState,
    should_quit: bool,
}

impl<G: Gateway> App<G> {
    pub fn new(config: &AppConfig, gateway: G, source: impl Into<String>) -> Result<Self> {
        let currency = config.currency()?;
        let timezone = config.timezone()?;
        let state = AppState {
            navigation: Navigation::new(View::from_slug(&config.start_view)),
            dashboard: Dashboard::new(currency, config.recent_limit),
            expenses: ExpensesState::default(),
            transactions: TransactionsState::default(),
            analytics: AnalyticsState::default(),
            modal: None,
            toast: None,
            source: source.into(),
            last_refresh: None,
        };

        Ok(Self {
            gateway,
            timezone,
            state,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        self.load_view().await;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        while !self.should_quit {
            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(TICK_RATE)? {
                if let Event::Key(key) = event::read()?
                    && key.kind == KeyEventKind::Press
                {
                    self.handle_key(key).await;
                }
            }
            self.expire_toast();
        }

        Ok(())
    }

    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }

    fn notify(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.state.toast = Some(ToastState {
            message: message.into(),
            level,
            shown_at: Instant::now(),
        });
    }

    fn expire_toast(&mut self) {
        if self
            .state
            .toast
            .as_ref()
            .is_some_and(|t| t.shown_at.elapsed() >= TOAST_TTL)
        {
            self.state.toast = None;
        }
    }

    fn typing(&self) -> bool {
        self.state.modal.is_some() || self.state.expenses.searching
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        let action = map_key(key, self.typing());
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }
        if self.state.modal.is_some() {
            self.handle_modal_action(action).await;
        } else if self.state.expenses.searching {
            self.handle_search_action(action);
        } else {
            self.handle_view_action(action).await;
        }
    }

    async fn handle_modal_action(&mut self, action: AppAction) {
        let Some(modal) = self.state.modal.as_mut() else {
            return;
        };
        match action {
            AppAction::Cancel => self.state.modal = None,
            AppAction::NextField | AppAction::Down => modal.focus_next(true),
            AppAction::PrevField | AppAction::Up => modal.focus_next(false),
            AppAction::Left => modal.adjust(false),
            AppAction::Right => modal.adjust(true),
            AppAction::Backspace => modal.backspace(),
            AppAction::Input(ch) => modal.input(ch),
            AppAction::Submit => self.submit_modal().await,
            AppAction::Quit | AppAction::None => {}
        }
    }

    fn handle_search_action(&mut self, action: AppAction) {
        let expenses = &mut self.state.expenses;
        match action {
            AppAction::Cancel => {
                expenses.filter.search.clear();
                expenses.searching = false;
            }
            AppAction::Submit => expenses.searching = false,
            AppAction::Backspace => {
                expenses.filter.search.pop();
            }
            AppAction::Input(ch) => expenses.filter.search.push(ch),
            _ => return,
        }
        expenses.selected = 0;
    }

    async fn handle_view_action(&mut self, action: AppAction) {
        match action {
            AppAction::Left => {
                self.state.navigation.prev();
                self.load_view().await;
            }
            AppAction::Right | AppAction::NextField => {
                self.state.navigation.next();
                self.load_view().await;
            }
            AppAction::Up | AppAction::Down => self.move_selection(action == AppAction::Down),
            AppAction::Input(ch) => self.handle_view_input(ch).await,
            _ => {}
        }
    }

    async fn handle_view_input(&mut self, ch: char) {
        if let Some(view) = View::from_shortcut(ch) {
            if self.state.navigation.go(view) {
                self.load_view().await;
            }
            return;
        }

        let view = self.state.navigation.current();
        match (view, ch) {
            (_, 'r') => self.refresh_view().await,
            (_, 'a') => self.open_expense_modal().await,
            (_, 'i') => self.open_income_modal(),
            (_, 'j') => self.move_selection(true),
            (_, 'k') => self.move_selection(false),
            (View::Expenses, '/') => self.state.expenses.searching = true,
            (View::Expenses, 'c') => self.state.expenses.cycle_category(),
            (View::Transactions, 'f') => {
                self.state.transactions.type_filter = self.state.transactions.type_filter.next();
                self.load_transactions().await;
            }
            (View::Transactions, 'd') => {
                self.state.transactions.range = self.state.transactions.range.next();
                self.load_transactions().await;
            }
            _ => {}
        }
    }

    fn move_selection(&mut self, down: bool) {
        match self.state.navigation.current() {
            View::Expenses => self.state.expenses.select(down),
            View::Transactions => self.state.transactions.select(down),
            _ => {}
        }
    }

    /// Loads what the current view shows. The dashboard reloads on every
    /// visit; list views only when not loaded yet.
    async fn load_view(&mut self) {
        match self.state.navigation.current() {
            View::Dashboard => self.reload_dashboard().await,
            View::Expenses if !self.state.expenses.loaded => self.load_expenses().await,
            View::Transactions if !self.state.transactions.loaded => self.load_transactions().await,
            View::Analytics if !self.state.analytics.loaded => self.load_analytics().await,
            _ => {}
        }
    }

    async fn refresh_view(&mut self) {
        match self.state.navigation.current() {
            View::Dashboard => self.reload_dashboard().await,
            View::Expenses => self.load_expenses().await,
            View::Transactions => self.load_transactions().await,
            View::Analytics => self.load_analytics().await,
            _ => {}
        }
    }

    pub async fn reload_dashboard(&mut self) {
        match self.state.dashboard.reload(&self.gateway).await {
            Ok(()) => self.state.last_refresh = Some(Utc::now().with_timezone(&self.timezone)),
            Err(err) => self.notify(ToastLevel::Error, err.to_string()),
        }
    }

    async fn load_expenses(&mut self) {
        match ExpenseBook::load(&self.gateway).await {
            Ok(book) => {
                let expenses = &mut self.state.expenses;
                if let CategoryFilter::Only(id) = &expenses.filter.category
                    && !book.categories.iter().any(|c| &c.id == id)
                {
                    expenses.filter.category = CategoryFilter::All;
                }
                expenses.book = book;
                expenses.loaded = true;
                expenses.error = None;
                expenses.selected = 0;
            }
            Err(err) => {
                tracing::error!("failed to load expenses: {err}");
                self.state.expenses.error = Some(expenses::LOAD_FAILED.to_string());
                self.notify(ToastLevel::Error, expenses::LOAD_FAILED);
            }
        }
    }

    async fn load_transactions(&mut self) {
        let query = self.state.transactions.query(self.today());
        match self.gateway.list::<Transactions>(&query).await {
            Ok(items) => {
                let transactions = &mut self.state.transactions;
                transactions.items = items;
                transactions.loaded = true;
                transactions.error = None;
                transactions.selected = 0;
            }
            Err(err) => {
                tracing::error!("failed to load transactions: {err}");
                self.state.transactions.error = Some(TRANSACTIONS_FAILED.to_string());
                self.notify(ToastLevel::Error, TRANSACTIONS_FAILED);
            }
        }
    }

    async fn load_analytics(&mut self) {
        match self.gateway.monthly_financial_summary().await {
            Ok(months) => {
                self.state.analytics.months = months;
                self.state.analytics.loaded = true;
                self.state.analytics.error = None;
            }
            Err(err) => {
                tracing::error!("failed to load monthly summary: {err}");
                self.state.analytics.error = Some(ANALYTICS_FAILED.to_string());
                self.notify(ToastLevel::Error, ANALYTICS_FAILED);
            }
        }
    }

    /// Opens the expense modal; it stays usable without categories if they
    /// cannot be fetched.
    pub async fn open_expense_modal(&mut self) {
        let query = Query::new().order_by("name", false);
        let categories = match self.gateway.list::<Categories>(&query).await {
            Ok(categories) => categories,
            Err(err) => {
                tracing::error!("failed to load categories: {err}");
                self.notify(ToastLevel::Error, CATEGORIES_FAILED);
                Vec::new()
            }
        };
        self.state.modal = Some(Modal::Expense(ExpenseModal::new(self.today(), categories)));
    }

    pub fn open_income_modal(&mut self) {
        self.state.modal = Some(Modal::Income(IncomeModal::new(self.today())));
    }

    /// Submits the open modal. Success closes it and reloads the dashboard
    /// once; failure keeps it open as typed.
    pub async fn submit_modal(&mut self) {
        let today = self.today();
        let result = match self.state.modal.as_mut() {
            Some(Modal::Expense(modal)) => modal.form.submit(&self.gateway, today).await.map(|_| EXPENSE_ADDED),
            Some(Modal::Income(modal)) => modal.form.submit(&self.gateway, today).await.map(|_| INCOME_ADDED),
            None => return,
        };

        match result {
            Ok(message) => {
                self.state.modal = None;
                self.notify(ToastLevel::Success, message);
                self.state.expenses.loaded = false;
                self.state.transactions.loaded = false;
                self.state.analytics.loaded = false;
                self.reload_dashboard().await;
                if self.state.navigation.current() != View::Dashboard {
                    self.load_view().await;
                }
            }
            Err(err) => self.notify(ToastLevel::Error, err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use engine::{MemoryGateway, Operation, forms::REQUIRED_FIELDS};
    use serde_json::json;

    fn app() -> App<MemoryGateway> {
        let config = AppConfig::default();
        let today = config.today().unwrap();
        App::new(&config, MemoryGateway::demo(today), "demo").unwrap()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn type_text(app: &mut App<MemoryGateway>, text: &str) {
        for ch in text.chars() {
            app.handle_key(press(KeyCode::Char(ch))).await;
        }
    }

    #[tokio::test]
    async fn adding_an_expense_creates_once_and_reloads_once() {
        let mut app = app();
        app.open_expense_modal().await;

        type_text(&mut app, "Coffee").await;
        app.handle_key(press(KeyCode::Tab)).await;
        type_text(&mut app, "4.5").await;
        app.handle_key(press(KeyCode::Tab)).await;
        app.handle_key(press(KeyCode::Tab)).await;
        app.handle_key(press(KeyCode::Tab)).await;
        app.handle_key(press(KeyCode::Right)).await;
        app.handle_key(press(KeyCode::Enter)).await;

        let gateway = &app.gateway;
        assert_eq!(gateway.count(Operation::Create("expenses")), 1);
        assert_eq!(gateway.count(Operation::SpendingSummary), 1);
        let create = gateway
            .journal()
            .into_iter()
            .find(|call| call.operation == Operation::Create("expenses"))
            .unwrap();
        assert_eq!(create.body.unwrap()["price"], json!(4.5));

        assert!(app.state.modal.is_none());
        let toast = app.state.toast.as_ref().unwrap();
        assert_eq!(toast.level, ToastLevel::Success);
        assert_eq!(toast.message, EXPENSE_ADDED);
        assert!(
            app.state
                .dashboard
                .model()
                .recent
                .iter()
                .any(|tx| tx.display_name == "Coffee")
        );
    }

    #[tokio::test]
    async fn adding_income_creates_once_and_reloads_once() {
        let mut app = app();
        app.open_income_modal();

        app.handle_key(press(KeyCode::Tab)).await;
        type_text(&mut app, "Consulting").await;
        app.handle_key(press(KeyCode::Tab)).await;
        type_text(&mut app, "1200").await;
        app.handle_key(press(KeyCode::Enter)).await;

        let gateway = &app.gateway;
        assert_eq!(gateway.count(Operation::Create("income")), 1);
        assert_eq!(gateway.count(Operation::SpendingSummary), 1);
        let create = gateway
            .journal()
            .into_iter()
            .find(|call| call.operation == Operation::Create("income"))
            .unwrap();
        let body = create.body.unwrap();
        assert_eq!(body["name"], json!("Consulting"));
        assert_eq!(body["price"], json!(1200.0));

        assert!(app.state.modal.is_none());
        let toast = app.state.toast.as_ref().unwrap();
        assert_eq!(toast.level, ToastLevel::Success);
        assert_eq!(toast.message, INCOME_ADDED);
        assert!(
            app.state
                .dashboard
                .model()
                .recent
                .iter()
                .any(|tx| tx.display_name == "Consulting")
        );
    }

    #[tokio::test]
    async fn invalid_expense_keeps_modal_without_gateway_call() {
        let mut app = app();
        app.open_expense_modal().await;
        type_text(&mut app, "Coffee").await;
        app.handle_key(press(KeyCode::Enter)).await;

        assert_eq!(app.gateway.count(Operation::Create("expenses")), 0);
        let Some(Modal::Expense(modal)) = &app.state.modal else {
            panic!("modal closed");
        };
        assert_eq!(modal.form.name, "Coffee");
        assert_eq!(app.state.toast.as_ref().unwrap().message, REQUIRED_FIELDS);
    }

    #[tokio::test]
    async fn q_is_text_inside_the_modal() {
        let mut app = app();
        app.open_income_modal();
        app.handle_key(press(KeyCode::Tab)).await;
        type_text(&mut app, "quarterly").await;
        assert!(!app.should_quit);
        let Some(Modal::Income(modal)) = &app.state.modal else {
            panic!("modal closed");
        };
        assert_eq!(modal.form.name, "quarterly");
    }

    #[tokio::test]
    async fn failed_reload_shows_one_error_and_keeps_model() {
        let mut app = app();
        app.reload_dashboard().await;
        let before = app.state.dashboard.model().clone();

        app.gateway.fail_next(Operation::SpendingSummary, "offline");
        app.reload_dashboard().await;

        assert_eq!(app.state.dashboard.model(), &before);
        assert!(!app.state.dashboard.is_loading());
        let toast = app.state.toast.as_ref().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.message, "Failed to load dashboard data");
    }

    #[tokio::test]
    async fn category_failure_still_opens_the_modal() {
        let mut app = app();
        app.gateway.fail_next(Operation::List("expense_categories"), "denied");
        app.open_expense_modal().await;
        assert!(matches!(app.state.modal, Some(Modal::Expense(_))));
        assert_eq!(app.state.toast.as_ref().unwrap().message, CATEGORIES_FAILED);
    }

    #[tokio::test]
    async fn digit_keys_switch_views_and_load_them() {
        let mut app = app();
        app.handle_key(press(KeyCode::Char('2'))).await;
        assert_eq!(app.state.navigation.current(), View::Expenses);
        assert!(app.state.expenses.loaded);
        assert_eq!(app.state.expenses.book.expenses.len(), 5);

        app.handle_key(press(KeyCode::Char('/'))).await;
        type_text(&mut app, "netflix").await;
        app.handle_key(press(KeyCode::Enter)).await;
        assert_eq!(app.state.expenses.book.filtered(&app.state.expenses.filter).len(), 1);

        app.handle_key(press(KeyCode::Char('4'))).await;
        assert_eq!(app.state.navigation.current(), View::Transactions);
        assert_eq!(app.state.transactions.items.len(), 6);
        app.handle_key(press(KeyCode::Char('f'))).await;
        assert_eq!(app.state.transactions.type_filter, TypeFilter::Debit);
        assert_eq!(app.state.transactions.items.len(), 5);
    }

    #[test]
    fn transaction_query_uses_type_and_range_filters() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let state = TransactionsState {
            type_filter: TypeFilter::Credit,
            range: DateRange::ThisMonth,
            ..TransactionsState::default()
        };
        assert_eq!(
            state.query(today).to_params(),
            vec![
                ("transaction_type".to_string(), "eq.credit".to_string()),
                ("trans_date".to_string(), "gte.2025-03-01".to_string()),
                ("trans_date".to_string(), "lte.2025-03-14".to_string()),
                ("order".to_string(), "trans_date.desc".to_string()),
            ]
        );
        assert_eq!(
            DateRange::Last30Days.bounds(today),
            NaiveDate::from_ymd_opt(2025, 2, 13).map(|start| (start, today))
        );
    }
}
