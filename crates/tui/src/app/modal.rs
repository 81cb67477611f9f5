//! Input state of the add-expense and add-income modals.

use api_types::category::Category;
use chrono::{Days, NaiveDate};
use engine::forms::{ExpenseForm, IncomeForm, IncomeType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseField {
    Name,
    Price,
    Description,
    Date,
    Category,
}

impl ExpenseField {
    const ORDER: [ExpenseField; 5] = [
        Self::Name,
        Self::Price,
        Self::Description,
        Self::Date,
        Self::Category,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name *",
            Self::Price => "Price *",
            Self::Description => "Description",
            Self::Date => "Date",
            Self::Category => "Category *",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomeField {
    Type,
    Name,
    Price,
    Description,
    Date,
}

impl IncomeField {
    const ORDER: [IncomeField; 5] = [
        Self::Type,
        Self::Name,
        Self::Price,
        Self::Description,
        Self::Date,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Type => "Type",
            Self::Name => "Name *",
            Self::Price => "Amount *",
            Self::Description => "Description",
            Self::Date => "Date",
        }
    }
}

fn cycle<T: Copy + PartialEq>(order: &[T], current: T, forward: bool) -> T {
    let position = order.iter().position(|f| *f == current).unwrap_or(0);
    let len = order.len();
    let next = if forward { (position + 1) % len } else { (position + len - 1) % len };
    order[next]
}

fn shift_date(date: NaiveDate, forward: bool) -> NaiveDate {
    let shifted = if forward {
        date.checked_add_days(Days::new(1))
    } else {
        date.checked_sub_days(Days::new(1))
    };
    shifted.unwrap_or(date)
}

#[derive(Debug, Clone)]
pub struct ExpenseModal {
    pub form: ExpenseForm,
    pub focus: ExpenseField,
    pub categories: Vec<Category>,
}

impl ExpenseModal {
    pub fn new(today: NaiveDate, categories: Vec<Category>) -> Self {
        Self {
            form: ExpenseForm::new(today),
            focus: ExpenseField::Name,
            categories,
        }
    }

    pub fn focus_next(&mut self, forward: bool) {
        self.focus = cycle(&ExpenseField::ORDER, self.focus, forward);
    }

    pub fn selected_category(&self) -> Option<&Category> {
        let id = self.form.category_id.as_deref()?;
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn input(&mut self, ch: char) {
        match self.focus {
            ExpenseField::Name => self.form.name.push(ch),
            ExpenseField::Price => self.form.price.push(ch),
            ExpenseField::Description => self.form.description.push(ch),
            ExpenseField::Date | ExpenseField::Category => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            ExpenseField::Name => {
                self.form.name.pop();
            }
            ExpenseField::Price => {
                self.form.price.pop();
            }
            ExpenseField::Description => {
                self.form.description.pop();
            }
            ExpenseField::Date | ExpenseField::Category => {}
        }
    }

    /// Left/right on the date and category pickers.
    pub fn adjust(&mut self, forward: bool) {
        match self.focus {
            ExpenseField::Date => self.form.expense_date = shift_date(self.form.expense_date, forward),
            ExpenseField::Category => {
                if self.categories.is_empty() {
                    return;
                }
                let len = self.categories.len();
                let position = self
                    .form
                    .category_id
                    .as_deref()
                    .and_then(|id| self.categories.iter().position(|c| c.id == id));
                let next = match (position, forward) {
                    (None, true) => 0,
                    (None, false) => len - 1,
                    (Some(p), true) => (p + 1) % len,
                    (Some(p), false) => (p + len - 1) % len,
                };
                self.form.category_id = Some(self.categories[next].id.clone());
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone)]
pub struct IncomeModal {
    pub form: IncomeForm,
    pub focus: IncomeField,
}

impl IncomeModal {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            form: IncomeForm::new(today),
            focus: IncomeField::Type,
        }
    }

    pub fn focus_next(&mut self, forward: bool) {
        self.focus = cycle(&IncomeField::ORDER, self.focus, forward);
    }

    pub fn input(&mut self, ch: char) {
        match self.focus {
            IncomeField::Name => self.form.name.push(ch),
            IncomeField::Price => self.form.price.push(ch),
            IncomeField::Description => self.form.description.push(ch),
            IncomeField::Type | IncomeField::Date => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.focus {
            IncomeField::Name => {
                self.form.name.pop();
            }
            IncomeField::Price => {
                self.form.price.pop();
            }
            IncomeField::Description => {
                self.form.description.pop();
            }
            IncomeField::Type | IncomeField::Date => {}
        }
    }

    pub fn adjust(&mut self, forward: bool) {
        match self.focus {
            IncomeField::Date => self.form.income_date = shift_date(self.form.income_date, forward),
            IncomeField::Type => {
                let next = match self.form.income_type {
                    Some(current) => cycle(&IncomeType::ALL, current, forward),
                    None if forward => IncomeType::ALL[0],
                    None => IncomeType::ALL[IncomeType::ALL.len() - 1],
                };
                self.form.select_type(next);
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone)]
pub enum Modal {
    Expense(ExpenseModal),
    Income(IncomeModal),
}

impl Modal {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Expense(_) => "Add Expense",
            Self::Income(_) => "Add Income",
        }
    }

    pub fn focus_next(&mut self, forward: bool) {
        match self {
            Self::Expense(m) => m.focus_next(forward),
            Self::Income(m) => m.focus_next(forward),
        }
    }

    pub fn input(&mut self, ch: char) {
        match self {
            Self::Expense(m) => m.input(ch),
            Self::Income(m) => m.input(ch),
        }
    }

    pub fn backspace(&mut self) {
        match self {
            Self::Expense(m) => m.backspace(),
            Self::Income(m) => m.backspace(),
        }
    }

    pub fn adjust(&mut self, forward: bool) {
        match self {
            Self::Expense(m) => m.adjust(forward),
            Self::Income(m) => m.adjust(forward),
        }
    }
}
