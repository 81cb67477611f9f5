//! Expense list: loading, search/category filtering and summary figures.

use api_types::{
    Query,
    category::{Categories, Category},
    expense::{Expense, Expenses},
};
use unicode_normalization::UnicodeNormalization;

use crate::{
    MoneyCents,
    gateway::{Gateway, GatewayResult},
};

pub const LOAD_FAILED: &str = "Failed to load expenses";

/// Emoji shown next to well-known category names.
#[must_use]
pub fn category_emoji(name: &str) -> &'static str {
    match name {
        "Food & Dining" => "🍽️",
        "Transportation" => "🚗",
        "Entertainment" => "🎬",
        "Shopping" => "🛍️",
        "Bills & Utilities" => "💡",
        "Healthcare" => "🏥",
        "Education" => "📚",
        "Travel" => "✈️",
        "Personal Care" => "💅",
        _ => "📦",
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub search: String,
    pub category: CategoryFilter,
}

impl ExpenseFilter {
    /// Search is case-insensitive over name and description; an empty
    /// search matches everything.
    pub fn matches(&self, expense: &Expense) -> bool {
        let needle = normalize(&self.search);
        let matches_search = needle.is_empty()
            || normalize(&expense.name).contains(&needle)
            || expense
                .description
                .as_deref()
                .is_some_and(|d| normalize(d).contains(&needle));

        let matches_category = match &self.category {
            CategoryFilter::All => true,
            CategoryFilter::Only(id) => expense.category_id.as_deref() == Some(id.as_str()),
        };

        matches_search && matches_category
    }

    pub fn apply<'a>(&self, expenses: &'a [Expense]) -> Vec<&'a Expense> {
        expenses.iter().filter(|e| self.matches(e)).collect()
    }
}

fn normalize(value: &str) -> String {
    value.nfkc().collect::<String>().to_lowercase()
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExpenseStats {
    pub total: MoneyCents,
    pub count: u64,
    pub average: MoneyCents,
}

impl ExpenseStats {
    pub fn of(expenses: &[&Expense]) -> Self {
        let total: MoneyCents = expenses.iter().map(|e| MoneyCents::coerce(&e.price)).sum();
        let count = expenses.len() as u64;
        Self {
            total,
            count,
            average: total.average(count),
        }
    }
}

/// Expenses (with their category embedded) and the category list, loaded together.
#[derive(Clone, Debug, Default)]
pub struct ExpenseBook {
    pub expenses: Vec<Expense>,
    pub categories: Vec<Category>,
}

impl ExpenseBook {
    pub async fn load<G: Gateway>(gateway: &G) -> GatewayResult<Self> {
        let expenses = gateway
            .list::<Expenses>(&Query::new().order_by("expense_date", true))
            .await?;
        let categories = gateway
            .list::<Categories>(&Query::new().order_by("name", false))
            .await?;
        tracing::debug!(
            expenses = expenses.len(),
            categories = categories.len(),
            "expense book loaded"
        );
        Ok(Self {
            expenses,
            categories,
        })
    }

    pub fn filtered(&self, filter: &ExpenseFilter) -> Vec<&Expense> {
        filter.apply(&self.expenses)
    }

    /// Display label of an expense's category, with its emoji.
    pub fn category_label(&self, expense: &Expense) -> String {
        let name = expense
            .category
            .as_ref()
            .map(|c| c.name.as_str())
            .or_else(|| {
                let id = expense.category_id.as_deref()?;
                self.categories
                    .iter()
                    .find(|c| c.id == id)
                    .map(|c| c.name.as_str())
            })
            .unwrap_or("Others");
        format!("{} {name}", category_emoji(name))
    }
}
