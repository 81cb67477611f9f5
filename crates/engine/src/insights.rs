//! Advisory messages derived from the current totals.

use crate::{Currency, breakdown::Breakdown, summary::SpendingSummary};

pub const NO_EXPENSES_YET: &str = "No expenses recorded yet.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsightKind {
    Info,
    Success,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub message: String,
}

/// Always three insights, in order: overview, balance polarity, top category.
pub fn build(summary: &SpendingSummary, breakdown: &Breakdown, currency: Currency) -> Vec<Insight> {
    vec![
        overview(summary, currency),
        polarity(summary, currency),
        top_category(breakdown, currency),
    ]
}

fn overview(summary: &SpendingSummary, currency: Currency) -> Insight {
    Insight {
        kind: InsightKind::Info,
        title: "Spending overview".to_string(),
        message: format!(
            "You have {} transactions with a net amount of {}.",
            summary.transaction_count,
            summary.net_amount.format(currency)
        ),
    }
}

fn polarity(summary: &SpendingSummary, currency: Currency) -> Insight {
    if summary.is_positive_balance() {
        Insight {
            kind: InsightKind::Success,
            title: "Positive balance".to_string(),
            message: "Your income covers your expenses. Keep it up!".to_string(),
        }
    } else {
        Insight {
            kind: InsightKind::Warning,
            title: "Budget alert".to_string(),
            message: format!(
                "Your expenses exceed your income by {}.",
                summary.net_amount.abs().format(currency)
            ),
        }
    }
}

fn top_category(breakdown: &Breakdown, currency: Currency) -> Insight {
    let message = match breakdown.top() {
        Some(top) => format!(
            "{} is your top spending category at {} ({}% of expenses).",
            top.name,
            top.amount.format(currency),
            top.percentage
        ),
        None => NO_EXPENSES_YET.to_string(),
    };
    Insight {
        kind: InsightKind::Info,
        title: "Top category".to_string(),
        message,
    }
}
