//! Connectivity check: a fixed sequence of read checks against the gateway.
//!
//! A failing check never stops the ones after it.

use api_types::{Query, category::Categories, expense::Expenses, income::Incomes, views::SpendingSummaryParams};

use crate::{Currency, gateway::Gateway, summary::SpendingSummary};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CheckStatus {
    Success(String),
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Check {
    pub name: &'static str,
    pub status: CheckStatus,
}

impl Check {
    pub fn passed(&self) -> bool {
        matches!(self.status, CheckStatus::Success(_))
    }
}

pub async fn run_checks<G: Gateway>(gateway: &G, currency: Currency) -> Vec<Check> {
    let mut checks = Vec::with_capacity(5);

    let status = match gateway.list::<Categories>(&Query::new()).await {
        Ok(rows) => CheckStatus::Success(format!("Found {} expense categories", rows.len())),
        Err(err) => CheckStatus::Failed(err.to_string()),
    };
    checks.push(Check {
        name: "Fetch Expense Categories",
        status,
    });

    let status = match gateway.list::<Expenses>(&Query::new()).await {
        Ok(rows) => CheckStatus::Success(format!("Found {} expenses", rows.len())),
        Err(err) => CheckStatus::Failed(err.to_string()),
    };
    checks.push(Check {
        name: "Fetch Expenses",
        status,
    });

    let status = match gateway.list::<Incomes>(&Query::new()).await {
        Ok(rows) => CheckStatus::Success(format!("Found {} income records", rows.len())),
        Err(err) => CheckStatus::Failed(err.to_string()),
    };
    checks.push(Check {
        name: "Fetch Income",
        status,
    });

    let status = match gateway.expense_summary_by_category().await {
        Ok(rows) => CheckStatus::Success(format!("Found {} category summaries", rows.len())),
        Err(err) => CheckStatus::Failed(err.to_string()),
    };
    checks.push(Check {
        name: "Expense Summary by Category",
        status,
    });

    let status = match gateway.spending_summary(&SpendingSummaryParams::default()).await {
        Ok(rows) => CheckStatus::Success(match rows.first() {
            Some(row) => {
                let summary = SpendingSummary::from_row(row);
                format!(
                    "Expenses: {}, Income: {}, Net: {}",
                    summary.total_expenses.format(currency),
                    summary.total_income.format(currency),
                    summary.net_amount.format(currency)
                )
            }
            None => "No data returned".to_string(),
        }),
        Err(err) => CheckStatus::Failed(err.to_string()),
    };
    checks.push(Check {
        name: "Spending Summary Function",
        status,
    });

    for check in &checks {
        match &check.status {
            CheckStatus::Success(detail) => tracing::info!(check = check.name, "{detail}"),
            CheckStatus::Failed(message) => tracing::error!(check = check.name, "{message}"),
        }
    }
    checks
}
