//! Dashboard load cycle.
//!
//! A load issues the spending summary, recent transactions and category
//! summary queries together and rebuilds the whole model from their results.
//! If any query fails the previous model stays on screen; the loading flag is
//! cleared either way.

use api_types::views::{self, SpendingSummaryParams};
use chrono::NaiveDate;

use crate::{
    Currency, MoneyCents,
    breakdown::Breakdown,
    error::LoadError,
    gateway::{Gateway, Operation},
    insights::{self, Insight},
    summary::SpendingSummary,
};

/// Rows shown in the recent transactions card.
pub const DEFAULT_RECENT_LIMIT: u64 = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecentTransaction {
    pub id: String,
    pub display_name: String,
    pub category_label: String,
    /// Positive for credits, negative for debits.
    pub amount: MoneyCents,
    pub is_credit: bool,
    pub date: Option<NaiveDate>,
}

impl RecentTransaction {
    pub fn from_row(row: &views::RecentTransaction) -> Self {
        let is_credit = row.transaction_type.as_deref() == Some("credit");
        let magnitude = MoneyCents::coerce(&row.amount).abs();
        let display_name = [row.name.as_deref(), row.description.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or("Transaction")
            .to_string();
        let category_label = row
            .category_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| {
                let fallback = if is_credit { "Income" } else { "Uncategorized" };
                fallback.to_string()
            });

        Self {
            id: row.id.clone(),
            display_name,
            category_label,
            amount: if is_credit { magnitude } else { -magnitude },
            is_credit,
            date: row.trans_date,
        }
    }
}

/// Everything the dashboard screen renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardModel {
    pub summary: SpendingSummary,
    pub recent: Vec<RecentTransaction>,
    pub breakdown: Breakdown,
    pub insights: Vec<Insight>,
}

impl DashboardModel {
    /// All-zero model shown before the first successful load.
    pub fn empty(currency: Currency) -> Self {
        Self::from_parts(SpendingSummary::default(), Vec::new(), Breakdown::default(), currency)
    }

    pub fn from_parts(
        summary: SpendingSummary,
        recent: Vec<RecentTransaction>,
        breakdown: Breakdown,
        currency: Currency,
    ) -> Self {
        let insights = insights::build(&summary, &breakdown, currency);
        Self {
            summary,
            recent,
            breakdown,
            insights,
        }
    }
}

#[derive(Debug)]
pub struct Dashboard {
    model: DashboardModel,
    loading: bool,
    currency: Currency,
    recent_limit: u64,
}

impl Dashboard {
    pub fn new(currency: Currency, recent_limit: u64) -> Self {
        Self {
            model: DashboardModel::empty(currency),
            loading: false,
            currency,
            recent_limit,
        }
    }

    pub fn model(&self) -> &DashboardModel {
        &self.model
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Fetches the three aggregates and replaces the model on success.
    pub async fn reload<G: Gateway>(&mut self, gateway: &G) -> Result<(), LoadError> {
        self.loading = true;
        let result = fetch_model(gateway, self.currency, self.recent_limit).await;
        self.loading = false;

        match result {
            Ok(model) => {
                tracing::info!(
                    transactions = model.summary.transaction_count,
                    categories = model.breakdown.shares.len(),
                    "dashboard loaded"
                );
                self.model = model;
                Ok(())
            }
            Err(err) => {
                tracing::error!(operation = %err.operation, "failed to load dashboard: {}", err.source);
                Err(err)
            }
        }
    }
}

async fn fetch_model<G: Gateway>(
    gateway: &G,
    currency: Currency,
    recent_limit: u64,
) -> Result<DashboardModel, LoadError> {
    let params = SpendingSummaryParams::default();
    let (summary, recent, categories) = tokio::join!(
        gateway.spending_summary(&params),
        gateway.recent_transactions_detailed(recent_limit),
        gateway.expense_summary_by_category(),
    );

    let summary = summary.map_err(|source| LoadError {
        operation: Operation::SpendingSummary,
        source,
    })?;
    let recent = recent.map_err(|source| LoadError {
        operation: Operation::RecentTransactions,
        source,
    })?;
    let categories = categories.map_err(|source| LoadError {
        operation: Operation::CategorySummary,
        source,
    })?;

    Ok(DashboardModel::from_parts(
        SpendingSummary::from_rows(&summary),
        recent.iter().map(RecentTransaction::from_row).collect(),
        Breakdown::from_rows(&categories),
        currency,
    ))
}
