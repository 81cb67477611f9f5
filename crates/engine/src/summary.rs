use api_types::views::SpendingSummaryRow;

use crate::MoneyCents;

/// Totals returned by the spending summary procedure.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpendingSummary {
    pub total_income: MoneyCents,
    pub total_expenses: MoneyCents,
    pub net_amount: MoneyCents,
    pub transaction_count: u64,
}

impl SpendingSummary {
    /// Reads the first row; an empty result set gives all-zero totals.
    pub fn from_rows(rows: &[SpendingSummaryRow]) -> Self {
        rows.first().map(Self::from_row).unwrap_or_default()
    }

    pub fn from_row(row: &SpendingSummaryRow) -> Self {
        Self {
            total_income: MoneyCents::coerce(&row.total_income),
            total_expenses: MoneyCents::coerce(&row.total_expenses),
            net_amount: MoneyCents::coerce(&row.net_amount),
            transaction_count: row.transaction_count,
        }
    }

    pub fn is_positive_balance(&self) -> bool {
        !self.net_amount.is_negative()
    }
}
