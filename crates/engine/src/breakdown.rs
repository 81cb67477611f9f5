//! Per-category share of total expenses.
//!
//! The total is taken over every category row *before* non-positive rows are
//! dropped. Each percentage is rounded on its own (half up), so the displayed
//! shares are not forced to add up to 100.

use api_types::views::CategorySummary;

use crate::{
    MoneyCents,
    palette::{ColorToken, color_for},
};

const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryShare {
    pub category_id: Option<String>,
    pub name: String,
    pub amount: MoneyCents,
    /// Share of the total in whole percent, `0..=100`.
    pub percentage: u8,
    pub item_count: u64,
    pub color: ColorToken,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Breakdown {
    /// Sum of every category amount, including the ones filtered out.
    pub total: MoneyCents,
    /// Positive categories, largest first.
    pub shares: Vec<CategoryShare>,
}

impl Breakdown {
    pub fn from_rows(rows: &[CategorySummary]) -> Self {
        let amounts: Vec<MoneyCents> = rows
            .iter()
            .map(|row| MoneyCents::coerce(&row.total_amount))
            .collect();
        let total: MoneyCents = amounts.iter().copied().sum();

        let mut shares: Vec<CategoryShare> = rows
            .iter()
            .zip(amounts)
            .filter(|(_, amount)| amount.is_positive())
            .map(|(row, amount)| CategoryShare {
                category_id: row.category_id.clone(),
                name: row
                    .category_name
                    .as_deref()
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .unwrap_or(UNCATEGORIZED)
                    .to_string(),
                amount,
                percentage: percentage_of(amount, total),
                item_count: row.expense_count,
                color: ColorToken::Red,
            })
            .collect();

        // Stable: equal amounts keep their row order.
        shares.sort_by(|a, b| b.amount.cmp(&a.amount));
        for (position, share) in shares.iter_mut().enumerate() {
            share.color = color_for(position);
        }

        Self { total, shares }
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    pub fn top(&self) -> Option<&CategoryShare> {
        self.shares.first()
    }
}

/// `round(amount / total * 100)` with half-up rounding, clamped to `0..=100`.
///
/// Returns 0 when `total` is not positive.
#[must_use]
pub fn percentage_of(amount: MoneyCents, total: MoneyCents) -> u8 {
    let total = i128::from(total.cents());
    if total <= 0 {
        return 0;
    }
    let amount = i128::from(amount.cents().max(0));
    let rounded = (amount * 200 + total) / (2 * total);
    rounded.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::Numeric;

    fn row(name: &str, amount: &str, count: u64) -> CategorySummary {
        CategorySummary {
            category_id: Some(format!("id-{name}")),
            category_name: Some(name.to_string()),
            total_amount: Numeric::new(amount),
            expense_count: count,
        }
    }

    #[test]
    fn orders_and_percentages_for_sample_month() {
        let breakdown = Breakdown::from_rows(&[
            row("Food", "800", 5),
            row("Transport", "400.50", 3),
            row("Bills", "500", 4),
        ]);

        let names: Vec<_> = breakdown.shares.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Food", "Bills", "Transport"]);
        let percentages: Vec<_> = breakdown.shares.iter().map(|s| s.percentage).collect();
        assert_eq!(percentages, [47, 29, 24]);
        assert_eq!(breakdown.total, MoneyCents::new(170_050));
        assert_eq!(breakdown.shares[2].item_count, 3);
    }

    #[test]
    fn total_counts_rows_before_filtering() {
        let breakdown = Breakdown::from_rows(&[
            row("Food", "90", 1),
            row("Refunds", "-30", 1),
            row("Empty", "0", 0),
            row("Broken", "n/a", 2),
        ]);
        assert_eq!(breakdown.total, MoneyCents::new(6_000));
        assert_eq!(breakdown.shares.len(), 1);
        assert!(breakdown.shares.iter().all(|s| s.amount.is_positive()));
        // 90 / 60 would be 150%; the share is clamped.
        assert_eq!(breakdown.shares[0].percentage, 100);
    }

    #[test]
    fn ties_keep_row_order() {
        let breakdown = Breakdown::from_rows(&[
            row("First", "10", 1),
            row("Big", "30", 1),
            row("Second", "10", 1),
        ]);
        let names: Vec<_> = breakdown.shares.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Big", "First", "Second"]);
    }

    #[test]
    fn shares_are_rounded_independently() {
        let breakdown = Breakdown::from_rows(&[
            row("A", "1", 1),
            row("B", "1", 1),
            row("C", "1", 1),
        ]);
        let sum: u32 = breakdown.shares.iter().map(|s| u32::from(s.percentage)).sum();
        // 33 + 33 + 33: no normalization to 100.
        assert_eq!(sum, 99);

        let breakdown = Breakdown::from_rows(&[row("A", "1", 1), row("B", "1", 1)]);
        let sum: u32 = breakdown.shares.iter().map(|s| u32::from(s.percentage)).sum();
        assert_eq!(sum, 100);

        let breakdown = Breakdown::from_rows(&[
            row("A", "5", 1),
            row("B", "5", 1),
            row("C", "5", 1),
            row("D", "5", 1),
            row("E", "5", 1),
            row("F", "5", 1),
            row("G", "5", 1),
            row("H", "5", 1),
        ]);
        // 12.5% each rounds up to 13, summing to 104.
        let sum: u32 = breakdown.shares.iter().map(|s| u32::from(s.percentage)).sum();
        assert_eq!(sum, 104);
    }

    #[test]
    fn percentage_matches_formula_and_bounds() {
        assert_eq!(percentage_of(MoneyCents::new(1), MoneyCents::new(8)), 13);
        assert_eq!(percentage_of(MoneyCents::new(1), MoneyCents::new(3)), 33);
        assert_eq!(percentage_of(MoneyCents::new(2), MoneyCents::new(3)), 67);
        assert_eq!(percentage_of(MoneyCents::new(5), MoneyCents::ZERO), 0);
        assert_eq!(percentage_of(MoneyCents::new(5), MoneyCents::new(-10)), 0);
        assert_eq!(percentage_of(MoneyCents::new(10), MoneyCents::new(10)), 100);
    }

    #[test]
    fn colors_follow_sorted_position() {
        let rows: Vec<_> = (1..=8).map(|i| row(&format!("C{i}"), &i.to_string(), 1)).collect();
        let breakdown = Breakdown::from_rows(&rows);
        assert_eq!(breakdown.shares[0].name, "C8");
        assert_eq!(breakdown.shares[0].color, ColorToken::Red);
        assert_eq!(breakdown.shares[6].color, ColorToken::Teal);
        assert_eq!(breakdown.shares[7].color, ColorToken::Red);
    }

    #[test]
    fn missing_names_fall_back() {
        let breakdown = Breakdown::from_rows(&[CategorySummary {
            total_amount: Numeric::new("5"),
            ..CategorySummary::default()
        }]);
        assert_eq!(breakdown.shares[0].name, "Uncategorized");
    }
}
