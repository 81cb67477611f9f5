//! Add-expense and add-income forms.
//!
//! Validation runs before any gateway call. A successful submission resets
//! the form; a rejected one leaves every field as the user typed it.

use api_types::{
    expense::{Expense, ExpenseNew, Expenses},
    income::{Income, IncomeNew, Incomes},
};
use chrono::NaiveDate;

use crate::{MoneyCents, error::FormError, gateway::Gateway};

pub const REQUIRED_FIELDS: &str = "Please fill in all required fields";
pub const INCOME_REQUIRED_FIELDS: &str = "Please fill in the required fields";
pub const INVALID_PRICE: &str = "Please enter a valid price";
pub const INVALID_AMOUNT: &str = "Please enter a valid amount";
pub const EXPENSE_ADDED: &str = "Expense added successfully!";
pub const INCOME_ADDED: &str = "Income added successfully!";
pub const EXPENSE_FAILED: &str = "Failed to add expense";
pub const INCOME_FAILED: &str = "Failed to add income";
pub const CATEGORIES_FAILED: &str = "Failed to load categories";

fn positive_amount(raw: &str, message: &'static str) -> Result<MoneyCents, FormError> {
    match raw.parse::<MoneyCents>() {
        Ok(amount) if amount.is_positive() => Ok(amount),
        _ => Err(FormError::Validation(message)),
    }
}

fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn gateway_message(err: impl std::fmt::Display, fallback: &str) -> FormError {
    let message = err.to_string();
    if message.trim().is_empty() {
        FormError::Gateway(fallback.to_string())
    } else {
        FormError::Gateway(message)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseForm {
    pub name: String,
    pub price: String,
    pub description: String,
    pub expense_date: NaiveDate,
    pub category_id: Option<String>,
}

impl ExpenseForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            price: String::new(),
            description: String::new(),
            expense_date: today,
            category_id: None,
        }
    }

    pub fn validate(&self) -> Result<ExpenseNew, FormError> {
        let name = self.name.trim();
        let category_id = self.category_id.as_deref().map(str::trim).unwrap_or("");
        if name.is_empty() || self.price.trim().is_empty() || category_id.is_empty() {
            return Err(FormError::Validation(REQUIRED_FIELDS));
        }
        let price = positive_amount(&self.price, INVALID_PRICE)?;

        Ok(ExpenseNew {
            name: name.to_string(),
            price: price.to_numeric(),
            description: optional_text(&self.description),
            expense_date: self.expense_date,
            category_id: category_id.to_string(),
        })
    }

    /// Validates and creates the expense. On success the form is reset to a
    /// blank one dated `today`.
    pub async fn submit<G: Gateway>(
        &mut self,
        gateway: &G,
        today: NaiveDate,
    ) -> Result<Expense, FormError> {
        let row = self.validate().inspect_err(|err| {
            tracing::warn!("expense form rejected: {err}");
        })?;
        match gateway.create::<Expenses>(&row).await {
            Ok(created) => {
                tracing::info!(id = %created.id, "expense created");
                *self = Self::new(today);
                Ok(created)
            }
            Err(err) => {
                tracing::error!("failed to add expense: {err}");
                Err(gateway_message(err, EXPENSE_FAILED))
            }
        }
    }
}

/// Income presets offered by the income form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IncomeType {
    Salary,
    Freelance,
    Business,
    Investment,
    Rental,
    Bonus,
    Gift,
    Refund,
    Other,
}

impl IncomeType {
    pub const ALL: [IncomeType; 9] = [
        Self::Salary,
        Self::Freelance,
        Self::Business,
        Self::Investment,
        Self::Rental,
        Self::Bonus,
        Self::Gift,
        Self::Refund,
        Self::Other,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Salary => "Salary",
            Self::Freelance => "Freelance",
            Self::Business => "Business",
            Self::Investment => "Investment",
            Self::Rental => "Rental",
            Self::Bonus => "Bonus",
            Self::Gift => "Gift",
            Self::Refund => "Refund",
            Self::Other => "Other",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Self::Salary => "💼",
            Self::Freelance => "💻",
            Self::Business => "🏢",
            Self::Investment => "📈",
            Self::Rental => "🏠",
            Self::Bonus => "🎁",
            Self::Gift => "🎉",
            Self::Refund => "↩️",
            Self::Other => "💰",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Salary => "Regular employment income",
            Self::Freelance => "Project-based work",
            Self::Business => "Business revenue",
            Self::Investment => "Returns and dividends",
            Self::Rental => "Property rental income",
            Self::Bonus => "Performance bonus",
            Self::Gift => "Monetary gifts",
            Self::Refund => "Product/service refunds",
            Self::Other => "Other income sources",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncomeForm {
    pub name: String,
    pub price: String,
    pub description: String,
    pub income_date: NaiveDate,
    pub income_type: Option<IncomeType>,
}

impl IncomeForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            price: String::new(),
            description: String::new(),
            income_date: today,
            income_type: None,
        }
    }

    /// Picks a preset; name and description are only filled when empty.
    pub fn select_type(&mut self, income_type: IncomeType) {
        self.income_type = Some(income_type);
        if self.name.is_empty() {
            self.name = income_type.name().to_string();
        }
        if self.description.is_empty() {
            self.description = income_type.description().to_string();
        }
    }

    pub fn validate(&self) -> Result<IncomeNew, FormError> {
        let name = self.name.trim();
        if name.is_empty() || self.price.trim().is_empty() {
            return Err(FormError::Validation(INCOME_REQUIRED_FIELDS));
        }
        let price = positive_amount(&self.price, INVALID_AMOUNT)?;

        Ok(IncomeNew {
            name: name.to_string(),
            price: price.to_numeric(),
            description: optional_text(&self.description),
            income_date: self.income_date,
        })
    }

    pub async fn submit<G: Gateway>(
        &mut self,
        gateway: &G,
        today: NaiveDate,
    ) -> Result<Income, FormError> {
        let row = self.validate().inspect_err(|err| {
            tracing::warn!("income form rejected: {err}");
        })?;
        match gateway.create::<Incomes>(&row).await {
            Ok(created) => {
                tracing::info!(id = %created.id, "income created");
                *self = Self::new(today);
                Ok(created)
            }
            Err(err) => {
                tracing::error!("failed to add income: {err}");
                Err(gateway_message(err, INCOME_FAILED))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{MemoryGateway, Operation};
    use api_types::{Query, transaction::Transactions};
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn filled_expense() -> ExpenseForm {
        ExpenseForm {
            name: " Coffee ".to_string(),
            price: "4.5".to_string(),
            description: "  ".to_string(),
            expense_date: today(),
            category_id: Some("cat-food".to_string()),
        }
    }

    #[test]
    fn expense_requires_name_price_and_category() {
        let mut form = filled_expense();
        form.category_id = None;
        assert_eq!(form.validate().unwrap_err(), FormError::Validation(REQUIRED_FIELDS));

        let mut form = filled_expense();
        form.name = "   ".to_string();
        assert_eq!(form.validate().unwrap_err(), FormError::Validation(REQUIRED_FIELDS));

        let mut form = filled_expense();
        form.price = String::new();
        assert_eq!(form.validate().unwrap_err(), FormError::Validation(REQUIRED_FIELDS));
    }

    #[test]
    fn expense_price_must_be_positive_number() {
        for bad in ["0", "-3", "abc", "1.234"] {
            let mut form = filled_expense();
            form.price = bad.to_string();
            assert_eq!(
                form.validate().unwrap_err(),
                FormError::Validation(INVALID_PRICE),
                "price {bad:?}"
            );
        }
    }

    #[test]
    fn expense_validation_trims_and_drops_blank_description() {
        let row = filled_expense().validate().unwrap();
        assert_eq!(row.name, "Coffee");
        assert_eq!(row.description, None);
        assert_eq!(row.price.as_str(), Some("4.50"));
        assert_eq!(row.category_id, "cat-food");
    }

    #[test]
    fn income_type_prefills_only_empty_fields() {
        let mut form = IncomeForm::new(today());
        form.select_type(IncomeType::Salary);
        assert_eq!(form.name, "Salary");
        assert_eq!(form.description, "Regular employment income");

        let mut form = IncomeForm::new(today());
        form.name = "March payroll".to_string();
        form.select_type(IncomeType::Bonus);
        assert_eq!(form.name, "March payroll");
        assert_eq!(form.description, "Performance bonus");
        assert_eq!(form.income_type, Some(IncomeType::Bonus));
    }

    #[test]
    fn income_does_not_need_a_category() {
        let mut form = IncomeForm::new(today());
        form.name = "Gift".to_string();
        form.price = "25".to_string();
        let row = form.validate().unwrap();
        assert_eq!(row.price.as_str(), Some("25.00"));

        form.price = "0".to_string();
        assert_eq!(form.validate().unwrap_err(), FormError::Validation(INVALID_AMOUNT));
    }

    #[tokio::test]
    async fn income_submit_creates_once_records_a_credit_and_resets() {
        let gateway = MemoryGateway::demo(today());
        let mut form = IncomeForm::new(today());
        form.select_type(IncomeType::Freelance);
        form.price = "150.5".to_string();

        let created = form.submit(&gateway, today()).await.unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(form, IncomeForm::new(today()));

        let creates: Vec<_> = gateway
            .journal()
            .into_iter()
            .filter(|call| call.operation == Operation::Create("income"))
            .collect();
        assert_eq!(creates.len(), 1);
        let body = creates[0].body.as_ref().unwrap();
        assert_eq!(body["price"], json!(150.5));
        assert_eq!(body["income_date"], json!("2025-03-14"));

        let credits = gateway
            .list::<Transactions>(&Query::new().eq("transaction_type", "credit").eq("name", created.name.as_str()))
            .await
            .unwrap();
        assert_eq!(credits.len(), 1);
        assert_eq!(credits[0].trans_date, Some(today()));
        assert_eq!(MoneyCents::coerce(&credits[0].amount), MoneyCents::new(15_050));
    }

    #[tokio::test]
    async fn income_submit_failure_keeps_the_form() {
        let gateway = MemoryGateway::demo(today());
        let mut form = IncomeForm::new(today());
        form.name = "Gift".to_string();
        form.price = "25".to_string();
        let before = form.clone();

        gateway.fail_next(Operation::Create("income"), "permission denied for table income");
        let err = form.submit(&gateway, today()).await.unwrap_err();
        assert_eq!(err, FormError::Gateway("permission denied for table income".to_string()));
        assert_eq!(form, before);

        gateway.fail_next(Operation::Create("income"), "");
        let err = form.submit(&gateway, today()).await.unwrap_err();
        assert_eq!(err, FormError::Gateway(INCOME_FAILED.to_string()));
        assert_eq!(form, before);

        let credits = gateway
            .list::<Transactions>(&Query::new().eq("transaction_type", "credit").eq("name", "Gift"))
            .await
            .unwrap();
        assert!(credits.is_empty());
        assert_eq!(gateway.count(Operation::Create("income")), 2);
    }
}
