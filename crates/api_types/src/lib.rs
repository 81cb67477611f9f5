//! Wire types of the hosted Postgres REST layer.
//!
//! Tables are described by a [`Resource`] marker (table name, select clause,
//! row/insert/update shapes). Views and the spending summary procedure have
//! their own row types in [`views`]. Numeric columns travel as [`Numeric`],
//! which never fails to deserialize.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

pub use numeric::Numeric;
pub use query::{Filter, FilterOp, Order, Query};

/// A table reachable through the REST layer.
pub trait Resource: Send + Sync + 'static {
    /// Table name, also the last path segment of the endpoint.
    const TABLE: &'static str;
    /// PostgREST `select` clause used for reads and returned representations.
    const SELECT: &'static str = "*";

    type Row: DeserializeOwned + Serialize + Clone + std::fmt::Debug + Send + Sync + 'static;
    type Insert: Serialize + std::fmt::Debug + Send + Sync;
    type Update: Serialize + std::fmt::Debug + Send + Sync;
}

pub mod numeric {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// A Postgres `numeric` as carried over JSON.
    ///
    /// The REST layer may send numbers, numeric strings or `null`. The raw text is
    /// kept as-is; interpretation (and coercion of garbage to zero) is left to the
    /// consumer. Serializes back as a JSON number whenever the text is numeric.
    #[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Numeric(Option<String>);

    impl Numeric {
        pub fn new(raw: impl Into<String>) -> Self {
            let raw = raw.into();
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Self(None);
            }
            Self(Some(trimmed.to_string()))
        }

        pub const fn null() -> Self {
            Self(None)
        }

        pub fn as_str(&self) -> Option<&str> {
            self.0.as_deref()
        }

        pub fn is_null(&self) -> bool {
            self.0.is_none()
        }
    }

    impl From<&str> for Numeric {
        fn from(value: &str) -> Self {
            Self::new(value)
        }
    }

    impl From<i64> for Numeric {
        fn from(value: i64) -> Self {
            Self(Some(value.to_string()))
        }
    }

    impl Serialize for Numeric {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self.0.as_deref() {
                Some(raw) => match raw.parse::<serde_json::Number>() {
                    Ok(number) => number.serialize(serializer),
                    Err(_) => serializer.serialize_str(raw),
                },
                None => serializer.serialize_none(),
            }
        }
    }

    impl<'de> Deserialize<'de> for Numeric {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let value = serde_json::Value::deserialize(deserializer)?;
            Ok(match value {
                serde_json::Value::Number(number) => Self(Some(number.to_string())),
                serde_json::Value::String(raw) => Self::new(raw),
                _ => Self(None),
            })
        }
    }
}

pub mod query {
    /// Comparison operators supported by the REST filters we issue.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum FilterOp {
        Eq,
        Gte,
        Lte,
    }

    impl FilterOp {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Eq => "eq",
                Self::Gte => "gte",
                Self::Lte => "lte",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Filter {
        pub column: String,
        pub op: FilterOp,
        pub value: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct Order {
        pub column: String,
        pub descending: bool,
    }

    /// Row filter, ordering and limit for a list read.
    ///
    /// ```rust
    /// use api_types::Query;
    ///
    /// let query = Query::new().eq("transaction_type", "credit").limit(5);
    /// assert_eq!(
    ///     query.to_params(),
    ///     vec![
    ///         ("transaction_type".to_string(), "eq.credit".to_string()),
    ///         ("limit".to_string(), "5".to_string()),
    ///     ]
    /// );
    /// ```
    #[derive(Clone, Debug, Default, PartialEq, Eq)]
    pub struct Query {
        filters: Vec<Filter>,
        order: Option<Order>,
        limit: Option<u64>,
    }

    impl Query {
        pub fn new() -> Self {
            Self::default()
        }

        fn filter(mut self, column: &str, op: FilterOp, value: impl ToString) -> Self {
            self.filters.push(Filter {
                column: column.to_string(),
                op,
                value: value.to_string(),
            });
            self
        }

        pub fn eq(self, column: &str, value: impl ToString) -> Self {
            self.filter(column, FilterOp::Eq, value)
        }

        pub fn gte(self, column: &str, value: impl ToString) -> Self {
            self.filter(column, FilterOp::Gte, value)
        }

        pub fn lte(self, column: &str, value: impl ToString) -> Self {
            self.filter(column, FilterOp::Lte, value)
        }

        pub fn order_by(mut self, column: &str, descending: bool) -> Self {
            self.order = Some(Order {
                column: column.to_string(),
                descending,
            });
            self
        }

        pub fn limit(mut self, limit: u64) -> Self {
            self.limit = Some(limit);
            self
        }

        pub fn filters(&self) -> &[Filter] {
            &self.filters
        }

        pub fn order(&self) -> Option<&Order> {
            self.order.as_ref()
        }

        pub fn row_limit(&self) -> Option<u64> {
            self.limit
        }

        /// Query string pairs in PostgREST syntax (`col=op.value`, `order`, `limit`).
        pub fn to_params(&self) -> Vec<(String, String)> {
            let mut params: Vec<(String, String)> = self
                .filters
                .iter()
                .map(|f| (f.column.clone(), format!("{}.{}", f.op.as_str(), f.value)))
                .collect();
            if let Some(order) = &self.order {
                let direction = if order.descending { "desc" } else { "asc" };
                params.push(("order".to_string(), format!("{}.{direction}", order.column)));
            }
            if let Some(limit) = self.limit {
                params.push(("limit".to_string(), limit.to_string()));
            }
            params
        }
    }
}

/// Tolerant field decoders for columns whose JSON shape varies between
/// tables and views.
pub mod lenient {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};

    /// Text or numeric id, rendered as text.
    pub fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(raw) => raw,
            serde_json::Value::Number(number) => number.to_string(),
            _ => String::new(),
        })
    }

    /// Optional foreign key; text or numeric, `null` stays `None`.
    pub fn optional_id<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::String(raw) => Some(raw),
            serde_json::Value::Number(number) => Some(number.to_string()),
            _ => None,
        })
    }

    /// Non-negative integer count; anything unreadable becomes 0.
    pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::Number(number) => number
                .as_u64()
                .or_else(|| number.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64))
                .unwrap_or(0),
            serde_json::Value::String(raw) => raw.trim().parse().unwrap_or(0),
            _ => 0,
        })
    }

    /// Date or timestamp text; only the calendar date is kept.
    pub fn date<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let serde_json::Value::String(raw) = value else {
            return Ok(None);
        };
        Ok(raw
            .trim()
            .get(..10)
            .and_then(|head| NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()))
    }
}

pub mod category {
    use super::*;

    pub struct Categories;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Category {
        #[serde(deserialize_with = "lenient::id")]
        pub id: String,
        pub name: String,
        #[serde(default)]
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub description: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
    }

    impl Resource for Categories {
        const TABLE: &'static str = "expense_categories";
        type Row = Category;
        type Insert = CategoryNew;
        type Update = CategoryUpdate;
    }
}

pub mod expense {
    use super::{category::Category, *};

    pub struct Expenses;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Expense {
        #[serde(deserialize_with = "lenient::id")]
        pub id: String,
        pub name: String,
        #[serde(default)]
        pub price: Numeric,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default, deserialize_with = "lenient::date")]
        pub expense_date: Option<NaiveDate>,
        #[serde(default, deserialize_with = "lenient::optional_id")]
        pub category_id: Option<String>,
        /// Embedded parent row, present when selected with [`Expenses::SELECT`].
        #[serde(default, rename = "expense_categories")]
        pub category: Option<Category>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub name: String,
        pub price: Numeric,
        pub description: Option<String>,
        pub expense_date: NaiveDate,
        pub category_id: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub price: Option<Numeric>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub expense_date: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category_id: Option<String>,
    }

    impl Resource for Expenses {
        const TABLE: &'static str = "expenses";
        const SELECT: &'static str = "*,expense_categories(id,name,description)";
        type Row = Expense;
        type Insert = ExpenseNew;
        type Update = ExpenseUpdate;
    }
}

pub mod income {
    use super::*;

    pub struct Incomes;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Income {
        #[serde(deserialize_with = "lenient::id")]
        pub id: String,
        pub name: String,
        #[serde(default)]
        pub price: Numeric,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default, deserialize_with = "lenient::date")]
        pub income_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeNew {
        pub name: String,
        pub price: Numeric,
        pub description: Option<String>,
        pub income_date: NaiveDate,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct IncomeUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub price: Option<Numeric>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub income_date: Option<NaiveDate>,
    }

    impl Resource for Incomes {
        const TABLE: &'static str = "income";
        type Row = Income;
        type Insert = IncomeNew;
        type Update = IncomeUpdate;
    }
}

pub mod transaction {
    use super::*;

    pub struct Transactions;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionType {
        Debit,
        Credit,
    }

    impl TransactionType {
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Debit => "debit",
                Self::Credit => "credit",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct Transaction {
        #[serde(deserialize_with = "lenient::id")]
        pub id: String,
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub amount: Numeric,
        /// Raw column value; only `"credit"` counts as a credit.
        #[serde(default)]
        pub transaction_type: Option<String>,
        #[serde(default, deserialize_with = "lenient::date")]
        pub trans_date: Option<NaiveDate>,
    }

    impl Transaction {
        pub fn is_credit(&self) -> bool {
            self.transaction_type.as_deref() == Some(TransactionType::Credit.as_str())
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub name: String,
        pub description: Option<String>,
        pub amount: Numeric,
        pub transaction_type: TransactionType,
        pub trans_date: NaiveDate,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub description: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub amount: Option<Numeric>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub transaction_type: Option<TransactionType>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub trans_date: Option<NaiveDate>,
    }

    impl Resource for Transactions {
        const TABLE: &'static str = "transactions";
        type Row = Transaction;
        type Insert = TransactionNew;
        type Update = TransactionUpdate;
    }
}

/// Read-only views and the spending summary procedure.
pub mod views {
    use super::*;

    pub const EXPENSE_SUMMARY_BY_CATEGORY: &str = "expense_summary_by_category";
    pub const RECENT_TRANSACTIONS_DETAILED: &str = "recent_transactions_detailed";
    pub const MONTHLY_FINANCIAL_SUMMARY: &str = "monthly_financial_summary";
    pub const GET_SPENDING_SUMMARY: &str = "get_spending_summary";

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct CategorySummary {
        #[serde(default, deserialize_with = "lenient::optional_id")]
        pub category_id: Option<String>,
        #[serde(default)]
        pub category_name: Option<String>,
        #[serde(default)]
        pub total_amount: Numeric,
        #[serde(default, deserialize_with = "lenient::count")]
        pub expense_count: u64,
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct RecentTransaction {
        #[serde(default, deserialize_with = "lenient::id")]
        pub id: String,
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub category_name: Option<String>,
        #[serde(default)]
        pub amount: Numeric,
        #[serde(default)]
        pub transaction_type: Option<String>,
        #[serde(default, deserialize_with = "lenient::date")]
        pub trans_date: Option<NaiveDate>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct MonthlySummary {
        #[serde(default)]
        pub month: Option<String>,
        #[serde(default)]
        pub total_income: Numeric,
        #[serde(default)]
        pub total_expenses: Numeric,
        #[serde(default)]
        pub net_amount: Numeric,
    }

    /// Arguments of `get_spending_summary`; absent bounds mean "all time".
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct SpendingSummaryParams {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub start_date: Option<NaiveDate>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub end_date: Option<NaiveDate>,
    }

    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct SpendingSummaryRow {
        #[serde(default)]
        pub total_expenses: Numeric,
        #[serde(default)]
        pub total_income: Numeric,
        #[serde(default)]
        pub net_amount: Numeric,
        #[serde(default, deserialize_with = "lenient::count")]
        pub transaction_count: u64,
    }
}

/// Error body returned by the REST layer.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
    /// Some gateway front-ends use `error` instead of `message`.
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error).filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::{views::*, *};
    use serde_json::json;

    #[test]
    fn numeric_reads_numbers_strings_and_nulls() {
        let row: SpendingSummaryRow = serde_json::from_value(json!({
            "total_income": 3200,
            "total_expenses": "1700.50",
            "net_amount": null,
            "transaction_count": "12"
        }))
        .unwrap();
        assert_eq!(row.total_income.as_str(), Some("3200"));
        assert_eq!(row.total_expenses.as_str(), Some("1700.50"));
        assert!(row.net_amount.is_null());
        assert_eq!(row.transaction_count, 12);
    }

    #[test]
    fn numeric_tolerates_garbage() {
        let row: CategorySummary = serde_json::from_value(json!({
            "category_name": "Food",
            "total_amount": {"nested": true},
            "expense_count": "many"
        }))
        .unwrap();
        assert!(row.total_amount.is_null());
        assert_eq!(row.expense_count, 0);
    }

    #[test]
    fn numeric_serializes_as_json_number() {
        let insert = expense::ExpenseNew {
            name: "Coffee".to_string(),
            price: Numeric::new("4.5"),
            description: None,
            expense_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            category_id: "cat-1".to_string(),
        };
        let value = serde_json::to_value(&insert).unwrap();
        assert_eq!(value["price"], json!(4.5));
        assert_eq!(value["expense_date"], json!("2025-03-01"));
    }

    #[test]
    fn expense_row_embeds_category_and_timestamp_dates() {
        let row: expense::Expense = serde_json::from_value(json!({
            "id": 7,
            "name": "Groceries",
            "price": 12.3,
            "expense_date": "2025-02-03T10:00:00+00:00",
            "category_id": "c1",
            "expense_categories": {"id": "c1", "name": "Food & Dining", "description": null}
        }))
        .unwrap();
        assert_eq!(row.id, "7");
        assert_eq!(row.expense_date, NaiveDate::from_ymd_opt(2025, 2, 3));
        assert_eq!(row.category.unwrap().name, "Food & Dining");
    }

    #[test]
    fn numeric_foreign_keys_read_as_text() {
        let row: expense::Expense = serde_json::from_value(json!({
            "id": 7,
            "name": "Groceries",
            "price": 12.3,
            "category_id": 3
        }))
        .unwrap();
        assert_eq!(row.category_id.as_deref(), Some("3"));

        let rows: Vec<CategorySummary> = serde_json::from_value(json!([
            {"category_id": 3, "category_name": "Food", "total_amount": "10.00", "expense_count": 1},
            {"category_id": null, "category_name": "Other", "total_amount": "5.00", "expense_count": 1}
        ]))
        .unwrap();
        assert_eq!(rows[0].category_id.as_deref(), Some("3"));
        assert_eq!(rows[1].category_id, None);
    }

    #[test]
    fn query_params_follow_rest_syntax() {
        let query = Query::new()
            .gte("trans_date", "2025-01-01")
            .lte("trans_date", "2025-01-31")
            .order_by("trans_date", true);
        assert_eq!(
            query.to_params(),
            vec![
                ("trans_date".to_string(), "gte.2025-01-01".to_string()),
                ("trans_date".to_string(), "lte.2025-01-31".to_string()),
                ("order".to_string(), "trans_date.desc".to_string()),
            ]
        );
    }

    #[test]
    fn spending_params_skip_missing_bounds() {
        let params = SpendingSummaryParams::default();
        assert_eq!(serde_json::to_value(&params).unwrap(), json!({}));
    }

    #[test]
    fn error_body_prefers_message() {
        let body: ErrorBody = serde_json::from_value(json!({
            "message": "duplicate key",
            "code": "23505"
        }))
        .unwrap();
        assert_eq!(body.into_message().as_deref(), Some("duplicate key"));
    }
}
