//! In-memory [`Gateway`] backing demo mode and tests.
//!
//! Rows are stored as JSON objects per table, so inserts go through the same
//! serde shapes the HTTP client sends. Views and the spending summary are
//! computed from the tables unless a test pins them with one of the `set_*`
//! methods. Every call is journaled; `fail_next` makes the next call of an
//! operation fail once.

use std::{
    cmp::Ordering,
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use api_types::{
    Filter, FilterOp, Numeric, Query, Resource,
    category::Categories,
    expense::Expenses,
    income::Incomes,
    transaction::{TransactionType, Transactions},
    views::{CategorySummary, MonthlySummary, RecentTransaction, SpendingSummaryParams, SpendingSummaryRow},
};
use chrono::{Days, NaiveDate};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    MoneyCents,
    gateway::{Gateway, GatewayError, GatewayResult, Operation},
};

/// One journaled gateway call.
#[derive(Clone, Debug, PartialEq)]
pub struct Call {
    pub operation: Operation,
    /// Serialized insert/update/rpc body, if the call had one.
    pub body: Option<Value>,
}

#[derive(Debug, Default)]
struct State {
    tables: HashMap<&'static str, Vec<Value>>,
    journal: Vec<Call>,
    failures: HashMap<Operation, String>,
    category_summary: Option<Vec<CategorySummary>>,
    recent: Option<Vec<RecentTransaction>>,
    monthly: Option<Vec<MonthlySummary>>,
    spending: Option<Vec<SpendingSummaryRow>>,
}

#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: Mutex<State>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sample data: the standard category list, a handful of recent expenses
    /// and a salary deposit, dated relative to `today`.
    pub fn demo(today: NaiveDate) -> Self {
        let gateway = Self::new();
        {
            let mut state = gateway.lock();
            let categories = [
                ("Food & Dining", "Restaurants, groceries and coffee"),
                ("Transportation", "Fuel, transit and parking"),
                ("Entertainment", "Streaming, movies and events"),
                ("Shopping", "Clothes and household goods"),
                ("Bills & Utilities", "Rent, power, water and internet"),
                ("Healthcare", "Doctors and pharmacy"),
                ("Education", "Courses and books"),
                ("Travel", "Flights and hotels"),
                ("Personal Care", "Haircuts and cosmetics"),
                ("Others", "Everything else"),
            ];
            let mut ids = HashMap::new();
            for (name, description) in categories {
                let id = Uuid::new_v4().to_string();
                ids.insert(name, id.clone());
                state.push(
                    Categories::TABLE,
                    json!({ "id": id, "name": name, "description": description }),
                );
            }

            let day = |offset: u64| {
                today
                    .checked_sub_days(Days::new(offset))
                    .unwrap_or(today)
                    .to_string()
            };
            let expenses = [
                ("Electric Bill", "Monthly power bill", "118.30", 9, "Bills & Utilities"),
                ("Coffee Shop", "Morning latte", "12.50", 3, "Food & Dining"),
                ("Gas Station", "Fuel", "45.20", 3, "Transportation"),
                ("Netflix Subscription", "Monthly plan", "15.99", 1, "Entertainment"),
                ("Whole Foods Market", "Weekly groceries", "89.42", 0, "Food & Dining"),
            ];
            for (name, description, price, offset, category) in expenses {
                let row = json!({
                    "name": name,
                    "description": description,
                    "price": Numeric::new(price),
                    "expense_date": day(offset),
                    "category_id": ids.get(category),
                });
                if let Err(err) = state.insert(Expenses::TABLE, row) {
                    tracing::warn!("demo expense {name} not seeded: {err}");
                }
            }

            let salary = json!({
                "name": "Salary Deposit",
                "description": "Monthly salary",
                "price": Numeric::new("3200.00"),
                "income_date": day(2),
            });
            if let Err(err) = state.insert(Incomes::TABLE, salary) {
                tracing::warn!("demo income not seeded: {err}");
            }
        }
        gateway
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Journals the call, then fails it if a failure was queued for `operation`.
    fn enter(&self, operation: Operation, body: Option<Value>) -> GatewayResult<MutexGuard<'_, State>> {
        let mut state = self.lock();
        state.journal.push(Call { operation, body });
        if let Some(message) = state.failures.remove(&operation) {
            tracing::debug!(%operation, "injected failure");
            return Err(GatewayError::Api {
                status: 500,
                message,
            });
        }
        Ok(state)
    }

    /// Makes the next call of `operation` fail with `message`.
    pub fn fail_next(&self, operation: Operation, message: impl Into<String>) {
        self.lock().failures.insert(operation, message.into());
    }

    /// Appends a raw row to `table`, bypassing the journal and side effects.
    pub fn seed(&self, table: &'static str, row: Value) {
        self.lock().push(table, row);
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.lock().tables.get(table).cloned().unwrap_or_default()
    }

    pub fn journal(&self) -> Vec<Call> {
        self.lock().journal.clone()
    }

    /// How many times `operation` was called.
    pub fn count(&self, operation: Operation) -> usize {
        self.lock()
            .journal
            .iter()
            .filter(|call| call.operation == operation)
            .count()
    }

    pub fn set_category_summary(&self, rows: Vec<CategorySummary>) {
        self.lock().category_summary = Some(rows);
    }

    pub fn set_recent_transactions(&self, rows: Vec<RecentTransaction>) {
        self.lock().recent = Some(rows);
    }

    pub fn set_monthly_summary(&self, rows: Vec<MonthlySummary>) {
        self.lock().monthly = Some(rows);
    }

    pub fn set_spending_summary(&self, rows: Vec<SpendingSummaryRow>) {
        self.lock().spending = Some(rows);
    }
}

impl State {
    fn table(&self, table: &str) -> &[Value] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or_default()
    }

    fn push(&mut self, table: &'static str, row: Value) {
        self.tables.entry(table).or_default().push(row);
    }

    fn find(&self, table: &str, id: &str) -> Option<&Value> {
        self.table(table)
            .iter()
            .find(|row| text(row.get("id")).as_deref() == Some(id))
    }

    fn category_name(&self, id: Option<&Value>) -> Option<String> {
        let id = text(id)?;
        text(self.find(Categories::TABLE, &id)?.get("name"))
    }

    /// Adds the embedded parent rows the REST layer would return.
    fn hydrate(&self, table: &str, mut row: Value) -> Value {
        if table == Expenses::TABLE {
            let category = text(row.get("category_id"))
                .and_then(|id| self.find(Categories::TABLE, &id).cloned())
                .unwrap_or(Value::Null);
            if let Some(fields) = row.as_object_mut() {
                fields.insert("expense_categories".to_string(), category);
            }
        }
        row
    }

    /// Stores a new row with a generated id, enforcing the expense category
    /// foreign key. Expenses and income also record their ledger transaction.
    fn insert(&mut self, table: &'static str, body: Value) -> GatewayResult<Value> {
        let Value::Object(mut fields) = body else {
            return Err(GatewayError::Decode("insert body is not an object".to_string()));
        };
        if !fields.contains_key("id") {
            fields.insert("id".to_string(), json!(Uuid::new_v4().to_string()));
        }

        if table == Expenses::TABLE {
            let category = text(fields.get("category_id")).unwrap_or_default();
            if self.find(Categories::TABLE, &category).is_none() {
                return Err(GatewayError::Api {
                    status: 409,
                    message: format!(
                        "insert or update on table \"{table}\" violates foreign key constraint \"{table}_category_id_fkey\""
                    ),
                });
            }
        }

        let ledger = if table == Expenses::TABLE {
            Some((TransactionType::Debit, "expense_date"))
        } else if table == Incomes::TABLE {
            Some((TransactionType::Credit, "income_date"))
        } else {
            None
        };
        if let Some((kind, date_column)) = ledger {
            let entry = json!({
                "id": Uuid::new_v4().to_string(),
                "name": fields.get("name"),
                "description": fields.get("description"),
                "amount": fields.get("price"),
                "transaction_type": kind.as_str(),
                "trans_date": fields.get(date_column),
                "category_id": fields.get("category_id"),
            });
            self.push(Transactions::TABLE, entry);
        }

        let row = Value::Object(fields);
        self.push(table, row.clone());
        Ok(row)
    }

    fn transactions_newest_first(&self) -> Vec<&Value> {
        let mut rows: Vec<&Value> = self.table(Transactions::TABLE).iter().rev().collect();
        rows.sort_by(|a, b| compare(b.get("trans_date"), a.get("trans_date")));
        rows
    }

    fn category_summary(&self) -> Vec<CategorySummary> {
        let mut summary: Vec<CategorySummary> = self
            .table(Categories::TABLE)
            .iter()
            .map(|category| {
                let id = text(category.get("id"));
                let expenses: Vec<&Value> = self
                    .table(Expenses::TABLE)
                    .iter()
                    .filter(|row| id.is_some() && text(row.get("category_id")) == id)
                    .collect();
                let total: MoneyCents = expenses.iter().map(|row| cents(row.get("price"))).sum();
                CategorySummary {
                    category_id: id,
                    category_name: text(category.get("name")),
                    total_amount: total.to_numeric(),
                    expense_count: expenses.len() as u64,
                }
            })
            .collect();
        summary.sort_by_key(|row| std::cmp::Reverse(MoneyCents::coerce(&row.total_amount)));
        summary
    }

    fn recent_transactions(&self, limit: u64) -> GatewayResult<Vec<RecentTransaction>> {
        self.transactions_newest_first()
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .map(|row| {
                decode(json!({
                    "id": row.get("id"),
                    "name": row.get("name"),
                    "description": row.get("description"),
                    "category_name": self.category_name(row.get("category_id")),
                    "amount": row.get("amount"),
                    "transaction_type": row.get("transaction_type"),
                    "trans_date": row.get("trans_date"),
                }))
            })
            .collect()
    }

    fn monthly_summary(&self) -> Vec<MonthlySummary> {
        let mut months: Vec<(String, MoneyCents, MoneyCents)> = Vec::new();
        for row in self.transactions_newest_first() {
            let Some(month) = text(row.get("trans_date")).and_then(|d| d.get(..7).map(str::to_string)) else {
                continue;
            };
            let index = match months.iter().position(|(m, _, _)| *m == month) {
                Some(index) => index,
                None => {
                    months.push((month, MoneyCents::ZERO, MoneyCents::ZERO));
                    months.len() - 1
                }
            };
            let amount = cents(row.get("amount")).abs();
            if is_credit(row) {
                months[index].1 += amount;
            } else {
                months[index].2 += amount;
            }
        }
        months
            .into_iter()
            .map(|(month, income, expenses)| MonthlySummary {
                month: Some(month),
                total_income: income.to_numeric(),
                total_expenses: expenses.to_numeric(),
                net_amount: (income - expenses).to_numeric(),
            })
            .collect()
    }

    fn spending_summary(&self, params: &SpendingSummaryParams) -> SpendingSummaryRow {
        let start = params.start_date.map(|d| d.to_string());
        let end = params.end_date.map(|d| d.to_string());
        let mut income = MoneyCents::ZERO;
        let mut expenses = MoneyCents::ZERO;
        let mut count = 0;
        for row in self.table(Transactions::TABLE) {
            let date = text(row.get("trans_date"));
            let after_start = start.as_ref().is_none_or(|s| date.as_ref().is_some_and(|d| d >= s));
            let before_end = end.as_ref().is_none_or(|e| date.as_ref().is_some_and(|d| d <= e));
            if !(after_start && before_end) {
                continue;
            }
            count += 1;
            let amount = cents(row.get("amount")).abs();
            if is_credit(row) {
                income += amount;
            } else {
                expenses += amount;
            }
        }
        SpendingSummaryRow {
            total_expenses: expenses.to_numeric(),
            total_income: income.to_numeric(),
            net_amount: (income - expenses).to_numeric(),
            transaction_count: count,
        }
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(raw) => Some(raw.clone()),
        other => Some(other.to_string()),
    }
}

fn cents(value: Option<&Value>) -> MoneyCents {
    value
        .and_then(|v| serde_json::from_value::<Numeric>(v.clone()).ok())
        .map(|n| MoneyCents::coerce(&n))
        .unwrap_or(MoneyCents::ZERO)
}

fn is_credit(row: &Value) -> bool {
    row.get("transaction_type").and_then(Value::as_str) == Some(TransactionType::Credit.as_str())
}

/// Numbers compare numerically, everything else as text; nulls sort first.
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a.and_then(Value::as_f64), b.and_then(Value::as_f64)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => text(a).cmp(&text(b)),
    }
}

fn matches(row: &Value, filter: &Filter) -> bool {
    let field = row.get(&filter.column);
    if text(field).is_none() {
        return false;
    }
    let ordering = match (field.and_then(Value::as_f64), filter.value.parse::<f64>().ok()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => text(field).unwrap_or_default().as_str().cmp(filter.value.as_str()),
    };
    match filter.op {
        FilterOp::Eq => ordering == Ordering::Equal,
        FilterOp::Gte => ordering != Ordering::Less,
        FilterOp::Lte => ordering != Ordering::Greater,
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> GatewayResult<T> {
    serde_json::from_value(value).map_err(|err| GatewayError::Decode(err.to_string()))
}

fn encode(value: &impl serde::Serialize) -> GatewayResult<Value> {
    serde_json::to_value(value).map_err(|err| GatewayError::Decode(err.to_string()))
}

impl Gateway for MemoryGateway {
    async fn list<R: Resource>(&self, query: &Query) -> GatewayResult<Vec<R::Row>> {
        let state = self.enter(Operation::List(R::TABLE), None)?;
        let mut rows: Vec<Value> = state
            .table(R::TABLE)
            .iter()
            .filter(|row| query.filters().iter().all(|f| matches(row, f)))
            .cloned()
            .collect();
        if let Some(order) = query.order() {
            rows.sort_by(|a, b| {
                let ordering = compare(a.get(&order.column), b.get(&order.column));
                if order.descending { ordering.reverse() } else { ordering }
            });
        }
        if let Some(limit) = query.row_limit() {
            rows.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        rows.into_iter()
            .map(|row| decode(state.hydrate(R::TABLE, row)))
            .collect()
    }

    async fn get<R: Resource>(&self, id: &str) -> GatewayResult<R::Row> {
        let state = self.enter(Operation::Get(R::TABLE), None)?;
        let row = state.find(R::TABLE, id).cloned().ok_or(GatewayError::NotFound)?;
        decode(state.hydrate(R::TABLE, row))
    }

    async fn create<R: Resource>(&self, row: &R::Insert) -> GatewayResult<R::Row> {
        let body = encode(row)?;
        let mut state = self.enter(Operation::Create(R::TABLE), Some(body.clone()))?;
        let stored = state.insert(R::TABLE, body)?;
        decode(state.hydrate(R::TABLE, stored))
    }

    async fn update<R: Resource>(&self, id: &str, patch: &R::Update) -> GatewayResult<R::Row> {
        let body = encode(patch)?;
        let mut state = self.enter(Operation::Update(R::TABLE), Some(body.clone()))?;
        let rows = state.tables.entry(R::TABLE).or_default();
        let row = rows
            .iter_mut()
            .find(|row| text(row.get("id")).as_deref() == Some(id))
            .ok_or(GatewayError::NotFound)?;
        if let (Some(fields), Value::Object(changes)) = (row.as_object_mut(), body) {
            fields.extend(changes);
        }
        let updated = row.clone();
        decode(state.hydrate(R::TABLE, updated))
    }

    async fn delete<R: Resource>(&self, id: &str) -> GatewayResult<()> {
        let mut state = self.enter(Operation::Delete(R::TABLE), None)?;
        if let Some(rows) = state.tables.get_mut(R::TABLE) {
            rows.retain(|row| text(row.get("id")).as_deref() != Some(id));
        }
        Ok(())
    }

    async fn expense_summary_by_category(&self) -> GatewayResult<Vec<CategorySummary>> {
        let state = self.enter(Operation::CategorySummary, None)?;
        Ok(match &state.category_summary {
            Some(rows) => rows.clone(),
            None => state.category_summary(),
        })
    }

    async fn recent_transactions_detailed(&self, limit: u64) -> GatewayResult<Vec<RecentTransaction>> {
        let state = self.enter(Operation::RecentTransactions, None)?;
        match &state.recent {
            Some(rows) => Ok(rows
                .iter()
                .take(usize::try_from(limit).unwrap_or(usize::MAX))
                .cloned()
                .collect()),
            None => state.recent_transactions(limit),
        }
    }

    async fn monthly_financial_summary(&self) -> GatewayResult<Vec<MonthlySummary>> {
        let state = self.enter(Operation::MonthlySummary, None)?;
        Ok(match &state.monthly {
            Some(rows) => rows.clone(),
            None => state.monthly_summary(),
        })
    }

    async fn spending_summary(&self, params: &SpendingSummaryParams) -> GatewayResult<Vec<SpendingSummaryRow>> {
        let body = encode(params)?;
        let state = self.enter(Operation::SpendingSummary, Some(body))?;
        Ok(match &state.spending {
            Some(rows) => rows.clone(),
            None => vec![state.spending_summary(params)],
        })
    }
}
