use api_types::{
    Numeric,
    category::Categories,
    views::{CategorySummary, RecentTransaction as RecentRow, SpendingSummaryRow},
};
use chrono::NaiveDate;
use serde_json::json;

use engine::{
    Currency, Dashboard, FormError, InsightKind, MemoryGateway, MoneyCents, Operation,
    forms::{EXPENSE_FAILED, ExpenseForm},
    insights::NO_EXPENSES_YET,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

fn category(name: &str, amount: &str, count: u64) -> CategorySummary {
    CategorySummary {
        category_id: Some(format!("id-{name}")),
        category_name: Some(name.to_string()),
        total_amount: Numeric::new(amount),
        expense_count: count,
    }
}

fn sample_gateway() -> MemoryGateway {
    let gateway = MemoryGateway::new();
    gateway.set_spending_summary(vec![SpendingSummaryRow {
        total_income: Numeric::new("3200"),
        total_expenses: Numeric::new("1700.50"),
        net_amount: Numeric::new("1499.50"),
        transaction_count: 12,
    }]);
    gateway.set_category_summary(vec![
        category("Food", "800", 5),
        category("Transport", "400.50", 3),
        category("Bills", "500", 4),
    ]);
    gateway.set_recent_transactions(vec![
        RecentRow {
            id: "t1".to_string(),
            name: Some("Salary Deposit".to_string()),
            amount: Numeric::new("3200"),
            transaction_type: Some("credit".to_string()),
            trans_date: Some(today()),
            ..RecentRow::default()
        },
        RecentRow {
            id: "t2".to_string(),
            name: Some("Gas Station".to_string()),
            category_name: Some("Transport".to_string()),
            amount: Numeric::new("45.20"),
            transaction_type: Some("debit".to_string()),
            trans_date: Some(today()),
            ..RecentRow::default()
        },
    ]);
    gateway
}

#[tokio::test]
async fn full_load_builds_summary_breakdown_and_insights() {
    let gateway = sample_gateway();
    let mut dashboard = Dashboard::new(Currency::Usd, 5);

    dashboard.reload(&gateway).await.unwrap();
    assert!(!dashboard.is_loading());

    let model = dashboard.model();
    assert_eq!(model.summary.total_income, MoneyCents::new(320_000));
    assert_eq!(model.summary.net_amount, MoneyCents::new(149_950));
    assert_eq!(model.breakdown.total, MoneyCents::new(170_050));

    let shares: Vec<_> = model
        .breakdown
        .shares
        .iter()
        .map(|s| (s.name.as_str(), s.percentage))
        .collect();
    assert_eq!(shares, [("Food", 47), ("Bills", 29), ("Transport", 24)]);

    assert_eq!(model.recent.len(), 2);
    assert_eq!(model.recent[1].amount, MoneyCents::new(-4_520));

    assert_eq!(model.insights.len(), 3);
    assert_eq!(
        model.insights[0].message,
        "You have 12 transactions with a net amount of $1,499.50."
    );
    assert_eq!(model.insights[1].kind, InsightKind::Success);
    assert_eq!(
        model.insights[2].message,
        "Food is your top spending category at $800.00 (47% of expenses)."
    );

    assert_eq!(gateway.count(Operation::SpendingSummary), 1);
    assert_eq!(gateway.count(Operation::RecentTransactions), 1);
    assert_eq!(gateway.count(Operation::CategorySummary), 1);
}

#[tokio::test]
async fn failed_summary_keeps_previous_model() {
    let gateway = sample_gateway();
    let mut dashboard = Dashboard::new(Currency::Usd, 5);
    dashboard.reload(&gateway).await.unwrap();
    let before = dashboard.model().clone();

    gateway.fail_next(Operation::SpendingSummary, "connection reset");
    let err = dashboard.reload(&gateway).await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to load dashboard data");
    assert_eq!(err.operation, Operation::SpendingSummary);
    assert!(!dashboard.is_loading());
    assert_eq!(dashboard.model(), &before);
}

#[tokio::test]
async fn failed_first_load_leaves_zero_defaults() {
    let gateway = sample_gateway();
    gateway.fail_next(Operation::CategorySummary, "timeout");
    let mut dashboard = Dashboard::new(Currency::Usd, 5);

    assert!(dashboard.reload(&gateway).await.is_err());
    let model = dashboard.model();
    assert_eq!(model.summary.total_income, MoneyCents::ZERO);
    assert!(model.recent.is_empty());
    assert!(model.breakdown.is_empty());
}

#[tokio::test]
async fn no_categories_means_no_expenses_insight() {
    let gateway = MemoryGateway::new();
    let mut dashboard = Dashboard::new(Currency::Usd, 5);
    dashboard.reload(&gateway).await.unwrap();

    let model = dashboard.model();
    assert!(model.breakdown.is_empty());
    assert_eq!(model.insights[2].message, NO_EXPENSES_YET);
    assert_eq!(model.summary.transaction_count, 0);
}

#[tokio::test]
async fn adding_coffee_creates_once_then_reloads_once() {
    let gateway = MemoryGateway::demo(today());
    let food = gateway
        .rows(<Categories as api_types::Resource>::TABLE)
        .into_iter()
        .find(|row| row["name"] == "Food & Dining")
        .and_then(|row| row["id"].as_str().map(str::to_string))
        .unwrap();

    let mut dashboard = Dashboard::new(Currency::Usd, 5);
    let mut form = ExpenseForm::new(today());
    form.name = "Coffee".to_string();
    form.price = "4.5".to_string();
    form.category_id = Some(food);

    let created = form.submit(&gateway, today()).await.unwrap();
    assert_eq!(created.name, "Coffee");
    assert_eq!(form, ExpenseForm::new(today()));
    dashboard.reload(&gateway).await.unwrap();

    let creates: Vec<_> = gateway
        .journal()
        .into_iter()
        .filter(|call| call.operation == Operation::Create("expenses"))
        .collect();
    assert_eq!(creates.len(), 1);
    let body = creates[0].body.as_ref().unwrap();
    assert_eq!(body["price"], json!(4.5));
    assert_eq!(body["name"], json!("Coffee"));
    assert_eq!(gateway.count(Operation::SpendingSummary), 1);

    let recent = &dashboard.model().recent;
    assert_eq!(recent[0].display_name, "Coffee");
    assert_eq!(recent[0].amount, MoneyCents::new(-450));
}

#[tokio::test]
async fn rejected_insert_keeps_the_form() {
    let gateway = MemoryGateway::demo(today());
    gateway.fail_next(Operation::Create("expenses"), "");

    let mut form = ExpenseForm::new(today());
    form.name = "Coffee".to_string();
    form.price = "4.5".to_string();
    form.category_id = Some("anything".to_string());
    let before = form.clone();

    let err = form.submit(&gateway, today()).await.unwrap_err();
    assert_eq!(err, FormError::Gateway(EXPENSE_FAILED.to_string()));
    assert_eq!(form, before);
}

#[tokio::test]
async fn invalid_form_never_reaches_the_gateway() {
    let gateway = MemoryGateway::demo(today());
    let mut form = ExpenseForm::new(today());
    form.name = "Coffee".to_string();
    form.price = "free".to_string();
    form.category_id = Some("anything".to_string());

    assert!(matches!(
        form.submit(&gateway, today()).await,
        Err(FormError::Validation(_))
    ));
    assert!(gateway.journal().is_empty());
}
