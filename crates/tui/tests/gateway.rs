//! Drives the PostgREST client against a local axum server.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use api_types::{Query, Resource, expense::Expenses, income::Incomes};
use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
};
use chrono::NaiveDate;
use engine::{Currency, Dashboard, Gateway, GatewayError, MoneyCents, forms::ExpenseForm};
use reqwest::Url;
use serde_json::{Value, json};
use spendboard_tui::client::SupabaseClient;

const KEY: &str = "anon-key";

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    params: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<Value>,
}

impl Recorded {
    fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Default)]
struct Mock {
    responses: HashMap<String, (StatusCode, Value)>,
    requests: Mutex<Vec<Recorded>>,
}

impl Mock {
    fn respond(mut self, method: Method, path: &str, status: StatusCode, body: Value) -> Self {
        self.responses.insert(format!("{method} {path}"), (status, body));
        self
    }

    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}

async fn record(
    State(mock): State<Arc<Mock>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, Json<Value>) {
    let url = Url::parse(&format!("http://mock{uri}")).unwrap();
    let params = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let path = uri.path().to_string();
    let key = format!("{method} {path}");

    mock.requests.lock().unwrap().push(Recorded {
        method,
        path,
        params,
        headers,
        body: serde_json::from_str(&body).ok(),
    });

    match mock.responses.get(&key) {
        Some((status, body)) => (*status, Json(body.clone())),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": format!("no route for {key}") })),
        ),
    }
}

async fn serve(mock: Mock) -> (SupabaseClient, Arc<Mock>) {
    let mock = Arc::new(mock);
    let app = Router::new().fallback(record).with_state(mock.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = SupabaseClient::new(&format!("http://{addr}"), KEY).unwrap();
    (client, mock)
}

fn coffee_row() -> Value {
    json!({
        "id": "e-1",
        "name": "Coffee",
        "price": "4.50",
        "description": null,
        "expense_date": "2025-03-14",
        "category_id": "c-food",
        "expense_categories": { "id": "c-food", "name": "Food & Dining", "description": null }
    })
}

#[tokio::test]
async fn list_sends_credentials_and_query_params() {
    let mock = Mock::default().respond(
        Method::GET,
        "/rest/v1/expenses",
        StatusCode::OK,
        json!([coffee_row()]),
    );
    let (client, mock) = serve(mock).await;

    let query = Query::new()
        .eq("category_id", "c-food")
        .order_by("expense_date", true)
        .limit(10);
    let rows = client.list::<Expenses>(&query).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(MoneyCents::coerce(&rows[0].price), MoneyCents::new(450));
    assert_eq!(
        rows[0].category.as_ref().map(|c| c.name.as_str()),
        Some("Food & Dining")
    );

    let requests = mock.requests();
    let request = &requests[0];
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.header("apikey"), Some(KEY));
    assert_eq!(request.header("authorization"), Some("Bearer anon-key"));
    assert_eq!(request.param("select"), Some(Expenses::SELECT));
    assert_eq!(request.param("category_id"), Some("eq.c-food"));
    assert_eq!(request.param("order"), Some("expense_date.desc"));
    assert_eq!(request.param("limit"), Some("10"));
}

#[tokio::test]
async fn expense_form_posts_a_numeric_price() {
    let mock = Mock::default().respond(
        Method::POST,
        "/rest/v1/expenses",
        StatusCode::CREATED,
        coffee_row(),
    );
    let (client, mock) = serve(mock).await;

    let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
    let mut form = ExpenseForm::new(today);
    form.name = "Coffee".to_string();
    form.price = "4.5".to_string();
    form.category_id = Some("c-food".to_string());

    let created = form.submit(&client, today).await.unwrap();
    assert_eq!(created.id, "e-1");
    assert_eq!(form, ExpenseForm::new(today));

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.header("prefer"), Some("return=representation"));
    assert_eq!(
        request.header("accept"),
        Some("application/vnd.pgrst.object+json")
    );
    let body = request.body.as_ref().unwrap();
    assert_eq!(body["price"], json!(4.5));
    assert_eq!(body["name"], json!("Coffee"));
    assert_eq!(body["expense_date"], json!("2025-03-14"));
    assert_eq!(body["description"], Value::Null);
}

#[tokio::test]
async fn dashboard_reload_reads_views_and_rpc() {
    let mock = Mock::default()
        .respond(
            Method::POST,
            "/rest/v1/rpc/get_spending_summary",
            StatusCode::OK,
            json!([{
                "total_expenses": "1700.50",
                "total_income": 2500,
                "net_amount": "799.50",
                "transaction_count": 12
            }]),
        )
        .respond(
            Method::GET,
            "/rest/v1/recent_transactions_detailed",
            StatusCode::OK,
            json!([{
                "id": 7,
                "name": "Salary Deposit",
                "category_name": null,
                "amount": "2500",
                "transaction_type": "credit",
                "trans_date": "2025-03-01"
            }]),
        )
        .respond(
            Method::GET,
            "/rest/v1/expense_summary_by_category",
            StatusCode::OK,
            json!([
                { "category_id": "c-food", "category_name": "Food", "total_amount": "800.25", "expense_count": 9 },
                { "category_id": "c-bills", "category_name": "Bills", "total_amount": "900.25", "expense_count": "3" }
            ]),
        );
    let (client, mock) = serve(mock).await;

    let mut dashboard = Dashboard::new(Currency::Usd, 5);
    dashboard.reload(&client).await.unwrap();

    let model = dashboard.model();
    assert_eq!(model.summary.total_expenses, MoneyCents::new(170_050));
    assert_eq!(model.summary.net_amount, MoneyCents::new(79_950));
    assert_eq!(model.summary.transaction_count, 12);
    assert_eq!(model.recent[0].category_label, "Income");
    assert_eq!(model.breakdown.shares[0].name, "Bills");
    assert_eq!(model.breakdown.shares[0].percentage, 53);

    let requests = mock.requests();
    let recent = requests
        .iter()
        .find(|r| r.path == "/rest/v1/recent_transactions_detailed")
        .unwrap();
    assert_eq!(recent.param("limit"), Some("5"));
    let rpc = requests
        .iter()
        .find(|r| r.path == "/rest/v1/rpc/get_spending_summary")
        .unwrap();
    assert_eq!(rpc.method, Method::POST);
    assert_eq!(rpc.body, Some(json!({})));
}

#[tokio::test]
async fn error_bodies_map_to_gateway_errors() {
    let mock = Mock::default()
        .respond(
            Method::GET,
            "/rest/v1/income",
            StatusCode::UNAUTHORIZED,
            json!({ "message": "Invalid API key", "hint": "Double check your key" }),
        )
        .respond(
            Method::GET,
            "/rest/v1/expenses",
            StatusCode::NOT_ACCEPTABLE,
            json!({ "code": "PGRST116", "message": "JSON object requested, multiple (or no) rows returned" }),
        );
    let (client, _mock) = serve(mock).await;

    let err = client.list::<Incomes>(&Query::new()).await.unwrap_err();
    assert_eq!(
        err,
        GatewayError::Api {
            status: 401,
            message: "Invalid API key".to_string()
        }
    );

    let err = client.get::<Expenses>("missing").await.unwrap_err();
    assert_eq!(err, GatewayError::NotFound);

    let err = client
        .delete::<api_types::category::Categories>("c-1")
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Api { status: 404, .. }));
    assert_eq!(Incomes::TABLE, "income");
}
