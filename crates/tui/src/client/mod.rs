//! PostgREST client for the hosted database.

use api_types::{
    ErrorBody, Query, Resource,
    views::{self, CategorySummary, MonthlySummary, RecentTransaction, SpendingSummaryParams, SpendingSummaryRow},
};
use engine::{Gateway, GatewayError, GatewayResult};
use reqwest::{Method, RequestBuilder, StatusCode, Url, header};
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";
const RETURN_REPRESENTATION: &str = "return=representation";
/// PostgREST code for a single-object read that matched no rows.
const NO_ROWS: &str = "PGRST116";

#[derive(Debug, Clone)]
pub struct SupabaseClient {
    base_url: Url,
    anon_key: String,
    http: reqwest::Client,
}

impl SupabaseClient {
    pub fn new(base_url: &str, anon_key: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url).map_err(|err| AppError::Setting {
            key: "supabase_url",
            message: err.to_string(),
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            base_url,
            anon_key: anon_key.to_string(),
            http: reqwest::Client::builder()
                .user_agent(concat!("spendboard_tui/", env!("CARGO_PKG_VERSION")))
                .build()?,
        })
    }

    fn request(&self, method: Method, path: &str) -> GatewayResult<RequestBuilder> {
        let endpoint = self
            .base_url
            .join(&format!("rest/v1/{path}"))
            .map_err(|err| GatewayError::Transport(format!("invalid url: {err}")))?;
        Ok(self
            .http
            .request(method, endpoint)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key))
    }

    fn single(&self, method: Method, table: &str, id: &str) -> GatewayResult<RequestBuilder> {
        Ok(self
            .request(method, table)?
            .query(&[("id", format!("eq.{id}"))])
            .header(header::ACCEPT, SINGLE_OBJECT))
    }

    async fn read<T: DeserializeOwned>(&self, request: RequestBuilder) -> GatewayResult<T> {
        let body = self.execute(request).await?;
        serde_json::from_str(&body).map_err(|err| GatewayError::Decode(err.to_string()))
    }

    async fn execute(&self, request: RequestBuilder) -> GatewayResult<String> {
        let res = request
            .send()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "response");

        if status.is_success() {
            return Ok(body);
        }
        Err(error_for(status, &body))
    }
}

fn error_for(status: StatusCode, body: &str) -> GatewayError {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    if parsed.code.as_deref() == Some(NO_ROWS) {
        return GatewayError::NotFound;
    }
    let message = parsed.into_message().unwrap_or_else(|| {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
    });
    GatewayError::Api {
        status: status.as_u16(),
        message,
    }
}

impl Gateway for SupabaseClient {
    async fn list<R: Resource>(&self, query: &Query) -> GatewayResult<Vec<R::Row>> {
        tracing::debug!(table = R::TABLE, "list");
        let request = self
            .request(Method::GET, R::TABLE)?
            .query(&[("select", R::SELECT)])
            .query(&query.to_params());
        self.read(request).await
    }

    async fn get<R: Resource>(&self, id: &str) -> GatewayResult<R::Row> {
        tracing::debug!(table = R::TABLE, id, "get");
        let request = self
            .single(Method::GET, R::TABLE, id)?
            .query(&[("select", R::SELECT)]);
        self.read(request).await
    }

    async fn create<R: Resource>(&self, row: &R::Insert) -> GatewayResult<R::Row> {
        tracing::debug!(table = R::TABLE, "create");
        let request = self
            .request(Method::POST, R::TABLE)?
            .query(&[("select", R::SELECT)])
            .header("Prefer", RETURN_REPRESENTATION)
            .header(header::ACCEPT, SINGLE_OBJECT)
            .json(row);
        self.read(request).await
    }

    async fn update<R: Resource>(&self, id: &str, patch: &R::Update) -> GatewayResult<R::Row> {
        tracing::debug!(table = R::TABLE, id, "update");
        let request = self
            .single(Method::PATCH, R::TABLE, id)?
            .query(&[("select", R::SELECT)])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(patch);
        self.read(request).await
    }

    async fn delete<R: Resource>(&self, id: &str) -> GatewayResult<()> {
        tracing::debug!(table = R::TABLE, id, "delete");
        let request = self
            .request(Method::DELETE, R::TABLE)?
            .query(&[("id", format!("eq.{id}"))]);
        self.execute(request).await.map(|_| ())
    }

    async fn expense_summary_by_category(&self) -> GatewayResult<Vec<CategorySummary>> {
        let request = self
            .request(Method::GET, views::EXPENSE_SUMMARY_BY_CATEGORY)?
            .query(&[("select", "*")]);
        self.read(request).await
    }

    async fn recent_transactions_detailed(&self, limit: u64) -> GatewayResult<Vec<RecentTransaction>> {
        let request = self
            .request(Method::GET, views::RECENT_TRANSACTIONS_DETAILED)?
            .query(&[("select", "*".to_string()), ("limit", limit.to_string())]);
        self.read(request).await
    }

    async fn monthly_financial_summary(&self) -> GatewayResult<Vec<MonthlySummary>> {
        let request = self
            .request(Method::GET, views::MONTHLY_FINANCIAL_SUMMARY)?
            .query(&[("select", "*")]);
        self.read(request).await
    }

    async fn spending_summary(&self, params: &SpendingSummaryParams) -> GatewayResult<Vec<SpendingSummaryRow>> {
        let request = self
            .request(Method::POST, &format!("rpc/{}", views::GET_SPENDING_SUMMARY))?
            .json(params);
        self.read(request).await
    }
}
