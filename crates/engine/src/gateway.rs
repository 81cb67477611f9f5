//! The data access gateway seam.
//!
//! Every read and write the dashboard performs goes through [`Gateway`]. The
//! HTTP implementation lives in the terminal client; [`MemoryGateway`] backs
//! demo mode and tests.
//!
//! [`MemoryGateway`]: crate::memory::MemoryGateway

use std::future::Future;

use api_types::{
    Query, Resource,
    views::{CategorySummary, MonthlySummary, RecentTransaction, SpendingSummaryParams, SpendingSummaryRow},
};
use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// A failed gateway call.
///
/// The variants separate where the failure happened, but callers treat them
/// alike: log, notify once, keep the previous state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The backend answered with an error body.
    #[error("{message}")]
    Api { status: u16, message: String },
    /// The request never got a response.
    #[error("network error: {0}")]
    Transport(String),
    /// The response could not be read as the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
    /// A single-row read matched nothing.
    #[error("row not found")]
    NotFound,
}

/// Identifies a gateway call, for logs, the memory journal and fault injection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    List(&'static str),
    Get(&'static str),
    Create(&'static str),
    Update(&'static str),
    Delete(&'static str),
    CategorySummary,
    RecentTransactions,
    MonthlySummary,
    SpendingSummary,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::List(table) => write!(f, "list {table}"),
            Self::Get(table) => write!(f, "get {table}"),
            Self::Create(table) => write!(f, "create {table}"),
            Self::Update(table) => write!(f, "update {table}"),
            Self::Delete(table) => write!(f, "delete {table}"),
            Self::CategorySummary => f.write_str("expense summary by category"),
            Self::RecentTransactions => f.write_str("recent transactions"),
            Self::MonthlySummary => f.write_str("monthly financial summary"),
            Self::SpendingSummary => f.write_str("spending summary"),
        }
    }
}

/// Typed access to the hosted database.
///
/// Table operations are generic over [`Resource`]; views and the spending
/// summary procedure have dedicated methods.
pub trait Gateway: Send + Sync {
    fn list<R: Resource>(
        &self,
        query: &Query,
    ) -> impl Future<Output = GatewayResult<Vec<R::Row>>> + Send;

    fn get<R: Resource>(&self, id: &str) -> impl Future<Output = GatewayResult<R::Row>> + Send;

    fn create<R: Resource>(
        &self,
        row: &R::Insert,
    ) -> impl Future<Output = GatewayResult<R::Row>> + Send;

    fn update<R: Resource>(
        &self,
        id: &str,
        patch: &R::Update,
    ) -> impl Future<Output = GatewayResult<R::Row>> + Send;

    fn delete<R: Resource>(&self, id: &str) -> impl Future<Output = GatewayResult<()>> + Send;

    fn expense_summary_by_category(
        &self,
    ) -> impl Future<Output = GatewayResult<Vec<CategorySummary>>> + Send;

    fn recent_transactions_detailed(
        &self,
        limit: u64,
    ) -> impl Future<Output = GatewayResult<Vec<RecentTransaction>>> + Send;

    fn monthly_financial_summary(
        &self,
    ) -> impl Future<Output = GatewayResult<Vec<MonthlySummary>>> + Send;

    fn spending_summary(
        &self,
        params: &SpendingSummaryParams,
    ) -> impl Future<Output = GatewayResult<Vec<SpendingSummaryRow>>> + Send;
}
