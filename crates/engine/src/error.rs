//! The module contains the errors the engine can return.
//!
//! - [`EngineError`] for malformed user input (amounts, currencies).
//! - [`GatewayError`] for failed gateway calls.
//! - [`LoadError`] when a dashboard load is aborted.
//! - [`FormError`] when a form submission is rejected.
//!
//!  [`GatewayError`]: crate::gateway::GatewayError
use thiserror::Error;

use crate::gateway::{GatewayError, Operation};

/// Engine custom errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),
}

/// A dashboard load aborted because one of its queries failed.
///
/// The message shown to the user is always the generic one; the source is
/// kept for logs.
#[derive(Error, Debug)]
#[error("Failed to load dashboard data")]
pub struct LoadError {
    pub operation: Operation,
    #[source]
    pub source: GatewayError,
}

/// Why a form submission did not create a row.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    /// Rejected before any gateway call.
    #[error("{0}")]
    Validation(&'static str),
    /// The gateway refused the insert; the message is shown verbatim.
    #[error("{0}")]
    Gateway(String),
}
