use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the ledger store, rule services and the catch-up pass.
#[derive(Debug, Error)]
pub enum FinPlanError {
    /// A single read or write was rejected. Scoped to the rule being processed.
    #[error("Persistence error: {0}")]
    Storage(String),
    /// The store cannot be reached at all; no further work can succeed.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Recurring rule not found: {0}")]
    RuleNotFound(Uuid),
    #[error("Invalid recurring rule: {0}")]
    InvalidRule(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Session data not loaded")]
    SessionNotLoaded,
}

impl FinPlanError {
    /// Returns true when the error should abort the whole pass instead of one rule.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FinPlanError::StoreUnavailable(_))
    }
}

pub type Result<T> = StdResult<T, FinPlanError>;

impl From<std::io::Error> for FinPlanError {
    fn from(err: std::io::Error) -> Self {
        FinPlanError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for FinPlanError {
    fn from(err: serde_json::Error) -> Self {
        FinPlanError::Storage(err.to_string())
    }
}
