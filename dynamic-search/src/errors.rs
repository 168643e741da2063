use crate::operator::Operator;
use thiserror::Error;

/// Failures of a search request.
///
/// Everything except [`SearchError::Query`] is a caller input error: it is
/// detected before any query runs and must never be retried.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Field '{field}' does not exist in {entity}")]
    UnknownField { entity: &'static str, field: String },

    #[error("Operator '{0}' is not supported")]
    UnsupportedOperator(String),

    #[error("Operator '{operator}' on field '{field}': {reason}")]
    InvalidOperatorUsage {
        field: String,
        operator: Operator,
        reason: String,
    },

    #[error("Operator '{operator}' on field '{field}': {reason}")]
    InvalidValueType {
        field: String,
        operator: Operator,
        reason: String,
    },

    #[error("Value '{value}' is not a valid date for field '{field}' (expected format: YYYY-MM-DD)")]
    InvalidDateFormat { field: String, value: String },

    #[error("Operator 'between' on field '{field}' requires value2")]
    MissingSecondValue { field: String },

    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("Search query failed: {0}")]
    Query(#[from] sqlx::Error),
}

impl SearchError {
    /// True for rejected input, false for store/infrastructure failures.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, SearchError::Query(_))
    }
}

/// Problems found while building a static field registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid SQL identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("Field '{field}' registered twice for {entity}")]
    DuplicateField { entity: &'static str, field: String },

    #[error("Registry for {0} must allow at least one row per page")]
    InvalidMaxLimit(&'static str),
}
