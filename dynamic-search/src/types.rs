//! Request and result types of the dynamic search.
use crate::operator::Operator;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw value supplied by the caller.
///
/// JSON strings always deserialize as [`FilterValue::Text`]; the `Date`
/// variant exists for callers that already hold a typed date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    List(Vec<FilterValue>),
}

impl FilterValue {
    pub fn is_list(&self) -> bool {
        matches!(self, FilterValue::List(_))
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Bool(b) => write!(f, "{}", b),
            FilterValue::Integer(i) => write!(f, "{}", i),
            FilterValue::Float(x) => write!(f, "{}", x),
            FilterValue::Text(s) => f.write_str(s),
            FilterValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FilterValue::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<i64> for FilterValue {
    fn from(i: i64) -> Self {
        FilterValue::Integer(i)
    }
}

impl From<f64> for FilterValue {
    fn from(x: f64) -> Self {
        FilterValue::Float(x)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(d: NaiveDate) -> Self {
        FilterValue::Date(d)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(items: Vec<T>) -> Self {
        FilterValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// One field/operator/value comparison as received from the caller.
///
/// The operator stays a string until compilation so that an unknown name is
/// reported as [`crate::SearchError::UnsupportedOperator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriterion {
    pub field: String,
    pub operator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FilterValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<FilterValue>,
}

impl FilterCriterion {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            operator: operator.to_string(),
            value: Some(value.into()),
            value2: None,
        }
    }

    pub fn between(
        field: impl Into<String>,
        low: impl Into<FilterValue>,
        high: impl Into<FilterValue>,
    ) -> Self {
        Self {
            field: field.into(),
            operator: Operator::Between.to_string(),
            value: Some(low.into()),
            value2: Some(high.into()),
        }
    }

    /// Criterion without values (`is_null`, `is_not_null`).
    pub fn unary(field: impl Into<String>, operator: Operator) -> Self {
        Self {
            field: field.into(),
            operator: operator.to_string(),
            value: None,
            value2: None,
        }
    }
}

pub fn default_limit() -> i64 {
    20
}

/// Filters plus pagination, deserialized from the inbound JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub filters: Vec<FilterCriterion>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub page: i64,
}

impl SearchRequest {
    pub fn new(filters: Vec<FilterCriterion>, limit: i64, page: i64) -> Self {
        Self {
            filters,
            limit,
            page,
        }
    }
}

/// One page of matching rows plus the unpaginated match count.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult<T> {
    pub items: Vec<T>,
    pub total: i64,
}
