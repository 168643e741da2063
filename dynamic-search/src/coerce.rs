//! Conversion of caller-supplied values into bindable SQL values.
use crate::errors::SearchError;
use crate::operator::Operator;
use crate::registry::FieldDescriptor;
use crate::types::FilterValue;
use chrono::NaiveDate;
use regex::Regex;
use sqlx::{QueryBuilder, Sqlite};
use std::sync::OnceLock;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

static DATE_REGEX: OnceLock<Regex> = OnceLock::new();

fn date_regex() -> &'static Regex {
    DATE_REGEX.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap())
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
}

impl SqlValue {
    pub(crate) fn push_bind(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            SqlValue::String(s) => qb.push_bind(s.clone()),
            SqlValue::Integer(i) => qb.push_bind(*i),
            SqlValue::Float(f) => qb.push_bind(*f),
            SqlValue::Bool(b) => qb.push_bind(*b),
            SqlValue::Date(d) => qb.push_bind(*d),
        };
    }
}

/// Parses a strict `YYYY-MM-DD` string.
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, SearchError> {
    let invalid = || SearchError::InvalidDateFormat {
        field: field.to_string(),
        value: raw.to_string(),
    };
    if !date_regex().is_match(raw) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid())
}

/// Normalizes one value for the target field.
///
/// Strings aimed at date fields are parsed as dates; everything else passes
/// through with its own type. Only scalars are accepted here.
pub fn coerce_value(
    field: &FieldDescriptor,
    operator: Operator,
    value: &FilterValue,
) -> Result<SqlValue, SearchError> {
    let coerced = match value {
        FilterValue::Text(s) if field.is_date_field() => SqlValue::Date(parse_date(field.name, s)?),
        FilterValue::Text(s) => SqlValue::String(s.clone()),
        FilterValue::Integer(i) => SqlValue::Integer(*i),
        FilterValue::Float(f) => SqlValue::Float(*f),
        FilterValue::Bool(b) => SqlValue::Bool(*b),
        FilterValue::Date(d) => SqlValue::Date(*d),
        FilterValue::List(_) => {
            return Err(SearchError::InvalidValueType {
                field: field.name.to_string(),
                operator,
                reason: "expected a single value, got a list".to_string(),
            })
        }
    };
    Ok(coerced)
}
