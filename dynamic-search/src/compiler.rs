use crate::coerce::{coerce_value, SqlValue};
use crate::errors::SearchError;
use crate::operator::{Arity, Operator};
use crate::predicate::{contains_pattern, fold_text, Comparison, Predicate, TextExpr};
use crate::registry::{FieldDescriptor, FieldRegistry};
use crate::types::{FilterCriterion, FilterValue};
use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

static TERM_SPLIT_REGEX: OnceLock<Regex> = OnceLock::new();

fn term_split_regex() -> &'static Regex {
    TERM_SPLIT_REGEX.get_or_init(|| Regex::new(r"[\s\W]+").unwrap())
}

/// Splits free text into distinct search terms, dropping blanks.
pub fn tokenize_terms(text: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for term in term_split_regex().split(text) {
        if !term.is_empty() && !terms.iter().any(|t| t == term) {
            terms.push(term.to_string());
        }
    }
    terms
}

/// Compiles one criterion against an entity's registry.
///
/// The field is resolved before the operator is looked at, so an unknown
/// field always wins over any other problem with the criterion.
pub fn compile_criterion(
    registry: &FieldRegistry,
    criterion: &FilterCriterion,
) -> Result<Predicate, SearchError> {
    let field = registry.resolve(&criterion.field)?;
    let operator = Operator::from_str(&criterion.operator)
        .map_err(|_| SearchError::UnsupportedOperator(criterion.operator.clone()))?;

    if criterion.value2.is_some() && !matches!(operator.arity(), Arity::Range | Arity::Nullary) {
        return Err(usage_error(
            field,
            operator,
            "value2 is only accepted by 'between'",
        ));
    }

    match operator {
        Operator::Eq => compile_comparison(field, operator, Comparison::Eq, criterion),
        Operator::Ne => compile_comparison(field, operator, Comparison::Ne, criterion),
        Operator::Gt => compile_comparison(field, operator, Comparison::Gt, criterion),
        Operator::Gte => compile_comparison(field, operator, Comparison::Gte, criterion),
        Operator::Lt => compile_comparison(field, operator, Comparison::Lt, criterion),
        Operator::Lte => compile_comparison(field, operator, Comparison::Lte, criterion),
        Operator::Contains => compile_contains(field, operator, criterion, false),
        Operator::NotContains => compile_contains(field, operator, criterion, true),
        Operator::Between => compile_between(field, criterion),
        Operator::In => compile_membership(field, operator, criterion, false),
        Operator::NotIn => compile_membership(field, operator, criterion, true),
        Operator::IsNull => Ok(compile_null_check(field, false)),
        Operator::IsNotNull => Ok(compile_null_check(field, true)),
        Operator::SmartSearch => compile_smart_search(field, criterion),
    }
}

fn usage_error(field: &FieldDescriptor, operator: Operator, reason: &str) -> SearchError {
    SearchError::InvalidOperatorUsage {
        field: field.name.to_string(),
        operator,
        reason: reason.to_string(),
    }
}

fn value_type_error(field: &FieldDescriptor, operator: Operator, reason: &str) -> SearchError {
    SearchError::InvalidValueType {
        field: field.name.to_string(),
        operator,
        reason: reason.to_string(),
    }
}

/// Text form of `value` as SQLite renders the stored column.
fn stored_text(value: &FilterValue) -> String {
    match value {
        FilterValue::Bool(true) => "1".to_string(),
        FilterValue::Bool(false) => "0".to_string(),
        other => other.to_string(),
    }
}

fn required_value<'a>(
    field: &FieldDescriptor,
    operator: Operator,
    criterion: &'a FilterCriterion,
) -> Result<&'a FilterValue, SearchError> {
    criterion
        .value
        .as_ref()
        .ok_or_else(|| usage_error(field, operator, "a value is required"))
}

fn compile_comparison(
    field: &FieldDescriptor,
    operator: Operator,
    op: Comparison,
    criterion: &FilterCriterion,
) -> Result<Predicate, SearchError> {
    let value = coerce_value(field, operator, required_value(field, operator, criterion)?)?;
    Ok(Predicate::Compare {
        column: field.column,
        op,
        value,
    })
}

fn compile_contains(
    field: &FieldDescriptor,
    operator: Operator,
    criterion: &FilterCriterion,
    negated: bool,
) -> Result<Predicate, SearchError> {
    let value = required_value(field, operator, criterion)?;
    if value.is_list() {
        return Err(value_type_error(
            field,
            operator,
            "expected a single value, got a list",
        ));
    }
    Ok(Predicate::Like {
        expr: TextExpr::for_column(field.column, field.is_text_field()),
        pattern: contains_pattern(&stored_text(value)),
        negated,
    })
}

fn compile_between(
    field: &FieldDescriptor,
    criterion: &FilterCriterion,
) -> Result<Predicate, SearchError> {
    let operator = Operator::Between;
    let low = required_value(field, operator, criterion)?;
    let high = criterion
        .value2
        .as_ref()
        .ok_or_else(|| SearchError::MissingSecondValue {
            field: field.name.to_string(),
        })?;
    Ok(Predicate::Between {
        column: field.column,
        low: coerce_value(field, operator, low)?,
        high: coerce_value(field, operator, high)?,
    })
}

fn compile_membership(
    field: &FieldDescriptor,
    operator: Operator,
    criterion: &FilterCriterion,
    negated: bool,
) -> Result<Predicate, SearchError> {
    let items = match &criterion.value {
        Some(FilterValue::List(items)) if !items.is_empty() => items,
        Some(FilterValue::List(_)) => {
            return Err(value_type_error(field, operator, "the list of values is empty"))
        }
        _ => {
            return Err(value_type_error(
                field,
                operator,
                "a list of values is required",
            ))
        }
    };
    let values = items
        .iter()
        .map(|item| coerce_value(field, operator, item))
        .collect::<Result<Vec<SqlValue>, _>>()?;
    Ok(Predicate::InSet {
        column: field.column,
        values,
        negated,
    })
}

fn compile_null_check(field: &FieldDescriptor, negated: bool) -> Predicate {
    Predicate::IsNull {
        column: field.column,
        negated,
    }
}

/// Every term must appear in the field, ignoring case and diacritics.
fn compile_smart_search(
    field: &FieldDescriptor,
    criterion: &FilterCriterion,
) -> Result<Predicate, SearchError> {
    let text = match &criterion.value {
        None => return Ok(Predicate::Always),
        Some(FilterValue::List(_)) => {
            return Err(value_type_error(
                field,
                Operator::SmartSearch,
                "expected search text, got a list",
            ))
        }
        Some(value) => stored_text(value),
    };

    let parts: Vec<Predicate> = tokenize_terms(&text)
        .iter()
        .map(|term| Predicate::Like {
            expr: TextExpr::folded(field.column, field.is_text_field()),
            pattern: contains_pattern(&fold_text(term)),
            negated: false,
        })
        .collect();

    if parts.is_empty() {
        Ok(Predicate::Always)
    } else {
        Ok(Predicate::All(parts))
    }
}
