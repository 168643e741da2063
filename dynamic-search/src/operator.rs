use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Comparison operators accepted in a filter criterion.
///
/// Wire names are the snake_case variant names and are matched
/// case-sensitively (`eq`, `not_contains`, `is_not_null`, ...).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
    NotContains,
    Between,
    In,
    NotIn,
    IsNull,
    IsNotNull,
    SmartSearch,
}

/// What an operator expects in `value` / `value2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// No value; anything supplied is ignored.
    Nullary,
    /// A single scalar in `value`.
    Scalar,
    /// Scalars in both `value` and `value2`.
    Range,
    /// A non-empty list in `value`.
    List,
    /// Free text in `value`; absent or blank text is allowed.
    Text,
}

impl Operator {
    pub fn arity(self) -> Arity {
        match self {
            Operator::Eq
            | Operator::Ne
            | Operator::Gt
            | Operator::Gte
            | Operator::Lt
            | Operator::Lte
            | Operator::Contains
            | Operator::NotContains => Arity::Scalar,
            Operator::Between => Arity::Range,
            Operator::In | Operator::NotIn => Arity::List,
            Operator::IsNull | Operator::IsNotNull => Arity::Nullary,
            Operator::SmartSearch => Arity::Text,
        }
    }
}
