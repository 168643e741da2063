//! Backend-native predicates and their SQLite rendering.
use crate::coerce::SqlValue;
use sqlx::{QueryBuilder, Sqlite};

/// Accented Latin letters (both cases) and the ASCII letter they fold to.
const DIACRITIC_FOLDS: &[(char, char)] = &[
    ('á', 'a'),
    ('à', 'a'),
    ('â', 'a'),
    ('ä', 'a'),
    ('ã', 'a'),
    ('å', 'a'),
    ('Á', 'a'),
    ('À', 'a'),
    ('Â', 'a'),
    ('Ä', 'a'),
    ('Ã', 'a'),
    ('Å', 'a'),
    ('é', 'e'),
    ('è', 'e'),
    ('ê', 'e'),
    ('ë', 'e'),
    ('É', 'e'),
    ('È', 'e'),
    ('Ê', 'e'),
    ('Ë', 'e'),
    ('í', 'i'),
    ('ì', 'i'),
    ('î', 'i'),
    ('ï', 'i'),
    ('Í', 'i'),
    ('Ì', 'i'),
    ('Î', 'i'),
    ('Ï', 'i'),
    ('ó', 'o'),
    ('ò', 'o'),
    ('ô', 'o'),
    ('ö', 'o'),
    ('õ', 'o'),
    ('Ó', 'o'),
    ('Ò', 'o'),
    ('Ô', 'o'),
    ('Ö', 'o'),
    ('Õ', 'o'),
    ('ú', 'u'),
    ('ù', 'u'),
    ('û', 'u'),
    ('ü', 'u'),
    ('Ú', 'u'),
    ('Ù', 'u'),
    ('Û', 'u'),
    ('Ü', 'u'),
    ('ñ', 'n'),
    ('Ñ', 'n'),
    ('ç', 'c'),
    ('Ç', 'c'),
    ('ý', 'y'),
    ('ÿ', 'y'),
    ('Ý', 'y'),
];

fn fold_char(c: char) -> char {
    DIACRITIC_FOLDS
        .iter()
        .find(|(from, _)| *from == c)
        .map(|(_, to)| *to)
        .unwrap_or(c)
}

/// Folds `s` the same way the SQL side folds the column.
///
/// SQLite `lower()` only touches ASCII, so only ASCII is lower-cased here;
/// other letters fold only through the diacritic table.
pub fn fold_text(s: &str) -> String {
    s.to_ascii_lowercase().chars().map(fold_char).collect()
}

/// Escapes LIKE metacharacters; pair with `ESCAPE '\'`.
pub fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `%value%` with the value matched literally.
pub fn contains_pattern(s: &str) -> String {
    format!("%{}%", escape_like(s))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparison {
    fn as_sql(self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "!=",
            Comparison::Gt => ">",
            Comparison::Gte => ">=",
            Comparison::Lt => "<",
            Comparison::Lte => "<=",
        }
    }
}

/// Column expression a LIKE is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextExpr {
    /// Natively textual column.
    Column(&'static str),
    /// Non-text column matched through its text form.
    Cast(&'static str),
    /// Lower-cased, diacritic-folded text form.
    Folded { column: &'static str, cast: bool },
}

impl TextExpr {
    pub fn for_column(column: &'static str, is_text: bool) -> Self {
        if is_text {
            TextExpr::Column(column)
        } else {
            TextExpr::Cast(column)
        }
    }

    pub fn folded(column: &'static str, is_text: bool) -> Self {
        TextExpr::Folded {
            column,
            cast: !is_text,
        }
    }

    fn to_sql(self) -> String {
        match self {
            TextExpr::Column(column) => column.to_string(),
            TextExpr::Cast(column) => format!("CAST({} AS TEXT)", column),
            TextExpr::Folded { column, cast } => {
                let inner = if cast {
                    format!("lower(CAST({} AS TEXT))", column)
                } else {
                    format!("lower({})", column)
                };
                DIACRITIC_FOLDS.iter().fold(inner, |acc, (from, to)| {
                    format!("replace({}, '{}', '{}')", acc, from, to)
                })
            }
        }
    }
}

/// One compiled criterion.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Matches every row.
    Always,
    Compare {
        column: &'static str,
        op: Comparison,
        value: SqlValue,
    },
    Like {
        expr: TextExpr,
        pattern: String,
        negated: bool,
    },
    /// Inclusive on both ends.
    Between {
        column: &'static str,
        low: SqlValue,
        high: SqlValue,
    },
    InSet {
        column: &'static str,
        values: Vec<SqlValue>,
        negated: bool,
    },
    IsNull {
        column: &'static str,
        negated: bool,
    },
    /// Conjunction; empty means [`Predicate::Always`].
    All(Vec<Predicate>),
}

impl Predicate {
    pub fn is_always(&self) -> bool {
        match self {
            Predicate::Always => true,
            Predicate::All(parts) => parts.iter().all(Predicate::is_always),
            _ => false,
        }
    }

    /// Appends this predicate to `qb`, binding every value.
    pub fn push_sql(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        match self {
            Predicate::Always => {
                qb.push("1 = 1");
            }
            Predicate::Compare { column, op, value } => {
                qb.push(format!("{} {} ", column, op.as_sql()));
                value.push_bind(qb);
            }
            Predicate::Like {
                expr,
                pattern,
                negated,
            } => {
                let keyword = if *negated { "NOT LIKE" } else { "LIKE" };
                qb.push(format!("{} {} ", expr.to_sql(), keyword));
                qb.push_bind(pattern.clone());
                qb.push(" ESCAPE '\\'");
            }
            Predicate::Between { column, low, high } => {
                qb.push(format!("{} BETWEEN ", column));
                low.push_bind(qb);
                qb.push(" AND ");
                high.push_bind(qb);
            }
            Predicate::InSet {
                column,
                values,
                negated,
            } => {
                let keyword = if *negated { "NOT IN" } else { "IN" };
                qb.push(format!("{} {} (", column, keyword));
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        qb.push(", ");
                    }
                    value.push_bind(qb);
                }
                qb.push(")");
            }
            Predicate::IsNull { column, negated } => {
                let keyword = if *negated { "IS NOT NULL" } else { "IS NULL" };
                qb.push(format!("{} {}", column, keyword));
            }
            Predicate::All(parts) => {
                if parts.is_empty() {
                    qb.push("1 = 1");
                    return;
                }
                qb.push("(");
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        qb.push(" AND ");
                    }
                    part.push_sql(qb);
                }
                qb.push(")");
            }
        }
    }
}
