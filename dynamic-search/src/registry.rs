use crate::errors::{RegistryError, SearchError};
use regex::Regex;
use sqlx::sqlite::SqliteRow;
use std::collections::HashMap;
use std::sync::OnceLock;

static IDENTIFIER_REGEX: OnceLock<Regex> = OnceLock::new();

fn identifier_regex() -> &'static Regex {
    IDENTIFIER_REGEX.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap())
}

fn check_identifier(ident: &str) -> Result<(), RegistryError> {
    if identifier_regex().is_match(ident) {
        Ok(())
    } else {
        Err(RegistryError::InvalidIdentifier(ident.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Integer,
    Float,
    Bool,
    Date,
}

/// A searchable field of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub column: &'static str,
    pub field_type: FieldType,
}

impl FieldDescriptor {
    pub fn is_date_field(&self) -> bool {
        self.field_type == FieldType::Date
    }

    pub fn is_text_field(&self) -> bool {
        self.field_type == FieldType::Text
    }
}

/// Static allowlist mapping logical field names to table columns.
///
/// Built once per entity type and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    entity: &'static str,
    table: &'static str,
    order_column: &'static str,
    max_limit: i64,
    fields: HashMap<&'static str, FieldDescriptor>,
}

impl FieldRegistry {
    pub fn builder(entity: &'static str, table: &'static str) -> FieldRegistryBuilder {
        FieldRegistryBuilder {
            entity,
            table,
            order_column: "id",
            max_limit: 100,
            fields: Vec::new(),
        }
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    pub fn order_column(&self) -> &'static str {
        self.order_column
    }

    /// Largest page size this entity serves.
    pub fn max_limit(&self) -> i64 {
        self.max_limit
    }

    /// Looks up a field by its logical name.
    pub fn resolve(&self, field: &str) -> Result<&FieldDescriptor, SearchError> {
        self.fields
            .get(field)
            .ok_or_else(|| SearchError::UnknownField {
                entity: self.entity,
                field: field.to_string(),
            })
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.fields.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

pub struct FieldRegistryBuilder {
    entity: &'static str,
    table: &'static str,
    order_column: &'static str,
    max_limit: i64,
    fields: Vec<FieldDescriptor>,
}

impl FieldRegistryBuilder {
    pub fn order_by(mut self, column: &'static str) -> Self {
        self.order_column = column;
        self
    }

    pub fn max_limit(mut self, max_limit: i64) -> Self {
        self.max_limit = max_limit;
        self
    }

    /// Registers a field whose logical name differs from its column.
    pub fn field(mut self, name: &'static str, column: &'static str, field_type: FieldType) -> Self {
        self.fields.push(FieldDescriptor {
            name,
            column,
            field_type,
        });
        self
    }

    pub fn text(self, name: &'static str) -> Self {
        self.field(name, name, FieldType::Text)
    }

    pub fn integer(self, name: &'static str) -> Self {
        self.field(name, name, FieldType::Integer)
    }

    pub fn float(self, name: &'static str) -> Self {
        self.field(name, name, FieldType::Float)
    }

    pub fn boolean(self, name: &'static str) -> Self {
        self.field(name, name, FieldType::Bool)
    }

    pub fn date(self, name: &'static str) -> Self {
        self.field(name, name, FieldType::Date)
    }

    pub fn build(self) -> Result<FieldRegistry, RegistryError> {
        check_identifier(self.table)?;
        check_identifier(self.order_column)?;
        if self.max_limit < 1 {
            return Err(RegistryError::InvalidMaxLimit(self.entity));
        }

        let mut fields = HashMap::with_capacity(self.fields.len());
        for descriptor in self.fields {
            check_identifier(descriptor.column)?;
            if fields.contains_key(descriptor.name) {
                return Err(RegistryError::DuplicateField {
                    entity: self.entity,
                    field: descriptor.name.to_string(),
                });
            }
            fields.insert(descriptor.name, descriptor);
        }

        Ok(FieldRegistry {
            entity: self.entity,
            table: self.table,
            order_column: self.order_column,
            max_limit: self.max_limit,
            fields,
        })
    }
}

/// A row type that can be searched through its field registry.
pub trait Searchable: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin {
    fn registry() -> &'static FieldRegistry;
}
