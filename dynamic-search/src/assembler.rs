use crate::compiler::compile_criterion;
use crate::errors::SearchError;
use crate::pagination::Pagination;
use crate::predicate::Predicate;
use crate::registry::FieldRegistry;
use crate::types::{FilterCriterion, SearchRequest};
use sqlx::{QueryBuilder, Sqlite};

/// Compiles every criterion in input order; the first failure aborts all.
///
/// Predicates that match everything are dropped.
pub fn compile_filters(
    registry: &FieldRegistry,
    filters: &[FilterCriterion],
) -> Result<Vec<Predicate>, SearchError> {
    let mut predicates = Vec::with_capacity(filters.len());
    for criterion in filters {
        let predicate = compile_criterion(registry, criterion)?;
        if !predicate.is_always() {
            predicates.push(predicate);
        }
    }
    Ok(predicates)
}

/// A fully validated search, ready to be turned into count and fetch queries.
#[derive(Debug, Clone)]
pub struct CompiledSearch {
    table: &'static str,
    order_column: &'static str,
    predicates: Vec<Predicate>,
    pagination: Pagination,
}

/// Validates filters and pagination of `request` against `registry`.
pub fn assemble(
    registry: &FieldRegistry,
    request: &SearchRequest,
) -> Result<CompiledSearch, SearchError> {
    let predicates = compile_filters(registry, &request.filters)?;
    let pagination = Pagination::new(request.limit, request.page, registry.max_limit())?;
    Ok(CompiledSearch {
        table: registry.table(),
        order_column: registry.order_column(),
        predicates,
        pagination,
    })
}

impl CompiledSearch {
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    fn push_where(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        for (i, predicate) in self.predicates.iter().enumerate() {
            qb.push(if i == 0 { " WHERE " } else { " AND " });
            predicate.push_sql(qb);
        }
    }

    /// `SELECT COUNT(*)` over the filtered table, ignoring pagination.
    pub fn count_query(&self) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", self.table));
        self.push_where(&mut qb);
        qb
    }

    /// Filtered rows in a stable order, then `LIMIT ? OFFSET ?`.
    pub fn fetch_query(&self) -> QueryBuilder<'static, Sqlite> {
        let mut qb = QueryBuilder::new(format!("SELECT * FROM {}", self.table));
        self.push_where(&mut qb);
        qb.push(format!(" ORDER BY {} ASC LIMIT ", self.order_column));
        qb.push_bind(self.pagination.limit());
        qb.push(" OFFSET ");
        qb.push_bind(self.pagination.offset());
        qb
    }
}
