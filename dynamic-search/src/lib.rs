//! Dynamic filter-to-query compiler and paginated search over SQLite.
//!
//! Callers send a list of `(field, operator, value[, value2])` criteria plus
//! `limit`/`page`. Each criterion is checked against the entity's static
//! [`FieldRegistry`], compiled into a bound SQL predicate, and all predicates
//! are ANDed into a count query and a paginated fetch query.
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use dynamic_search::entities::Product;
//! use dynamic_search::{Database, FilterCriterion, Operator, SearchRequest};
//!
//! let db = Database::new("sqlite:./search.db?mode=rwc", 5).await?;
//! let request = SearchRequest::new(
//!     vec![FilterCriterion::new("name", Operator::SmartSearch, "martillo acero")],
//!     20,
//!     0,
//! );
//! let page = db.search_paginated::<Product>(&request).await?;
//! println!("{} of {} products", page.items.len(), page.total);
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod coerce;
pub mod compiler;
pub mod config;
pub mod database;
pub mod entities;
pub mod errors;
pub mod operator;
pub mod pagination;
pub mod predicate;
pub mod registry;
pub mod types;

pub use assembler::{assemble, compile_filters, CompiledSearch};
pub use compiler::compile_criterion;
pub use config::SearchConfig;
pub use database::Database;
pub use errors::{RegistryError, SearchError};
pub use operator::{Arity, Operator};
pub use pagination::{page_count, PaginatedResponse, Pagination};
pub use predicate::Predicate;
pub use registry::{FieldDescriptor, FieldRegistry, FieldType, Searchable};
pub use types::{FilterCriterion, FilterValue, SearchRequest, SearchResult};

#[cfg(test)]
pub mod test_helpers;
