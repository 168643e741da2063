use crate::assembler::{assemble, CompiledSearch};
use crate::errors::SearchError;
use crate::pagination::PaginatedResponse;
use crate::registry::Searchable;
use crate::types::{SearchRequest, SearchResult};
use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

#[derive(Clone)]
pub struct Database {
    pub(crate) pool: SqlitePool,
}

impl Database {
    /// Opens (creating if needed) the database and applies migrations.
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to {}", database_url))?;
        let db = Self::from_pool(pool);
        db.migrate().await?;
        Ok(db)
    }

    /// Wraps an existing pool without touching the schema.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .context("Failed to run migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Runs a filtered, paginated search over `T`'s table.
    ///
    /// Filters and pagination are validated first; an invalid request never
    /// reaches the database.
    pub async fn search<T: Searchable>(
        &self,
        request: &SearchRequest,
    ) -> Result<SearchResult<T>, SearchError> {
        let registry = T::registry();
        let compiled = assemble(registry, request).inspect_err(|e| {
            tracing::warn!("Rejected search on {}: {}", registry.entity(), e);
        })?;
        self.execute(&compiled).await
    }

    /// Same as [`Database::search`], wrapped in the page envelope.
    pub async fn search_paginated<T: Searchable>(
        &self,
        request: &SearchRequest,
    ) -> Result<PaginatedResponse<T>, SearchError> {
        let result = self.search(request).await?;
        Ok(PaginatedResponse::new(result, request.page, request.limit))
    }

    /// Runs the count and fetch queries of an already compiled search.
    ///
    /// Both are independent reads and run concurrently; small skew between
    /// `total` and `items` under concurrent writes is accepted.
    pub async fn execute<T: Searchable>(
        &self,
        compiled: &CompiledSearch,
    ) -> Result<SearchResult<T>, SearchError> {
        let mut count_query = compiled.count_query();
        let mut fetch_query = compiled.fetch_query();
        tracing::debug!("Search count: {}", count_query.sql());
        tracing::debug!("Search fetch: {}", fetch_query.sql());

        let (total, items) = tokio::try_join!(
            count_query
                .build_query_scalar::<i64>()
                .fetch_one(&self.pool),
            fetch_query.build_query_as::<T>().fetch_all(&self.pool),
        )
        .inspect_err(|e| tracing::error!("Search query failed: {}", e))?;

        tracing::debug!("Search matched {} rows, returning {}", total, items.len());
        Ok(SearchResult { items, total })
    }
}
