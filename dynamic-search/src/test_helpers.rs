//! Shared test helpers for database-backed tests
use crate::registry::{FieldRegistry, Searchable};
use crate::Database;
use chrono::NaiveDate;
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::OnceLock;

/// Fresh in-memory database with all migrations applied.
///
/// A single connection that never expires keeps the in-memory database alive
/// for the whole test.
pub async fn setup_test_db() -> Database {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    let db = Database::from_pool(pool);
    db.migrate().await.expect("Migration failed");

    sqlx::query(
        "CREATE TABLE records (
            id INTEGER PRIMARY KEY,
            status TEXT,
            amount REAL,
            issue_date TEXT
        )",
    )
    .execute(db.pool())
    .await
    .expect("Failed to create records table");

    db
}

/// Minimal entity used by executor tests.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Record {
    pub id: i64,
    pub status: Option<String>,
    pub amount: Option<f64>,
    pub issue_date: Option<NaiveDate>,
}

static RECORD_REGISTRY: OnceLock<FieldRegistry> = OnceLock::new();

impl Searchable for Record {
    fn registry() -> &'static FieldRegistry {
        RECORD_REGISTRY.get_or_init(|| {
            FieldRegistry::builder("Record", "records")
                .max_limit(100)
                .text("status")
                .float("amount")
                .date("issue_date")
                .build()
                .unwrap()
        })
    }
}

pub async fn insert_record(
    db: &Database,
    id: i64,
    status: Option<&str>,
    amount: Option<f64>,
    issue_date: Option<&str>,
) {
    sqlx::query("INSERT INTO records (id, status, amount, issue_date) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(status)
        .bind(amount)
        .bind(issue_date)
        .execute(db.pool())
        .await
        .unwrap();
}

/// The two rows used throughout the scenario tests.
pub async fn seed_open_and_closed(db: &Database) {
    insert_record(db, 1, Some("OPEN"), Some(10.0), Some("2024-01-05")).await;
    insert_record(db, 2, Some("CLOSED"), Some(50.0), Some("2024-02-10")).await;
}
