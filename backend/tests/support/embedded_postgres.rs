//! Embedded PostgreSQL for adapter tests.
//!
//! Every test gets its own temporary database on the process-wide cluster
//! from `pg-embed-setup-unpriv`, migrated with the crate's own Diesel
//! migrations. Seeding, counting and schema sabotage go through a plain
//! `postgres` client so they never share a connection with the pool under
//! test.

use std::time::Duration;

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use postgres::{Client, NoTls};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const CLUSTER_RETRIES: usize = 5;
const CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// True when `SKIP_TEST_CLUSTER` is `1`, `true` or `yes` (any case).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip with a marker when `SKIP_TEST_CLUSTER` is set, otherwise fail loudly.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// One-line summary of a `postgres` error, with SQLSTATE and detail when the
/// server sent them.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };
    let mut summary = format!("postgres error {:?}: {}", db_error.code(), db_error.message());
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}

/// A fresh, fully migrated database. Dropped with the returned handle.
pub fn migrated_database() -> Result<TemporaryDatabase, String> {
    let mut attempt = 1;
    let cluster = loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => break handle,
            Err(error) if attempt < CLUSTER_RETRIES => {
                eprintln!("pg-embed: cluster attempt {attempt}/{CLUSTER_RETRIES} failed: {error}");
                std::thread::sleep(CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
            Err(error) => return Err(format!("shared cluster: {error}")),
        }
    };
    let database = cluster
        .temporary_database(format!("test_{}", uuid::Uuid::new_v4()).as_str())
        .map_err(|error| format!("create database: {error:?}"))?;
    migrate_schema(database.url())?;
    Ok(database)
}

/// Run every pending clinic migration against `url`.
pub fn migrate_schema(url: &str) -> Result<(), String> {
    let mut conn = PgConnection::establish(url).map_err(|error| format!("connect: {error}"))?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|error| format!("migration: {error}"))?;
    Ok(())
}

fn client(url: &str) -> Result<Client, String> {
    Client::connect(url, NoTls).map_err(|error| format_postgres_error(&error))
}

/// Drop `table` so the next statement touching it fails mid-transaction.
pub fn drop_table(url: &str, table: &str) -> Result<(), String> {
    let escaped = table.replace('"', "\"\"");
    client(url)?
        .batch_execute(&format!(r#"DROP TABLE IF EXISTS "{escaped}""#))
        .map_err(|error| format_postgres_error(&error))
}

/// Number of rows currently in `table`.
pub fn count_rows(url: &str, table: &str) -> Result<i64, String> {
    let escaped = table.replace('"', "\"\"");
    let row = client(url)?
        .query_one(&format!(r#"SELECT COUNT(*) FROM "{escaped}""#), &[])
        .map_err(|error| format_postgres_error(&error))?;
    Ok(row.get(0))
}
