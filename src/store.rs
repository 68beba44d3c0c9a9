// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePool, Sqlite};

/// Open the backing database, creating it if it doesn't exist, and run
/// migrations.
pub async fn create_db_pool(db_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        Sqlite::create_database(db_url).await?;
    }

    let pool = SqlitePool::connect(db_url).await?;

    sqlx::migrate!().run(&pool).await?;

    Ok(pool)
}

/// Read the value stored under `key`, if any.
pub async fn kv_get(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let record = sqlx::query_as::<_, (String,)>(
        r#"
        SELECT value
        FROM kv_store
        WHERE key = ?
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(record.map(|(value,)| value))
}

/// Write `value` under `key`, replacing any previous value. A single-row
/// upsert: readers see either the whole old value or the whole new one.
pub async fn kv_put(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO kv_store (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

// A pooled `:memory:` database is per-connection; keep exactly one
// connection alive so every test query sees the same database.
#[cfg(test)]
pub async fn create_test_pool() -> Result<SqlitePool> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    sqlx::migrate!().run(&pool).await?;
    Ok(pool)
}
