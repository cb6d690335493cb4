//! Sync state persistence
//!
//! SQLite storage for key/value records with last-write-wins reconciliation.

use futures::future::BoxFuture;
use sqlx::{SqliteConnection, SqlitePool};

use super::types::{BatchOutcome, SyncRecord};
use crate::config::DatabaseConfig;
use crate::db;
use crate::error::{AppError, Result};

/// Insert a record, or overwrite the stored one when the incoming timestamp
/// is not older. A stale write matches the conflict target but fails the
/// `WHERE` guard, so it reports zero affected rows.
const UPSERT_IF_NOT_OLDER: &str = r#"
    INSERT INTO sync_data (key, value, updated_at)
    VALUES (?, ?, ?)
    ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at
    WHERE excluded.updated_at >= sync_data.updated_at
"#;

/// Durable key/value store shared by all request handlers
#[derive(Clone)]
pub struct SyncStore {
    pool: SqlitePool,
}

impl SyncStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for the configured database
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = db::create_pool(config).await?;
        Ok(Self::new(pool))
    }

    /// Create the backing table if it does not exist yet
    pub async fn initialize(&self) -> Result<()> {
        db::initialize_schema(&self.pool).await
    }

    /// Run `f` inside a transaction and commit if it succeeds.
    ///
    /// If `f` (or the commit) fails, the transaction is dropped, which rolls
    /// it back and returns the connection to the pool.
    pub async fn with_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: for<'c> FnOnce(&'c mut SqliteConnection) -> BoxFuture<'c, Result<T>>,
    {
        let mut tx = self.pool.begin().await?;
        let value = f(&mut *tx).await?;
        tx.commit().await?;
        Ok(value)
    }

    /// Apply a batch of candidate writes in input order, in one transaction.
    ///
    /// Each item is written only if no record exists for its key or its
    /// `updated_at` is greater than or equal to the stored one. Older items
    /// are dropped without error. Items later in the batch see the effects
    /// of earlier ones, so repeated keys resolve to the newest timestamp.
    pub async fn apply_batch(&self, items: Vec<SyncRecord>) -> Result<BatchOutcome> {
        let total = items.len();

        let applied = self
            .with_transaction(move |conn| {
                Box::pin(async move {
                    let mut applied = 0usize;
                    for item in &items {
                        let result = sqlx::query(UPSERT_IF_NOT_OLDER)
                            .bind(&item.key)
                            .bind(&item.value)
                            .bind(item.updated_at)
                            .execute(&mut *conn)
                            .await?;

                        if result.rows_affected() > 0 {
                            applied += 1;
                        } else {
                            tracing::trace!(key = %item.key, updated_at = item.updated_at, "Discarded stale write");
                        }
                    }
                    Ok::<_, AppError>(applied)
                })
            })
            .await?;

        tracing::debug!(applied, total, "Applied sync batch");

        Ok(BatchOutcome { applied, total })
    }

    /// Get every stored record, ordered by key
    pub async fn get_all(&self) -> Result<Vec<SyncRecord>> {
        let records = sqlx::query_as::<_, SyncRecord>(
            "SELECT key, value, updated_at FROM sync_data ORDER BY key ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Get the record stored under `key`
    pub async fn get_by_key(&self, key: &str) -> Result<SyncRecord> {
        sqlx::query_as::<_, SyncRecord>(
            "SELECT key, value, updated_at FROM sync_data WHERE key = ?",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(key.to_string()))
    }

    /// Close the pool, waiting for checked-out connections to return
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
