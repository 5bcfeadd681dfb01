//! The applied-migration history store.
//!
//! The history table is the only persistent state the engine owns and
//! the source of truth for reconciliation: entries are created by
//! apply, deleted by rollback, and never otherwise mutated.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::SqlError;

/// Durable log of which migration files have been applied, and when.
#[allow(async_fn_in_trait)]
pub trait HistoryStore {
    /// Create the backing structure if absent. Safe to call on every run.
    async fn ensure_schema(&self) -> Result<(), SqlError>;

    /// Applied file names ordered by application time, ascending.
    ///
    /// This ordering, not file-name order, defines "most recently
    /// applied" for rollback purposes.
    async fn list_applied(&self) -> Result<Vec<String>, SqlError>;

    /// Append one entry.
    async fn record_applied(
        &self,
        file_name: &str,
        applied_on: DateTime<Utc>,
    ) -> Result<(), SqlError>;

    /// Delete the entry for `file_name`. Deleting a missing entry is a
    /// no-op, not an error.
    async fn remove_applied(&self, file_name: &str) -> Result<(), SqlError>;
}

impl<T: HistoryStore + Sync> HistoryStore for &T {
    async fn ensure_schema(&self) -> Result<(), SqlError> {
        (**self).ensure_schema().await
    }

    async fn list_applied(&self) -> Result<Vec<String>, SqlError> {
        (**self).list_applied().await
    }

    async fn record_applied(
        &self,
        file_name: &str,
        applied_on: DateTime<Utc>,
    ) -> Result<(), SqlError> {
        (**self).record_applied(file_name, applied_on).await
    }

    async fn remove_applied(&self, file_name: &str) -> Result<(), SqlError> {
        (**self).remove_applied(file_name).await
    }
}

/// PostgreSQL history store over an sqlx connection pool.
///
/// Backing table: `migrations (id, migration_file, applied_on)`. The
/// unique constraint on `migration_file` is a second line of defense;
/// the reconciliation diff is what normally prevents double-apply.
#[derive(Clone)]
pub struct PgHistoryStore {
    pool: PgPool,
}

const ENSURE_TABLE: &str = "\
create table if not exists migrations (
    id serial primary key,
    migration_file varchar(255) not null unique,
    applied_on timestamptz
)";

impl PgHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl HistoryStore for PgHistoryStore {
    async fn ensure_schema(&self) -> Result<(), SqlError> {
        sqlx::query(ENSURE_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    async fn list_applied(&self) -> Result<Vec<String>, SqlError> {
        let files =
            sqlx::query_scalar("select migration_file from migrations order by applied_on")
                .fetch_all(&self.pool)
                .await?;
        Ok(files)
    }

    async fn record_applied(
        &self,
        file_name: &str,
        applied_on: DateTime<Utc>,
    ) -> Result<(), SqlError> {
        sqlx::query("insert into migrations (migration_file, applied_on) values ($1, $2)")
            .bind(file_name)
            .bind(applied_on)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove_applied(&self, file_name: &str) -> Result<(), SqlError> {
        sqlx::query("delete from migrations where migration_file = $1")
            .bind(file_name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
