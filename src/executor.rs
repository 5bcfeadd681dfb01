//! The SQL execution boundary.
//!
//! The engine never interprets SQL; it hands whole script texts to an
//! executor and observes success or failure. The trait seam keeps the
//! reconciler testable with an injected fake.

use sqlx::PgPool;

use crate::error::SqlError;

/// Runs arbitrary, possibly multi-statement SQL text against the
/// target database. No transaction wrapping is assumed; if the backend
/// provides any, that is its own business.
#[allow(async_fn_in_trait)]
pub trait SqlExecutor {
    async fn execute(&self, script: &str) -> Result<(), SqlError>;
}

impl<T: SqlExecutor + Sync> SqlExecutor for &T {
    async fn execute(&self, script: &str) -> Result<(), SqlError> {
        (**self).execute(script).await
    }
}

/// PostgreSQL executor over an sqlx connection pool.
#[derive(Clone)]
pub struct PgExecutor {
    pool: PgPool,
}

impl PgExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl SqlExecutor for PgExecutor {
    async fn execute(&self, script: &str) -> Result<(), SqlError> {
        // raw_sql runs the text as-is, statement separators included.
        sqlx::raw_sql(script).execute(&self.pool).await?;
        Ok(())
    }
}
