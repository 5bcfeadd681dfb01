//! sqltide — forward/backward SQL schema migrations.
//!
//! Migrations live on disk as timestamped `.sql` files, each holding an
//! up script and a down script split by a fixed separator line. The
//! engine diffs the file set against a history table in the target
//! database, applies the pending files in file-name order, and can
//! reverse the most recently applied ones in applied-time order.
//!
//! The database boundaries are traits ([`SqlExecutor`], [`HistoryStore`])
//! with PostgreSQL implementations over sqlx, so the reconciler itself
//! is testable with injected fakes.
//!
//! # Example
//! ```no_run
//! use sqltide::{MigrationRunner, PgExecutor, PgHistoryStore};
//! use sqlx::PgPool;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = PgPool::connect("postgres://localhost/app").await?;
//! let runner = MigrationRunner::new(
//!     PgExecutor::new(pool.clone()),
//!     PgHistoryStore::new(pool),
//!     "migrations",
//! )?;
//! let summary = runner.migrate_up().await?;
//! println!("applied {} migration(s)", summary.applied.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Known limitations
//! - A script execution and its history mutation are separate
//!   operations; a crash between the two leaves history out of step
//!   with the database.
//! - No cross-process locking: two runners against the same database
//!   are unsynchronized.
//! - Aborted batches keep their earlier successes, in both directions.

pub mod config;
pub mod error;
pub mod executor;
pub mod history;
pub mod migration;
pub mod runner;
pub mod scanner;

pub use config::{Config, ConfigError};
pub use error::{MigrateError, SqlError};
pub use executor::{PgExecutor, SqlExecutor};
pub use history::{HistoryStore, PgHistoryStore};
pub use migration::{Migration, SEPARATOR};
pub use runner::{DownSummary, MigrationRunner, StatusReport, UpSummary, create_migration};
