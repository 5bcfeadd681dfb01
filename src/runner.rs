//! The reconciler: diffs the migration directory against applied
//! history and drives the apply/rollback state transitions.
//!
//! From the engine's perspective a migration identifier is in one of
//! two visible states: pending (on disk, absent from history) or
//! applied (on disk, present in history). `migrate_up` moves pending
//! identifiers to applied in ascending file-name order; `rollback_last`
//! moves the most recently applied ones back to pending in descending
//! applied-time order. There are no other transitions.
//!
//! A script execution and its history mutation are two separate
//! operations against the backends; a crash between them leaves the
//! history store out of step with the database. That gap is a known
//! limitation of the format, kept here deliberately rather than papered
//! over with transaction wrapping the executor may not support.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, Utc};
use colored::Colorize;

use crate::error::MigrateError;
use crate::executor::SqlExecutor;
use crate::history::HistoryStore;
use crate::migration::{self, Migration};
use crate::scanner;

/// Outcome of a `migrate_up` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpSummary {
    /// Files applied this run, in apply order.
    pub applied: Vec<String>,
    /// Files skipped because history already had them.
    pub skipped: usize,
}

/// Outcome of a `rollback_last` run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DownSummary {
    /// Files rolled back this run, most recently applied first.
    pub rolled_back: Vec<String>,
}

/// Applied-versus-pending view for status reporting.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// Applied files in application order.
    pub applied: Vec<String>,
    /// On-disk files not yet applied, in apply order.
    pub pending: Vec<String>,
}

/// Drives migrations against an injected SQL executor and history
/// store. Single-threaded and strictly sequential: one migration runs
/// to completion, history update included, before the next begins.
///
/// Nothing here guards against a second runner process on the same
/// database; concurrent invocations can race on the history table.
pub struct MigrationRunner<E, H> {
    executor: E,
    history: H,
    migrations_dir: PathBuf,
}

impl<E: SqlExecutor, H: HistoryStore> MigrationRunner<E, H> {
    /// Build a runner rooted at `migrations_dir`, creating the
    /// directory if it does not exist yet.
    pub fn new(
        executor: E,
        history: H,
        migrations_dir: impl Into<PathBuf>,
    ) -> Result<Self, MigrateError> {
        let migrations_dir = migrations_dir.into();
        scanner::ensure_dir(&migrations_dir)?;
        Ok(Self {
            executor,
            history,
            migrations_dir,
        })
    }

    /// Apply every pending migration in ascending file-name order.
    ///
    /// Already-applied files are skipped without execution, so
    /// re-running over an applied prefix is a no-op. Processing stops
    /// at the first failing up script: that migration stays unrecorded
    /// and later pending ones are not attempted, while everything
    /// applied earlier in the batch remains committed.
    pub async fn migrate_up(&self) -> Result<UpSummary, MigrateError> {
        self.history.ensure_schema().await?;
        let files = scanner::list_migration_files(&self.migrations_dir)?;
        let applied = self.history.list_applied().await?;
        let applied: HashSet<&str> = applied.iter().map(String::as_str).collect();

        let mut summary = UpSummary::default();
        for file in files {
            if applied.contains(file.as_str()) {
                summary.skipped += 1;
                continue;
            }
            let m = self.load(&file)?;
            println!("{} {}", "Applying".cyan().bold(), file.yellow());
            self.executor
                .execute(&m.up)
                .await
                .map_err(|source| MigrateError::UpScriptFailed {
                    file: file.clone(),
                    source,
                })?;
            self.history.record_applied(&file, Utc::now()).await?;
            summary.applied.push(file);
        }
        Ok(summary)
    }

    /// Roll back the `count` most recently applied migrations, in
    /// descending applied-time order. Rolls back `min(count, applied)`;
    /// an empty history yields an empty summary, not an error.
    ///
    /// A history entry whose file is gone from disk aborts the batch
    /// before anything runs for it. A failing down script aborts the
    /// batch at that point; rollbacks committed earlier in the batch
    /// stay committed.
    pub async fn rollback_last(&self, count: usize) -> Result<DownSummary, MigrateError> {
        self.history.ensure_schema().await?;
        let applied = self.history.list_applied().await?;

        let mut summary = DownSummary::default();
        for file in applied.iter().rev().take(count) {
            let m = self.load(file)?;
            println!("{} {}", "Reverting".magenta().bold(), file.yellow());
            self.executor
                .execute(&m.down)
                .await
                .map_err(|source| MigrateError::DownScriptFailed {
                    file: file.clone(),
                    source,
                })?;
            self.history.remove_applied(file).await?;
            summary.rolled_back.push(file.clone());
        }
        Ok(summary)
    }

    /// Compute the applied/pending split without touching anything.
    pub async fn status(&self) -> Result<StatusReport, MigrateError> {
        self.history.ensure_schema().await?;
        let files = scanner::list_migration_files(&self.migrations_dir)?;
        let applied = self.history.list_applied().await?;
        let applied_set: HashSet<&str> = applied.iter().map(String::as_str).collect();
        let pending = files
            .into_iter()
            .filter(|f| !applied_set.contains(f.as_str()))
            .collect();
        Ok(StatusReport { applied, pending })
    }

    fn load(&self, file_name: &str) -> Result<Migration, MigrateError> {
        let path = self.migrations_dir.join(file_name);
        if !path.is_file() {
            return Err(MigrateError::MissingFile {
                file: file_name.to_string(),
                dir: self.migrations_dir.display().to_string(),
            });
        }
        let content = fs::read_to_string(&path)?;
        Migration::parse(file_name, &content)
    }
}

/// Create a new timestamped migration file in `dir` from the template,
/// creating the directory if needed. Returns the path written.
pub fn create_migration(dir: &Path, name: &str) -> Result<PathBuf, MigrateError> {
    scanner::ensure_dir(dir)?;
    let file_name = scanner::next_file_name(name, Local::now());
    let path = dir.join(&file_name);
    fs::write(&path, migration::render_template(&file_name))?;
    Ok(path)
}
