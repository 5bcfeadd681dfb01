//! Error taxonomy for the migration engine.

use thiserror::Error;

/// Failure reported by a database-facing backend (SQL executor or
/// history store). Carries the backend's message only; the engine
/// attaches the offending migration where it has one.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SqlError(pub String);

impl From<sqlx::Error> for SqlError {
    fn from(err: sqlx::Error) -> Self {
        SqlError(err.to_string())
    }
}

/// Errors surfaced by migration operations. Every variant that involves
/// a specific migration names its file so the operator knows where the
/// batch stopped. None of these are retried.
#[derive(Debug, Error)]
pub enum MigrateError {
    /// The file did not contain exactly one separator line.
    #[error("migration file '{file}' is malformed: expected exactly one separator line")]
    MalformedMigration { file: String },

    /// The up script failed; the migration was left unrecorded and no
    /// later pending migration was attempted.
    #[error("up script of '{file}' failed: {source}")]
    UpScriptFailed { file: String, source: SqlError },

    /// The down script failed; migrations rolled back earlier in the
    /// same batch stay rolled back.
    #[error("down script of '{file}' failed: {source}")]
    DownScriptFailed { file: String, source: SqlError },

    /// A history entry references a file no longer on disk. The
    /// rollback batch is aborted before anything runs for it.
    #[error("migration file '{file}' not found in '{dir}', rollback aborted")]
    MissingFile { file: String, dir: String },

    /// The history store itself failed, outside any one script.
    #[error("migration history store: {0}")]
    History(#[from] SqlError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
