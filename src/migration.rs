//! The migration file format: one reversible change unit per file.
//!
//! A migration file is UTF-8 text holding two free-form SQL scripts,
//! split by a single separator line: everything before it is the up
//! script, everything after it the down script. The file name doubles
//! as the migration identifier.

use crate::error::MigrateError;

/// The line splitting the up script from the down script.
///
/// This is an unversioned protocol constant shared by every file ever
/// written: changing it is a breaking format change.
pub const SEPARATOR: &str = "--//@ ```MIGRATION SEPARATOR: DO NOT DELETE THIS LINE```";

/// One schema change unit, parsed from a migration file.
///
/// Built on demand from file bytes, never mutated, discarded after use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
    /// The file name, e.g. `20240101000000_init.sql`. Unique, and its
    /// bytewise sort order is the intended apply order.
    pub file_name: String,
    /// SQL applying the change forward.
    pub up: String,
    /// SQL reversing the change.
    pub down: String,
}

impl Migration {
    /// Parse file content into a migration.
    ///
    /// Requires exactly one occurrence of [`SEPARATOR`]; zero or more
    /// than one is a fatal parse error. The SQL on either side is not
    /// inspected further.
    pub fn parse(file_name: impl Into<String>, content: &str) -> Result<Self, MigrateError> {
        let file_name = file_name.into();
        let mut parts = content.split(SEPARATOR);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(up), Some(down), None) => Ok(Migration {
                file_name,
                up: up.to_string(),
                down: down.to_string(),
            }),
            _ => Err(MigrateError::MalformedMigration { file: file_name }),
        }
    }
}

/// Render the starter content for a new migration file.
///
/// The template carries the separator exactly once, so a freshly
/// created file always parses.
pub fn render_template(file_name: &str) -> String {
    format!(
        "-- Migration: {file_name}\n\
         -- UP\n\
         -- Write your forward migration SQL statements here\n\
         \n\
         {SEPARATOR}\n\
         \n\
         -- Write your rollback migration SQL statements here\n\
         -- DOWN\n"
    )
}
